//! Per-frame composition of feature extraction, pitch smoothing and blink tracking.

use crate::{
    blink_tracker::{BlinkState, BlinkTracker},
    clock::{Clock, SystemClock},
    constants::DEFAULT_PITCH_NOD_THRESHOLD,
    features::{EyeMeasurement, FeatureExtractor},
    filters::{PitchSmoother, SignalFilter},
    landmarks::LandmarkSet,
    Result,
};
use std::fmt;

/// Face measurements for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMeasurement {
    pub eye: EyeMeasurement,
    /// Smoothed pitch in degrees
    pub pitch_deg: f64,
    /// Landmarks scaled to pixels, when overlay output is enabled
    pub landmarks_px: Option<Vec<(f64, f64)>>,
}

/// Everything produced for a frame in which a face was detected
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub measurement: FaceMeasurement,
    pub blink: BlinkState,
    pub is_nodding: bool,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eyelid_state = if self.blink.is_closed { "closed" } else { "open" };
        let nod_state = if self.is_nodding { "nodding" } else { "steady" };
        write!(
            f,
            "state: {eyelid_state}/{nod_state} | EAR: {:.3} | blink/min: {:.1} | total: {}",
            self.measurement.eye.eye_aspect_ratio, self.blink.blink_rate_per_min, self.blink.total_blinks
        )
    }
}

/// Drives one face's landmark stream through the measurement pipeline
#[derive(Debug)]
pub struct FrameProcessor<C: Clock = SystemClock> {
    extractor: FeatureExtractor,
    smoother: PitchSmoother,
    tracker: BlinkTracker<C>,
    pitch_nod_threshold: f64,
    frame_size: Option<(u32, u32)>,
}

impl Default for FrameProcessor<SystemClock> {
    fn default() -> Self {
        Self::new(FeatureExtractor::default(), PitchSmoother::default(), BlinkTracker::default())
    }
}

impl<C: Clock> FrameProcessor<C> {
    #[must_use]
    pub fn new(extractor: FeatureExtractor, smoother: PitchSmoother, tracker: BlinkTracker<C>) -> Self {
        Self {
            extractor,
            smoother,
            tracker,
            pitch_nod_threshold: DEFAULT_PITCH_NOD_THRESHOLD,
            frame_size: None,
        }
    }

    /// Smoothed pitch above which a frame is reported as nodding
    #[must_use]
    pub fn with_nod_threshold(mut self, threshold: f64) -> Self {
        self.pitch_nod_threshold = threshold;
        self
    }

    /// Attach pixel-space landmarks for a frame of the given size
    #[must_use]
    pub fn with_landmark_overlay(mut self, width: u32, height: u32) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    /// Extract features and update the pitch estimate
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the landmark count does not match the layout.
    /// The pitch estimate is left untouched in that case.
    pub fn measure(&mut self, landmarks: &LandmarkSet) -> Result<FaceMeasurement> {
        let features = self.extractor.extract(landmarks)?;
        let pitch_deg = self.smoother.apply(features.raw_pitch_deg);
        let landmarks_px = self
            .frame_size
            .map(|(width, height)| landmarks.to_pixel_space(width, height));

        Ok(FaceMeasurement {
            eye: features.eye,
            pitch_deg,
            landmarks_px,
        })
    }

    /// Process one frame. `None` landmarks means no face was detected, in
    /// which case no state is updated and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the landmark count does not match the layout.
    pub fn process(&mut self, landmarks: Option<&LandmarkSet>, timestamp: Option<f64>) -> Result<Option<FrameReport>> {
        let Some(landmarks) = landmarks else {
            return Ok(None);
        };

        let measurement = self.measure(landmarks)?;
        let blink = self.tracker.update(measurement.eye.is_closed, timestamp);
        let is_nodding = measurement.pitch_deg > self.pitch_nod_threshold;

        Ok(Some(FrameReport {
            measurement,
            blink,
            is_nodding,
        }))
    }

    /// Drop smoothing and blink history
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.tracker.reset();
    }

    #[must_use]
    pub fn tracker(&self) -> &BlinkTracker<C> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut BlinkTracker<C> {
        &mut self.tracker
    }

    /// Current smoothed pitch, if any frame has been measured
    #[must_use]
    pub fn pitch_deg(&self) -> Option<f64> {
        self.smoother.value()
    }

    #[must_use]
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }
}
