//! Per-frame geometric features: eye aspect ratio and raw head pitch.

use crate::{
    constants::{DEFAULT_EYELID_THRESHOLD, GEOMETRY_EPSILON},
    landmarks::{LandmarkLayout, LandmarkSet},
    Error, Result,
};
use nalgebra::{Vector2, Vector3};

/// Eye openness measured on a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeMeasurement {
    /// Mean vertical lid aperture across both eyes
    pub eyelid_distance: f64,
    /// Mean eye aspect ratio across both eyes
    pub eye_aspect_ratio: f64,
    /// `eye_aspect_ratio` fell below the configured threshold
    pub is_closed: bool,
}

/// Everything the extractor derives from one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFeatures {
    pub eye: EyeMeasurement,
    /// Unsmoothed pitch angle in degrees
    pub raw_pitch_deg: f64,
}

/// Stateless extractor bound to a landmark layout and a closed-eye threshold
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    layout: LandmarkLayout,
    eyelid_threshold: f64,
}

impl FeatureExtractor {
    /// Create an extractor for the given layout
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the layout is invalid or the threshold is
    /// negative or not finite.
    pub fn new(layout: LandmarkLayout, eyelid_threshold: f64) -> Result<Self> {
        layout.validate()?;
        if !eyelid_threshold.is_finite() || eyelid_threshold < 0.0 {
            return Err(Error::ConfigError(format!(
                "Eyelid threshold must be finite and non-negative, got {eyelid_threshold}"
            )));
        }
        log::info!(
            "Initializing FeatureExtractor for {}-point landmarks, EAR threshold {eyelid_threshold}",
            layout.landmark_count
        );
        Ok(Self {
            layout,
            eyelid_threshold,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &LandmarkLayout {
        &self.layout
    }

    #[must_use]
    pub fn eyelid_threshold(&self) -> f64 {
        self.eyelid_threshold
    }

    /// Measure both eyes and the raw pitch of one frame
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the frame does not carry exactly the
    /// layout's landmark count.
    pub fn extract(&self, landmarks: &LandmarkSet) -> Result<FrameFeatures> {
        self.layout.check(landmarks)?;
        let points = landmarks.points();

        let mut vertical_sum = 0.0;
        let mut ratio_sum = 0.0;
        for contour in self.layout.eyes {
            let eye = contour.map(|i| points[i].xy());
            let (vertical, ratio) = eye_ratio(&eye);
            vertical_sum += vertical;
            ratio_sum += ratio;
        }

        let eye_count = self.layout.eyes.len() as f64;
        let eye_aspect_ratio = ratio_sum / eye_count;
        let eye = EyeMeasurement {
            eyelid_distance: vertical_sum / eye_count,
            eye_aspect_ratio,
            is_closed: eye_aspect_ratio < self.eyelid_threshold,
        };

        let pitch_vector = points[self.layout.chin] - points[self.layout.nose_bridge];
        let raw_pitch_deg = angle_between(&pitch_vector, &self.layout.up());

        Ok(FrameFeatures { eye, raw_pitch_deg })
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            layout: LandmarkLayout::face_mesh(),
            eyelid_threshold: DEFAULT_EYELID_THRESHOLD,
        }
    }
}

/// Vertical aperture sum and aspect ratio of one six-point eye contour
#[must_use]
pub fn eye_ratio(eye: &[Vector2<f64>; 6]) -> (f64, f64) {
    let vertical = (eye[1] - eye[5]).norm() + (eye[2] - eye[4]).norm();
    let horizontal = (eye[0] - eye[3]).norm();
    (vertical, vertical / (2.0 * horizontal + GEOMETRY_EPSILON))
}

/// Angle in degrees between two vectors; zero-length inputs yield 90
#[must_use]
pub fn angle_between(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let u1 = v1 / (v1.norm() + GEOMETRY_EPSILON);
    let u2 = v2 / (v2.norm() + GEOMETRY_EPSILON);
    u1.dot(&u2).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_eye(aperture: f64) -> [Vector2<f64>; 6] {
        [
            Vector2::new(0.0, 0.0),
            Vector2::new(0.33, -aperture / 2.0),
            Vector2::new(0.66, -aperture / 2.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.66, aperture / 2.0),
            Vector2::new(0.33, aperture / 2.0),
        ]
    }

    #[test]
    fn test_eye_ratio() {
        let (vertical, ratio) = eye_ratio(&open_eye(0.3));
        assert!((vertical - 0.6).abs() < 1e-12);
        assert!((ratio - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_eye_ratio_degenerate_width() {
        let eye = [Vector2::new(0.5, 0.5); 6];
        let (vertical, ratio) = eye_ratio(&eye);
        assert_eq!(vertical, 0.0);
        assert_eq!(ratio, 0.0);

        let mut collapsed = open_eye(0.2);
        collapsed[3] = collapsed[0];
        let (_, ratio) = eye_ratio(&collapsed);
        assert!(ratio.is_finite());
        assert!(ratio > 1e4);
    }

    #[test]
    fn test_angle_between() {
        let up = Vector3::new(0.0, 1.0, 0.0);
        // the epsilon guard keeps the dot product just under 1
        assert!(angle_between(&up, &up).abs() < 0.2);
        assert!((angle_between(&Vector3::new(1.0, 0.0, 0.0), &up) - 90.0).abs() < 1e-9);
        assert!((angle_between(&Vector3::new(0.0, -2.0, 0.0), &up) - 180.0).abs() < 0.2);
        assert!((angle_between(&Vector3::new(1.0, 1.0, 0.0), &up) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_between_zero_vector() {
        let angle = angle_between(&Vector3::zeros(), &Vector3::new(0.0, 1.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(FeatureExtractor::new(LandmarkLayout::face_mesh(), -0.1).is_err());
        assert!(FeatureExtractor::new(LandmarkLayout::face_mesh(), f64::NAN).is_err());
        assert!(FeatureExtractor::new(LandmarkLayout::face_mesh(), 0.21).is_ok());
    }

    #[test]
    fn test_wrong_length_is_contract_violation() {
        let extractor = FeatureExtractor::default();
        let frame = LandmarkSet::from_triples(&[[0.0; 3]; 68]);
        assert!(matches!(extractor.extract(&frame), Err(Error::InvalidInput(_))));
    }
}
