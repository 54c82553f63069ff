//! Configuration management for the eyelid monitor

use crate::{
    blink_tracker::{confirm_frames_for_fps, BlinkTracker},
    constants::{
        DEFAULT_EYELID_THRESHOLD, DEFAULT_FPS, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_PITCH_ALPHA,
        DEFAULT_PITCH_NOD_THRESHOLD, DEFAULT_WINDOW_SECONDS,
    },
    features::FeatureExtractor,
    filters::PitchSmoother,
    landmarks::LandmarkLayout,
    processor::FrameProcessor,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Eye closure detection
    pub detection: DetectionConfig,

    /// Pitch smoothing
    pub smoothing: SmoothingConfig,

    /// Blink debouncing and rate window
    pub blink: BlinkConfig,

    /// Output options
    pub display: DisplayConfig,
}

/// Eye closure detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Eye aspect ratio below which the eyes count as closed
    pub eyelid_threshold: f64,

    /// Landmark index layout of the detector model
    pub layout: LandmarkLayout,
}

/// Pitch smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// EMA weight of the newest pitch sample, in (0, 1]
    pub pitch_alpha: f64,
}

/// Blink tracking parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Nominal camera frame rate
    pub fps: f64,

    /// Closed frames needed to confirm a blink; derived from `fps` when unset
    pub confirm_frames: Option<usize>,

    /// Length of the blink rate window in seconds
    pub window_seconds: f64,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Smoothed pitch above which the head is reported as nodding
    pub pitch_nod_threshold: f64,

    /// Attach pixel-space landmarks to each measurement
    pub include_landmarks: bool,

    /// Frame width used to scale landmarks
    pub frame_width: u32,

    /// Frame height used to scale landmarks
    pub frame_height: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            eyelid_threshold: DEFAULT_EYELID_THRESHOLD,
            layout: LandmarkLayout::face_mesh(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            pitch_alpha: DEFAULT_PITCH_ALPHA,
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            confirm_frames: None,
            window_seconds: DEFAULT_WINDOW_SECONDS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pitch_nod_threshold: DEFAULT_PITCH_NOD_THRESHOLD,
            include_landmarks: false,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Closed-frame run that confirms a blink
    #[must_use]
    pub fn blink_confirm_frames(&self) -> usize {
        self.blink
            .confirm_frames
            .unwrap_or_else(|| confirm_frames_for_fps(self.blink.fps))
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if !self.detection.eyelid_threshold.is_finite() || self.detection.eyelid_threshold < 0.0 {
            return Err(Error::ConfigError(
                "Eyelid threshold must be finite and non-negative".to_string(),
            ));
        }
        self.detection.layout.validate()?;

        if !(self.smoothing.pitch_alpha > 0.0 && self.smoothing.pitch_alpha <= 1.0) {
            return Err(Error::ConfigError("Pitch alpha must be in (0, 1]".to_string()));
        }

        if !(self.blink.fps.is_finite() && self.blink.fps > 0.0) {
            return Err(Error::ConfigError("FPS must be greater than 0".to_string()));
        }
        if self.blink.confirm_frames == Some(0) {
            return Err(Error::ConfigError(
                "Blink confirmation frames must be at least 1".to_string(),
            ));
        }
        if !(self.blink.window_seconds.is_finite() && self.blink.window_seconds > 0.0) {
            return Err(Error::ConfigError(
                "Blink rate window must be greater than 0 seconds".to_string(),
            ));
        }

        if self.display.include_landmarks && (self.display.frame_width == 0 || self.display.frame_height == 0) {
            return Err(Error::ConfigError(
                "Frame size must be non-zero when landmarks are included".to_string(),
            ));
        }

        Ok(())
    }

    /// Build a frame processor reading the wall clock for untimed frames
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn create_processor(&self) -> Result<FrameProcessor> {
        self.validate()?;

        let extractor = FeatureExtractor::new(self.detection.layout.clone(), self.detection.eyelid_threshold)?;
        let smoother = PitchSmoother::new(self.smoothing.pitch_alpha)?;
        let tracker = BlinkTracker::new(self.blink_confirm_frames(), self.blink.window_seconds)?;

        let processor =
            FrameProcessor::new(extractor, smoother, tracker).with_nod_threshold(self.display.pitch_nod_threshold);
        Ok(if self.display.include_landmarks {
            processor.with_landmark_overlay(self.display.frame_width, self.display.frame_height)
        } else {
            processor
        })
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Eyelid Monitor Configuration

# Eye closure detection
detection:
  eyelid_threshold: 0.21
  # MediaPipe Face Mesh (refined) indices
  layout:
    landmark_count: 478
    eyes:
      - [33, 160, 158, 133, 153, 144]
      - [263, 387, 385, 362, 380, 373]
    nose_bridge: 1
    chin: 152
    up_vector: [0.0, 1.0, 0.0]

# Pitch smoothing
smoothing:
  pitch_alpha: 0.2

# Blink tracking; confirm_frames defaults to 10% of fps
blink:
  fps: 30.0
  window_seconds: 60.0

# Output
display:
  pitch_nod_threshold: 0.025
  include_landmarks: false
  frame_width: 640
  frame_height: 480
"#;
