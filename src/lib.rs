//! Blink-rate and head-pitch tracking from per-frame facial landmarks.
//!
//! The library consumes the output of a facial landmark detector (one
//! fixed-length set of normalized 3D points per frame) and derives:
//! - the eye aspect ratio and an open/closed flag for each frame
//! - a smoothed head pitch angle
//! - a debounced blink count and a blink rate over a sliding time window
//!
//! The pipeline per frame:
//! 1. [`features::FeatureExtractor`] measures both eyes and the raw pitch
//! 2. [`filters::PitchSmoother`] smooths the pitch with an exponential moving average
//! 3. [`blink_tracker::BlinkTracker`] debounces the closed flag and updates the rate
//!
//! [`processor::FrameProcessor`] wires these together.
//!
//! # Examples
//!
//! ## Tracking blinks
//!
//! ```
//! use eyelid_monitor::blink_tracker::BlinkTracker;
//!
//! # fn main() -> eyelid_monitor::Result<()> {
//! let mut tracker = BlinkTracker::new(3, 60.0)?;
//! let frame = 1.0 / 30.0;
//!
//! for (i, closed) in [true, true, true, false].into_iter().enumerate() {
//!     let state = tracker.update_at(closed, i as f64 * frame);
//!     if !closed {
//!         assert_eq!(state.total_blinks, 1);
//!         assert_eq!(state.blink_rate_per_min, 1.0);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Processing detector output
//!
//! ```no_run
//! use eyelid_monitor::{config::Config, landmarks::LandmarkSet};
//!
//! # fn main() -> eyelid_monitor::Result<()> {
//! let mut processor = Config::default().create_processor()?;
//!
//! // 478 Face Mesh points from the detector, or None when no face was found
//! let detection: Option<LandmarkSet> = None;
//!
//! if let Some(report) = processor.process(detection.as_ref(), None)? {
//!     println!("{report}");
//!     println!("Pitch: {:.2}°", report.measurement.pitch_deg);
//! }
//! # Ok(())
//! # }
//! ```

/// Landmark containers and detector index layouts
pub mod landmarks;

/// Eye aspect ratio and pitch extraction
pub mod features;

/// Signal filtering for the pitch angle
pub mod filters;

/// Blink debouncing and blink rate estimation
pub mod blink_tracker;

/// Injectable time sources
pub mod clock;

/// Per-frame pipeline composition
pub mod processor;

/// Replay of recorded landmark streams
pub mod replay;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
