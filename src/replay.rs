//! Replay of recorded detector output.
//!
//! The input is JSON lines, one object per frame:
//!
//! ```text
//! {"timestamp": 12.033, "landmarks": [[0.41, 0.37, -0.02], ...]}
//! {"timestamp": 12.066, "landmarks": null}
//! ```
//!
//! `timestamp` is optional; frames without one are stamped from the
//! tracker's clock. Missing or `null` landmarks mean no face was detected.

use crate::{clock::Clock, landmarks::LandmarkSet, processor::FrameProcessor, Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// One recorded frame of detector output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub landmarks: Option<Vec<[f64; 3]>>,
}

impl RecordedFrame {
    #[must_use]
    pub fn landmark_set(&self) -> Option<LandmarkSet> {
        self.landmarks.as_deref().map(LandmarkSet::from_triples)
    }
}

/// Counters accumulated over a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Frames read from the stream
    pub frames: usize,
    /// Frames in which a face was present
    pub faces: usize,
    /// Blinks confirmed by the end of the stream
    pub total_blinks: u64,
}

/// Decode frames from a JSON-lines reader, skipping blank lines
pub fn read_frames<R: BufRead>(reader: R) -> impl Iterator<Item = Result<RecordedFrame>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(serde_json::from_str(&text).map_err(|e| Error::ReplayError {
                line: index + 1,
                message: e.to_string(),
            })),
            Err(e) => Some(Err(Error::from(e))),
        })
}

/// Run every frame through `processor`, writing one status line per face.
///
/// # Errors
///
/// Stops at the first undecodable line, landmark contract violation or
/// write failure.
pub fn replay<R, W, C>(reader: R, out: &mut W, processor: &mut FrameProcessor<C>) -> Result<ReplaySummary>
where
    R: BufRead,
    W: Write,
    C: Clock,
{
    let mut summary = ReplaySummary::default();

    for frame in read_frames(reader) {
        let frame = frame?;
        summary.frames += 1;

        let timestamp = frame.timestamp.unwrap_or_else(|| processor.tracker().clock().now());
        let landmarks = frame.landmark_set();
        match processor.process(landmarks.as_ref(), Some(timestamp))? {
            Some(report) => {
                summary.faces += 1;
                summary.total_blinks = report.blink.total_blinks;
                writeln!(out, "{timestamp:.3} {report}")?;
            }
            None => log::debug!("No face in frame {}", summary.frames),
        }
    }

    if summary.frames > 0 && summary.faces == 0 {
        log::warn!("No face detected in any of {} frames", summary.frames);
    }

    Ok(summary)
}
