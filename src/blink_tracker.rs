//! Blink debouncing and sliding-window blink rate estimation.
//!
//! A blink is counted on the frame where the eyes reopen, and only when the
//! preceding run of closed frames was at least `blink_confirm_frames` long.
//! Shorter runs are treated as detector flicker. Confirmed blinks are kept
//! with their timestamps for `window_seconds` and the rate is the count in
//! that window scaled to one minute.

use crate::{
    clock::{Clock, SystemClock},
    constants::{
        CONFIRM_FRAMES_FPS_FRACTION, DEFAULT_BLINK_CONFIRM_FRAMES, DEFAULT_WINDOW_SECONDS, SECONDS_PER_MINUTE,
    },
    Error, Result,
};
use std::collections::VecDeque;

/// Snapshot returned by every tracker update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkState {
    pub is_closed: bool,
    pub blink_rate_per_min: f64,
    pub total_blinks: u64,
}

/// Debounce state carried between frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceState {
    /// Consecutive closed frames, capped at the confirmation count
    pub pending_closed_frames: usize,
    /// Eye state observed on the previous frame
    pub is_closed: bool,
}

impl DebounceState {
    /// Advance by one frame. The flag is true when this frame confirms a blink.
    #[must_use]
    pub fn step(self, is_closed_now: bool, confirm_frames: usize) -> (Self, bool) {
        if is_closed_now {
            let pending = (self.pending_closed_frames + 1).min(confirm_frames);
            let next = Self {
                pending_closed_frames: pending,
                is_closed: true,
            };
            (next, false)
        } else {
            let confirmed = self.is_closed && self.pending_closed_frames >= confirm_frames;
            (Self::default(), confirmed)
        }
    }
}

/// Number of closed frames that confirms a blink at the given frame rate
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // floor of a checked positive value
pub fn confirm_frames_for_fps(fps: f64) -> usize {
    let frames = (fps * CONFIRM_FRAMES_FPS_FRACTION).floor();
    if frames.is_finite() && frames >= 1.0 {
        frames as usize
    } else {
        1
    }
}

/// Counts debounced blinks and reports the rate over a sliding time window
#[derive(Debug)]
pub struct BlinkTracker<C: Clock = SystemClock> {
    blink_confirm_frames: usize,
    window_seconds: f64,
    state: DebounceState,
    total_blinks: u64,
    history: VecDeque<f64>,
    clock: C,
}

impl BlinkTracker<SystemClock> {
    /// Create a tracker that reads the wall clock when no timestamp is given
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `blink_confirm_frames` is zero or
    /// `window_seconds` is not a positive finite number.
    pub fn new(blink_confirm_frames: usize, window_seconds: f64) -> Result<Self> {
        Self::with_clock(blink_confirm_frames, window_seconds, SystemClock)
    }
}

impl Default for BlinkTracker<SystemClock> {
    fn default() -> Self {
        Self {
            blink_confirm_frames: DEFAULT_BLINK_CONFIRM_FRAMES,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            state: DebounceState::default(),
            total_blinks: 0,
            history: VecDeque::new(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> BlinkTracker<C> {
    /// Create a tracker with an explicit time source
    ///
    /// # Errors
    ///
    /// Same as [`BlinkTracker::new`].
    pub fn with_clock(blink_confirm_frames: usize, window_seconds: f64, clock: C) -> Result<Self> {
        if blink_confirm_frames == 0 {
            return Err(Error::ConfigError(
                "Blink confirmation frames must be at least 1".to_string(),
            ));
        }
        validate_window(window_seconds)?;
        log::info!(
            "Initializing BlinkTracker: {blink_confirm_frames} confirm frames, {window_seconds}s window"
        );
        Ok(Self {
            blink_confirm_frames,
            window_seconds,
            state: DebounceState::default(),
            total_blinks: 0,
            history: VecDeque::new(),
            clock,
        })
    }

    /// Feed one frame's eye state, reading the clock if no timestamp is given
    pub fn update(&mut self, is_closed: bool, timestamp: Option<f64>) -> BlinkState {
        let now = timestamp.unwrap_or_else(|| self.clock.now());
        self.update_at(is_closed, now)
    }

    /// Feed one frame's eye state observed at `timestamp` seconds.
    ///
    /// Timestamps must be non-decreasing across calls.
    pub fn update_at(&mut self, is_closed: bool, timestamp: f64) -> BlinkState {
        let (next, confirmed) = self.state.step(is_closed, self.blink_confirm_frames);
        if confirmed {
            self.total_blinks += 1;
            self.history.push_back(timestamp);
            log::debug!("Blink confirmed at {timestamp:.3}s, total {}", self.total_blinks);
        }
        self.state = next;

        self.evict(timestamp);

        BlinkState {
            is_closed,
            blink_rate_per_min: self.blink_rate_per_min(),
            total_blinks: self.total_blinks,
        }
    }

    fn evict(&mut self, now: f64) {
        let window = self.window_seconds;
        let before = self.history.len();
        while self.history.front().is_some_and(|&ts| now - ts > window) {
            self.history.pop_front();
        }
        let evicted = before - self.history.len();
        if evicted > 0 {
            log::debug!("Evicted {evicted} blink(s) older than {window}s");
        }
    }

    /// Confirmed blinks in the current window, per minute
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // history holds at most a few hundred entries
    pub fn blink_rate_per_min(&self) -> f64 {
        self.history.len() as f64 / (self.window_seconds / SECONDS_PER_MINUTE)
    }

    /// Change the rate window; applies from the next update on
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `window_seconds` is not a positive finite number.
    pub fn set_window_seconds(&mut self, window_seconds: f64) -> Result<()> {
        validate_window(window_seconds)?;
        self.window_seconds = window_seconds;
        Ok(())
    }

    /// Forget all history and counts
    pub fn reset(&mut self) {
        self.state = DebounceState::default();
        self.total_blinks = 0;
        self.history.clear();
    }

    #[must_use]
    pub fn total_blinks(&self) -> u64 {
        self.total_blinks
    }

    #[must_use]
    pub fn pending_closed_frames(&self) -> usize {
        self.state.pending_closed_frames
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.is_closed
    }

    /// Number of confirmed blinks still inside the window
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn blink_confirm_frames(&self) -> usize {
        self.blink_confirm_frames
    }

    #[must_use]
    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }

    /// Time source used for untimed updates
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn validate_window(window_seconds: f64) -> Result<()> {
    if window_seconds.is_finite() && window_seconds > 0.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "Window must be a positive number of seconds, got {window_seconds}"
        )))
    }
}
