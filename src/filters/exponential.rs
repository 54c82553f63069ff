use super::SignalFilter;
use crate::{constants::DEFAULT_PITCH_ALPHA, Error, Result};

/// Exponential smoothing of the head pitch angle
#[derive(Debug, Clone)]
pub struct PitchSmoother {
    alpha: f64,
    estimate: Option<f64>,
}

impl PitchSmoother {
    /// Create a smoother weighting new samples by `alpha`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` unless `alpha` is in (0, 1].
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::ConfigError(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, estimate: None })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for PitchSmoother {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_PITCH_ALPHA,
            estimate: None,
        }
    }
}

impl SignalFilter for PitchSmoother {
    fn apply(&mut self, value: f64) -> f64 {
        let smoothed = match self.estimate {
            Some(last) => self.alpha * value + (1.0 - self.alpha) * last,
            None => value,
        };
        self.estimate = Some(smoothed);
        smoothed
    }

    fn value(&self) -> Option<f64> {
        self.estimate
    }

    fn reset(&mut self) {
        self.estimate = None;
    }

    fn name(&self) -> &str {
        "PitchSmoother"
    }
}
