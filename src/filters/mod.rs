//! Signal filtering for per-frame scalar measurements.
//!
//! Only the head pitch is smoothed across frames; landmarks themselves are
//! passed through untouched.

/// Exponential moving average used to smooth the pitch angle
pub mod exponential;

pub use exponential::PitchSmoother;

/// Trait for stateful single-channel filters
pub trait SignalFilter: Send + Sync {
    /// Feed one sample and return the filtered value
    fn apply(&mut self, value: f64) -> f64;

    /// Current filtered value, if any sample has been seen
    fn value(&self) -> Option<f64>;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}
