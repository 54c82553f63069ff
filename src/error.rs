//! Error types for the eyelid monitor library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Landmark data does not match the configured layout
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value out of range or unparsable
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A recorded frame could not be decoded
    #[error("Replay error on line {line}: {message}")]
    ReplayError {
        /// 1-based line number in the replay stream
        line: usize,
        /// Decoder message
        message: String,
    },
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
