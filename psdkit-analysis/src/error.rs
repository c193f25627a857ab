//! Analysis error types.

use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Analysis error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Input could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] psdkit_digitizer::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] psdkit_core::Error),

    /// Configuration file is not valid JSON for the expected schema.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
