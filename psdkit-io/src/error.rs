//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory mapping error.
    #[error("memory mapping error: {0}")]
    MmapError(String),

    /// Invalid file format.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Analysis pipeline error.
    #[error("analysis error: {0}")]
    Analysis(#[from] psdkit_analysis::Error),
}

impl From<psdkit_digitizer::Error> for Error {
    fn from(err: psdkit_digitizer::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}
