//! Digitizer format error types.

use thiserror::Error;

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Digitizer format error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Input ends before the file preamble does.
    #[error("input of {len} bytes is shorter than the {preamble}-byte preamble")]
    TruncatedPreamble {
        /// Input length in bytes.
        len: usize,
        /// Expected preamble length in bytes.
        preamble: usize,
    },
}
