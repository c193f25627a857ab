//! Error types for psdkit-core.

use thiserror::Error;

/// Result type alias for psdkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for psdkit operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Histogram binning parameters that cannot describe a range.
    #[error("invalid binning: {bins} bins over [{min}, {max}]")]
    InvalidBinning {
        /// Requested number of bins.
        bins: usize,
        /// Requested lower edge.
        min: f64,
        /// Requested upper edge.
        max: f64,
    },
}
