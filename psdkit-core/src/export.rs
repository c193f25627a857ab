//! Export sink trait.
//!
//! The core never touches the filesystem; hosts hand decoded records and
//! computed tables to an [`Exporter`] implementation.

use crate::histogram::HistogramTable;
use crate::record::RawEventRecord;

/// Header of the spectrum export.
pub const SPECTRUM_HEADER: [&str; 2] = ["BinCenter", "Count"];

/// Header of the PSD export.
pub const PSD_HEADER: [&str; 1] = ["PSD"];

/// Sink for pipeline outputs.
///
/// Row shapes are fixed: the record dump carries one row per record with the
/// fields of [`crate::record::RECORD_FIELD_NAMES`], the spectrum one row per
/// bin as `(center, count)`, and the PSD export one row per filtered event.
pub trait Exporter {
    /// Error raised by the underlying sink.
    type Error;

    /// Writes one row per decoded record.
    ///
    /// # Errors
    /// Propagates failures from the sink.
    fn export_records(&mut self, records: &[RawEventRecord]) -> Result<(), Self::Error>;

    /// Writes one `(bin center, count)` row per bin.
    ///
    /// # Errors
    /// Propagates failures from the sink.
    fn export_spectrum(&mut self, spectrum: &HistogramTable) -> Result<(), Self::Error>;

    /// Writes one row per PSD value.
    ///
    /// # Errors
    /// Propagates failures from the sink.
    fn export_psd(&mut self, psd_values: &[f64]) -> Result<(), Self::Error>;
}
