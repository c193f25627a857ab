//! CSV writers for decoded records and analysis tables.

use crate::{Error, Result};
use psdkit_core::{
    Exporter, HistogramTable, RawEventRecord, PSD_HEADER, RECORD_FIELD_NAMES, SPECTRUM_HEADER,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default location of the record table for a digitizer file: same path, `.csv` extension.
#[must_use]
pub fn records_csv_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("csv")
}

/// CSV implementation of [`Exporter`].
///
/// Each exporter writes one table; use a separate exporter per output file.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvExporter<File> {
    /// Creates an exporter writing to a new file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvExporter<W> {
    /// Creates an exporter over any writer.
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flushes buffered rows.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    /// Returns an error if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<W: Write> Exporter for CsvExporter<W> {
    type Error = Error;

    fn export_records(&mut self, records: &[RawEventRecord]) -> Result<()> {
        self.writer.write_record(RECORD_FIELD_NAMES)?;
        for record in records {
            self.writer.write_record(record.table_row())?;
        }
        self.flush()
    }

    fn export_spectrum(&mut self, spectrum: &HistogramTable) -> Result<()> {
        self.writer.write_record(SPECTRUM_HEADER)?;
        for bin in spectrum.bins() {
            self.writer
                .write_record([bin.center().to_string(), bin.count.to_string()])?;
        }
        self.flush()
    }

    fn export_psd(&mut self, psd_values: &[f64]) -> Result<()> {
        self.writer.write_record(PSD_HEADER)?;
        for value in psd_values {
            self.writer.write_record([value.to_string()])?;
        }
        self.flush()
    }
}

/// Writes the record table to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_records_csv<P: AsRef<Path>>(path: P, records: &[RawEventRecord]) -> Result<()> {
    CsvExporter::create(path)?.export_records(records)
}

/// Writes the spectrum table to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_spectrum_csv<P: AsRef<Path>>(path: P, spectrum: &HistogramTable) -> Result<()> {
    CsvExporter::create(path)?.export_spectrum(spectrum)
}

/// Writes one PSD value per row to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_psd_csv<P: AsRef<Path>>(path: P, psd_values: &[f64]) -> Result<()> {
    CsvExporter::create(path)?.export_psd(psd_values)
}
