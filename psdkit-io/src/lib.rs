//! psdkit-io: File reading and export for psdkit.
//!
//! This crate is the host side of the pipeline: it maps digitizer files
//! with memmap2, writes records and tables as CSV, and re-imports
//! previously exported record tables.
//!

mod error;
mod reader;
pub mod table;
mod writer;

pub use error::{Error, Result};
pub use reader::{DigitizerFileReader, MappedFileReader};
pub use table::{read_record_table, read_record_table_file, TableImport};
pub use writer::{
    records_csv_path, write_psd_csv, write_records_csv, write_spectrum_csv, CsvExporter,
};
