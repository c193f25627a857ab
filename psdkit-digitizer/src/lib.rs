//! psdkit-digitizer: Decoder for fixed-layout digitizer event files.
//!
//! A file is an opaque 8-byte preamble followed by packed 50-byte
//! little-endian event records. Any trailing span shorter than one record
//! is ignored.
//!
//! # Key Components
//!
//! - [`RecordDecoder`] - Buffer decoder with configurable preamble and record limit
//! - [`layout`] - Field offsets plus single-record decode/encode
//! - [`DecodeSummary`] - Record and trailing byte counts for diagnostics

mod error;
pub mod layout;
mod parser;

pub use error::{Error, Result};
pub use layout::{decode_record, encode_record, PREAMBLE_SIZE, RECORD_SIZE};
pub use parser::{decode, DecodeSummary, DecoderConfig, RecordDecoder, Records};

// Re-export core types for convenience
pub use psdkit_core::RawEventRecord;
