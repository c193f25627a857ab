//! psdkit-core: Core types for pulse-shape discrimination processing.
//!
//! This crate provides the record and event data model, the fixed-width
//! histogram binning engine, and the exporter seam used by hosts.
//!

pub mod error;
pub mod event;
pub mod export;
pub mod histogram;
pub mod record;
pub mod soa;

pub use error::{Error, Result};
pub use event::DerivedEvent;
pub use export::{Exporter, PSD_HEADER, SPECTRUM_HEADER};
pub use histogram::{BinningConfig, HistogramBin, HistogramTable};
pub use record::{RawEventRecord, RECORD_FIELD_NAMES};
pub use soa::EventBatch;
