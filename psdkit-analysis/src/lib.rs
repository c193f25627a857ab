//! psdkit-analysis: Pulse-shape discrimination pipeline.
//!
//! This crate turns decoded records into the two PSD analysis tables:
//! - **Metrics** - `psd = 1 - q_short / q_long` with finiteness and positivity validation
//! - **Threshold** - optional `psd > threshold` cut shared by both tables
//! - **Pipeline** - `load` once, `recompute` on every filter change
//!
#![warn(missing_docs)]

pub mod config;
mod error;
pub mod metrics;
pub mod pipeline;
pub mod threshold;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use metrics::{
    compute_metrics, compute_metrics_from_charges, EventValidity, MetricReport, ValidityCounts,
};
pub use pipeline::{
    load, load_with, recompute, recompute_with, DecodedDataset, Histograms, PsdAnalyzer,
};
pub use threshold::{apply_threshold, PsdFilter, DEFAULT_PSD_THRESHOLD};

// Re-export core types used in the public API
pub use psdkit_core::{BinningConfig, DerivedEvent, EventBatch, HistogramBin, HistogramTable};
