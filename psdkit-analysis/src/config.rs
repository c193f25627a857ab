//! Analysis configuration.
//!
//! Configuration files are JSON with one optional section per stage:
//!
//! ```json
//! {
//!   "analysis": {
//!     "filter":   { "enabled": true, "threshold": 0.1474 },
//!     "spectrum": { "bins": 4096, "min": 0.0, "max": 100000.0 },
//!     "psd":      { "bins": 200, "min": 0.0, "max": 1.0 },
//!     "decoder":  { "preamble_len": 8 }
//!   }
//! }
//! ```
//!
//! Missing sections and fields keep their defaults.

use crate::threshold::PsdFilter;
use crate::Result;
use psdkit_core::BinningConfig;
use psdkit_digitizer::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parameters for one full decode, filter and binning pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// PSD cut shared by both histograms.
    pub filter: PsdFilter,
    /// Binning of the qLong energy spectrum.
    pub spectrum: BinningConfig,
    /// Binning of the PSD histogram.
    pub psd: BinningConfig,
    /// Record decoder settings.
    pub decoder: DecoderConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            filter: PsdFilter::default(),
            spectrum: BinningConfig::spectrum(),
            psd: BinningConfig::psd(),
            decoder: DecoderConfig::default(),
        }
    }
}

#[derive(Deserialize)]
struct JsonConfig {
    #[serde(default)]
    analysis: JsonAnalysis,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonAnalysis {
    filter: PsdFilter,
    spectrum: JsonBinning,
    psd: JsonBinning,
    decoder: DecoderConfig,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonBinning {
    bins: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
}

impl JsonBinning {
    fn resolve(self, default: BinningConfig) -> Result<BinningConfig> {
        Ok(BinningConfig::new(
            self.bins.unwrap_or(default.bins()),
            self.min.unwrap_or(default.min()),
            self.max.unwrap_or(default.max()),
        )?)
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// describes an invalid binning.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let json_config: JsonConfig = serde_json::from_reader(reader)?;
        Self::from_json_config(json_config)
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string is not valid JSON or describes an
    /// invalid binning.
    pub fn from_json(json: &str) -> Result<Self> {
        let json_config: JsonConfig = serde_json::from_str(json)?;
        Self::from_json_config(json_config)
    }

    fn from_json_config(config: JsonConfig) -> Result<Self> {
        let analysis = config.analysis;
        Ok(Self {
            filter: analysis.filter,
            spectrum: analysis.spectrum.resolve(BinningConfig::spectrum())?,
            psd: analysis.psd.resolve(BinningConfig::psd())?,
            decoder: analysis.decoder,
        })
    }

    /// Replaces the PSD filter.
    #[must_use]
    pub fn with_filter(mut self, filter: PsdFilter) -> Self {
        self.filter = filter;
        self
    }
}
