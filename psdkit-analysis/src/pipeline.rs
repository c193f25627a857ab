//! Decode, filter and bin pipeline.
//!
//! [`load`] decodes a buffer once and keeps the records together with the
//! validated events. [`recompute`] is a pure function of that dataset and the
//! filter parameters, so hosts call it again whenever the filter toggle or the
//! threshold changes instead of decoding the file a second time.

use crate::config::AnalysisConfig;
use crate::metrics::{compute_metrics, compute_metrics_from_charges, MetricReport, ValidityCounts};
use crate::threshold::{apply_threshold, PsdFilter};
use crate::Result;
use psdkit_core::{BinningConfig, EventBatch, HistogramTable, RawEventRecord};
use psdkit_digitizer::{DecoderConfig, RecordDecoder};

/// Decoded records and their validated events, prior to any PSD cut.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedDataset {
    records: Vec<RawEventRecord>,
    events: EventBatch,
    validity: ValidityCounts,
}

impl DecodedDataset {
    /// Builds a dataset from already decoded records.
    #[must_use]
    pub fn from_records(records: Vec<RawEventRecord>) -> Self {
        let report = compute_metrics(&records);
        Self::from_report(records, &report)
    }

    /// Builds a dataset from bare `(q_long, q_short)` pairs, without records.
    ///
    /// Used when events are re-derived from an exported table rather than
    /// from the binary file.
    pub fn from_charges<I>(charges: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let report = compute_metrics_from_charges(charges);
        Self::from_report(Vec::new(), &report)
    }

    fn from_report(records: Vec<RawEventRecord>, report: &MetricReport) -> Self {
        let validity = report.counts();
        if validity.rejected() > 0 {
            log::debug!(
                "excluded {} non-finite and {} non-positive events of {}",
                validity.non_finite,
                validity.non_positive,
                validity.total()
            );
        }
        Self {
            records,
            events: report.valid_events(),
            validity,
        }
    }

    /// Decoded records, in file order. Empty for table-derived datasets.
    #[must_use]
    pub fn records(&self) -> &[RawEventRecord] {
        &self.records
    }

    /// Events that passed validation.
    #[must_use]
    pub fn events(&self) -> &EventBatch {
        &self.events
    }

    /// Validation outcome counts.
    #[must_use]
    pub fn validity(&self) -> ValidityCounts {
        self.validity
    }
}

/// Decodes `data` with the default layout and computes validated events.
///
/// # Errors
/// Returns an error if `data` is shorter than the file preamble.
pub fn load(data: &[u8]) -> Result<DecodedDataset> {
    load_with(&DecoderConfig::default(), data)
}

/// Decodes `data` with an explicit decoder configuration.
///
/// # Errors
/// Returns an error if `data` is shorter than the configured preamble.
pub fn load_with(config: &DecoderConfig, data: &[u8]) -> Result<DecodedDataset> {
    let records = RecordDecoder::with_config(*config).decode(data)?;
    Ok(DecodedDataset::from_records(records))
}

/// Output of one recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Histograms {
    /// qLong spectrum of the filtered events.
    pub spectrum: HistogramTable,
    /// PSD histogram of the filtered events.
    pub psd: HistogramTable,
    /// Events that passed the PSD cut.
    pub filtered: EventBatch,
}

impl Histograms {
    /// PSD value of every filtered event, the rows of the PSD export.
    #[must_use]
    pub fn psd_values(&self) -> &[f64] {
        &self.filtered.psd
    }
}

/// Filters the dataset and bins both histograms with the default binnings.
#[must_use]
pub fn recompute(dataset: &DecodedDataset, filter_enabled: bool, threshold: f64) -> Histograms {
    build_histograms(
        dataset,
        filter_enabled,
        threshold,
        &BinningConfig::spectrum(),
        &BinningConfig::psd(),
    )
}

/// Filters the dataset and bins both histograms as described by `config`.
#[must_use]
pub fn recompute_with(dataset: &DecodedDataset, config: &AnalysisConfig) -> Histograms {
    build_histograms(
        dataset,
        config.filter.enabled,
        config.filter.threshold,
        &config.spectrum,
        &config.psd,
    )
}

fn build_histograms(
    dataset: &DecodedDataset,
    filter_enabled: bool,
    threshold: f64,
    spectrum: &BinningConfig,
    psd: &BinningConfig,
) -> Histograms {
    let filtered = apply_threshold(dataset.events(), filter_enabled, threshold);
    let spectrum = HistogramTable::from_values(filtered.q_long_values(), spectrum);
    let psd = HistogramTable::from_values(filtered.psd.iter().copied(), psd);

    if filtered.is_empty() {
        log::warn!("no events left after filtering");
    }

    Histograms {
        spectrum,
        psd,
        filtered,
    }
}

/// Host-facing analysis session.
///
/// Keeps one decoded dataset and the tables of the latest recomputation so a
/// host can export them without recomputing.
#[derive(Debug, Clone, Default)]
pub struct PsdAnalyzer {
    config: AnalysisConfig,
    dataset: DecodedDataset,
    last: Option<Histograms>,
}

impl PsdAnalyzer {
    /// Creates an analyzer for an already loaded dataset.
    #[must_use]
    pub fn new(dataset: DecodedDataset, config: AnalysisConfig) -> Self {
        Self {
            config,
            dataset,
            last: None,
        }
    }

    /// Decodes `data` using the decoder settings in `config`.
    ///
    /// # Errors
    /// Returns an error if `data` is shorter than the configured preamble.
    pub fn load(data: &[u8], config: AnalysisConfig) -> Result<Self> {
        let dataset = load_with(&config.decoder, data)?;
        Ok(Self::new(dataset, config))
    }

    /// The retained dataset.
    #[must_use]
    pub fn dataset(&self) -> &DecodedDataset {
        &self.dataset
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Recomputes both histograms with new filter parameters.
    pub fn recompute(&mut self, filter_enabled: bool, threshold: f64) -> &Histograms {
        self.config.filter = PsdFilter {
            enabled: filter_enabled,
            threshold,
        };
        self.refresh()
    }

    /// Recomputes both histograms with the current configuration.
    pub fn refresh(&mut self) -> &Histograms {
        self.last.insert(recompute_with(&self.dataset, &self.config))
    }

    /// Tables of the latest recomputation, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Histograms> {
        self.last.as_ref()
    }

    /// Spectrum of the latest recomputation.
    #[must_use]
    pub fn last_spectrum(&self) -> Option<&HistogramTable> {
        self.last.as_ref().map(|h| &h.spectrum)
    }

    /// PSD histogram of the latest recomputation.
    #[must_use]
    pub fn last_psd_histogram(&self) -> Option<&HistogramTable> {
        self.last.as_ref().map(|h| &h.psd)
    }

    /// Filtered PSD values of the latest recomputation.
    #[must_use]
    pub fn last_psd_values(&self) -> Option<&[f64]> {
        self.last.as_ref().map(Histograms::psd_values)
    }
}
