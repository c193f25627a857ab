//! Fixed-width histogram binning.
//!
//! A [`HistogramTable`] is always built in one pass from a value sequence and
//! a [`BinningConfig`]; tables are never updated incrementally. Bins are
//! half-open `[lo, hi)` except the last, which also includes `max`, so a value
//! equal to the upper bound is counted. Values outside `[min, max]` (and NaN)
//! are excluded and only tallied in [`HistogramTable::excluded`].

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Number of bins in the energy (qLong) spectrum.
pub const SPECTRUM_BINS: usize = 4096;
/// Upper edge of the energy spectrum range.
pub const SPECTRUM_MAX: f64 = 100_000.0;
/// Number of bins in the PSD histogram.
pub const PSD_BINS: usize = 200;

/// Equal-width binning over a closed value range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BinningConfig {
    bins: usize,
    min: f64,
    max: f64,
}

impl BinningConfig {
    /// Creates a validated binning configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBinning`] if `bins` is zero, either bound is not
    /// finite, `max <= min`, or the range `max - min` overflows.
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self> {
        if bins == 0
            || !min.is_finite()
            || !max.is_finite()
            || max <= min
            || !(max - min).is_finite()
        {
            return Err(Error::InvalidBinning { bins, min, max });
        }
        Ok(Self { bins, min, max })
    }

    /// Energy spectrum binning: 4096 bins over `[0, 100000]`.
    #[must_use]
    pub const fn spectrum() -> Self {
        Self {
            bins: SPECTRUM_BINS,
            min: 0.0,
            max: SPECTRUM_MAX,
        }
    }

    /// PSD histogram binning: 200 bins over `[0, 1]`.
    #[must_use]
    pub const fn psd() -> Self {
        Self {
            bins: PSD_BINS,
            min: 0.0,
            max: 1.0,
        }
    }

    /// Number of bins.
    #[inline]
    #[must_use]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Lower edge of the first bin.
    #[inline]
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper edge of the last bin.
    #[inline]
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of every bin.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    /// Edge `i` of the bin grid, `0..=bins`. The last edge is exactly `max`.
    #[inline]
    #[must_use]
    pub fn edge(&self, i: usize) -> f64 {
        if i >= self.bins {
            self.max
        } else {
            self.min + self.width() * i as f64
        }
    }

    /// Returns the bin that `value` falls into, or `None` if it is out of range.
    ///
    /// The estimate from the bin width is corrected against the exact edges, so
    /// the assignment depends only on [`BinningConfig::edge`].
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        // NaN fails both comparisons.
        if !(value >= self.min && value <= self.max) {
            return None;
        }

        let last = self.bins - 1;
        if value == self.max {
            return Some(last);
        }

        let mut index = (((value - self.min) / self.width()) as usize).min(last);
        if value < self.edge(index) {
            index -= 1;
        } else if value >= self.edge(index + 1) {
            index += 1;
        }
        Some(index)
    }
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self::spectrum()
    }
}

/// One bin of a histogram table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HistogramBin {
    /// Lower edge (inclusive).
    pub lower: f64,
    /// Upper edge (exclusive, except for the last bin).
    pub upper: f64,
    /// Number of values in the bin.
    pub count: u64,
}

impl HistogramBin {
    /// Midpoint of the bin edges.
    #[inline]
    #[must_use]
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// An ordered sequence of bins computed from a value sequence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HistogramTable {
    config: BinningConfig,
    bins: Vec<HistogramBin>,
    excluded: u64,
}

impl HistogramTable {
    /// Bins `values` according to `config`.
    #[must_use]
    pub fn from_values<I>(values: I, config: &BinningConfig) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut counts = vec![0u64; config.bins()];
        let mut excluded = 0u64;

        for value in values {
            match config.bin_index(value) {
                Some(index) => counts[index] += 1,
                None => excluded += 1,
            }
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: config.edge(i),
                upper: config.edge(i + 1),
                count,
            })
            .collect();

        Self {
            config: *config,
            bins,
            excluded,
        }
    }

    /// Binning used to build this table.
    #[must_use]
    pub fn config(&self) -> &BinningConfig {
        &self.config
    }

    /// All bins in ascending edge order.
    #[must_use]
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Number of bins.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Sum of all bin counts.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Number of input values that fell outside the binning range.
    #[must_use]
    pub fn excluded(&self) -> u64 {
        self.excluded
    }

    /// Returns true if no value was counted. Hosts render this as "no data".
    #[must_use]
    pub fn has_no_data(&self) -> bool {
        self.bins.iter().all(|bin| bin.count == 0)
    }

    /// Bin counts in order.
    #[must_use]
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    /// Bin centers in order.
    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        self.bins.iter().map(HistogramBin::center).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spectrum_layout() {
        let config = BinningConfig::spectrum();
        let table = HistogramTable::from_values(std::iter::empty(), &config);

        assert_eq!(table.bin_count(), 4096);
        assert_relative_eq!(config.width(), 100_000.0 / 4096.0);
        assert_relative_eq!(table.bins()[0].lower, 0.0);
        assert_relative_eq!(table.bins()[4095].upper, 100_000.0);
        for bin in table.bins() {
            assert_relative_eq!(bin.upper - bin.lower, config.width(), epsilon = 1e-9);
        }
        assert!(table.has_no_data());
    }

    #[test]
    fn test_psd_layout() {
        let config = BinningConfig::psd();
        assert_eq!(config.bins(), 200);
        assert_relative_eq!(config.width(), 0.005);
        assert_relative_eq!(config.edge(200), 1.0);
    }

    #[test]
    fn test_last_bin_is_closed() {
        let config = BinningConfig::psd();
        assert_eq!(config.bin_index(1.0), Some(199));
        assert_eq!(config.bin_index(0.0), Some(0));
        assert_eq!(config.bin_index(0.7012), Some(140));

        let spectrum = BinningConfig::spectrum();
        assert_eq!(spectrum.bin_index(100_000.0), Some(4095));
        assert_eq!(spectrum.bin_index(1000.0), Some(40));
    }

    #[test]
    fn test_out_of_range_excluded() {
        let config = BinningConfig::psd();
        assert_eq!(config.bin_index(-0.001), None);
        assert_eq!(config.bin_index(1.000_001), None);
        assert_eq!(config.bin_index(f64::NAN), None);
        assert_eq!(config.bin_index(f64::INFINITY), None);
        assert_eq!(config.bin_index(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_counts_sum_to_in_range_inputs() {
        let config = BinningConfig::new(10, 0.0, 10.0).unwrap();
        let values = vec![-1.0, 0.0, 0.5, 1.0, 9.999, 10.0, 10.5, f64::NAN, 5.0];
        let table = HistogramTable::from_values(values.iter().copied(), &config);

        assert_eq!(table.total_count(), 6);
        assert_eq!(table.excluded(), 3);
        assert_eq!(table.total_count() + table.excluded(), values.len() as u64);
        assert_eq!(table.counts(), vec![2, 1, 0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn test_values_on_edges_go_right() {
        let config = BinningConfig::psd();
        for i in 0..200 {
            let edge = config.edge(i);
            assert_eq!(config.bin_index(edge), Some(i), "edge {i} = {edge}");
        }
    }

    #[test]
    fn test_centers() {
        let config = BinningConfig::new(4, 0.0, 2.0).unwrap();
        let table = HistogramTable::from_values([0.1, 1.9], &config);
        assert_eq!(table.centers(), vec![0.25, 0.75, 1.25, 1.75]);
        assert_eq!(table.counts(), vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_deterministic() {
        let values: Vec<f64> = (0..1000).map(|i| f64::from(i) * 0.0013).collect();
        let a = HistogramTable::from_values(values.iter().copied(), &BinningConfig::psd());
        let b = HistogramTable::from_values(values.iter().copied(), &BinningConfig::psd());
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_binning() {
        assert!(BinningConfig::new(0, 0.0, 1.0).is_err());
        assert!(BinningConfig::new(10, 1.0, 1.0).is_err());
        assert!(BinningConfig::new(10, 2.0, 1.0).is_err());
        assert!(BinningConfig::new(10, 0.0, f64::INFINITY).is_err());
        assert!(BinningConfig::new(10, f64::NAN, 1.0).is_err());
        assert!(matches!(
            BinningConfig::new(0, 0.0, 1.0),
            Err(Error::InvalidBinning { bins: 0, .. })
        ));
    }

    #[test]
    fn test_overflowing_range_rejected() {
        assert!(matches!(
            BinningConfig::new(4, -1e308, 1e308),
            Err(Error::InvalidBinning { bins: 4, .. })
        ));
        // Widest range that still has a finite width.
        let config = BinningConfig::new(4, -8e307, 8e307).unwrap();
        assert!(config.width().is_finite());
        let table = HistogramTable::from_values([0.0, 5e307, -5e307], &config);
        assert_eq!(table.counts(), vec![1, 0, 1, 1]);
    }
}
