//! PSD threshold filtering.

use psdkit_core::EventBatch;
use serde::{Deserialize, Serialize};

/// Default PSD threshold.
pub const DEFAULT_PSD_THRESHOLD: f64 = 0.1474;

/// PSD cut applied before binning.
///
/// The same filtered subset feeds both the PSD histogram and the energy
/// spectrum, so enabling the cut restricts the spectrum to one pulse-shape
/// population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsdFilter {
    /// Whether the cut is applied at all.
    pub enabled: bool,
    /// Events with `psd > threshold` pass. Not clamped to `[0, 1]`.
    pub threshold: f64,
}

impl Default for PsdFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_PSD_THRESHOLD,
        }
    }
}

impl PsdFilter {
    /// A filter that passes every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// An enabled filter with the given threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            enabled: true,
            threshold,
        }
    }

    /// Applies the cut to `events`.
    #[must_use]
    pub fn apply(&self, events: &EventBatch) -> EventBatch {
        apply_threshold(events, self.enabled, self.threshold)
    }
}

/// Returns the events with `psd > threshold`, or all of them if `enabled` is false.
#[must_use]
pub fn apply_threshold(events: &EventBatch, enabled: bool, threshold: f64) -> EventBatch {
    if !enabled {
        return events.clone();
    }
    let filtered = events.select(|event| event.psd > threshold);
    log::debug!(
        "psd > {threshold}: kept {} of {} events",
        filtered.len(),
        events.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use psdkit_core::DerivedEvent;

    fn batch(pairs: &[(i32, i32)]) -> EventBatch {
        pairs
            .iter()
            .map(|&(l, s)| DerivedEvent::from_charges(l, s))
            .collect()
    }

    #[test]
    fn test_disabled_returns_all() {
        let events = batch(&[(1000, 300), (1000, 990), (1000, 1000)]);
        assert_eq!(apply_threshold(&events, false, 0.5), events);
        assert_eq!(PsdFilter::disabled().apply(&events), events);
    }

    #[test]
    fn test_strictly_greater() {
        // psd = 0.7, 0.5, 0.25
        let events = batch(&[(1000, 300), (1000, 500), (1000, 750)]);
        let kept = apply_threshold(&events, true, 0.5);
        assert_eq!(kept.q_short, vec![300]);
    }

    #[test]
    fn test_partition_property() {
        let events = batch(&[
            (1000, 100),
            (1000, 852),
            (1000, 853),
            (1000, 999),
            (500, 0),
            (800, 700),
        ]);
        for threshold in [0.0, 0.1474, 0.5, 0.9, 1.0] {
            let kept = apply_threshold(&events, true, threshold);
            assert!(kept.psd.iter().all(|&p| p > threshold));
            let dropped = events.select(|e| e.psd <= threshold);
            assert_eq!(kept.len() + dropped.len(), events.len());
            assert!(dropped.psd.iter().all(|&p| p <= threshold));
        }
    }

    #[test]
    fn test_threshold_not_clamped() {
        let events = batch(&[(1000, 300), (1000, 1200)]);
        assert_eq!(apply_threshold(&events, true, -1.0).len(), 2);
        assert!(apply_threshold(&events, true, 2.0).is_empty());
    }

    #[test]
    fn test_defaults() {
        let filter = PsdFilter::default();
        assert!(filter.enabled);
        assert!((filter.threshold - 0.1474).abs() < f64::EPSILON);
    }
}
