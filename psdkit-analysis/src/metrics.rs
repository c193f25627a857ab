//! PSD metric computation and event validation.
//!
//! Every record yields a [`DerivedEvent`] and an [`EventValidity`]. Two stages
//! decide validity, in order:
//!
//! 1. finiteness: `1 - q_short / q_long` must be finite (rules out `q_long == 0`)
//! 2. positivity: `q_long > 0` and `q_short >= 0`
//!
//! Failing events are dropped from all downstream stages without raising an error.

use psdkit_core::{DerivedEvent, EventBatch, RawEventRecord};
use serde::Serialize;

/// Outcome of validating one derived event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventValidity {
    /// Event takes part in filtering and binning.
    Valid,
    /// The PSD ratio is NaN or infinite.
    NonFinite,
    /// The ratio is finite but a charge is out of its physical range.
    NonPositiveCharge,
}

impl EventValidity {
    /// Classifies an event by the two validation stages.
    #[must_use]
    pub fn of(event: &DerivedEvent) -> Self {
        if !event.is_finite() {
            Self::NonFinite
        } else if !event.has_physical_charges() {
            Self::NonPositiveCharge
        } else {
            Self::Valid
        }
    }

    /// Returns true for [`EventValidity::Valid`].
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

/// Per-outcome event counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidityCounts {
    /// Events that passed both stages.
    pub valid: usize,
    /// Events dropped by the finiteness stage.
    pub non_finite: usize,
    /// Events dropped by the positivity stage.
    pub non_positive: usize,
}

impl ValidityCounts {
    /// Total number of classified events.
    #[must_use]
    pub fn total(&self) -> usize {
        self.valid + self.non_finite + self.non_positive
    }

    /// Number of events excluded by either stage.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.non_finite + self.non_positive
    }
}

/// Derived events with a parallel validity flag per event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricReport {
    /// One event per input, in input order.
    pub events: Vec<DerivedEvent>,
    /// Validity of `events[i]`.
    pub validity: Vec<EventValidity>,
}

impl MetricReport {
    /// Number of classified events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events were classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Collects the events that passed both validation stages.
    #[must_use]
    pub fn valid_events(&self) -> EventBatch {
        self.events
            .iter()
            .zip(&self.validity)
            .filter(|(_, validity)| validity.is_valid())
            .map(|(event, _)| *event)
            .collect()
    }

    /// Tallies the validity outcomes.
    #[must_use]
    pub fn counts(&self) -> ValidityCounts {
        let mut counts = ValidityCounts::default();
        for validity in &self.validity {
            match validity {
                EventValidity::Valid => counts.valid += 1,
                EventValidity::NonFinite => counts.non_finite += 1,
                EventValidity::NonPositiveCharge => counts.non_positive += 1,
            }
        }
        counts
    }
}

impl FromIterator<DerivedEvent> for MetricReport {
    fn from_iter<I: IntoIterator<Item = DerivedEvent>>(iter: I) -> Self {
        let events: Vec<DerivedEvent> = iter.into_iter().collect();
        let validity = events.iter().map(EventValidity::of).collect();
        Self { events, validity }
    }
}

/// Computes the PSD metric and validity for each record.
#[must_use]
pub fn compute_metrics(records: &[RawEventRecord]) -> MetricReport {
    compute_metrics_from_charges(records.iter().map(|r| (r.q_long, r.q_short)))
}

/// Computes the PSD metric and validity for `(q_long, q_short)` pairs.
pub fn compute_metrics_from_charges<I>(charges: I) -> MetricReport
where
    I: IntoIterator<Item = (i32, i32)>,
{
    charges
        .into_iter()
        .map(|(q_long, q_short)| DerivedEvent::from_charges(q_long, q_short))
        .collect()
}
