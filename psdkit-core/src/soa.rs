//! Structure of Arrays (`SoA`) storage for derived events.
//!
//! `EventBatch` keeps each event field in its own vector, which is the shape
//! the binning and export stages consume (`q_long` for the spectrum, `psd`
//! for the PSD histogram).

use crate::event::DerivedEvent;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A batch of derived events stored in Structure of Arrays (`SoA`) format.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventBatch {
    /// Columnar storage for long-gate charge.
    pub q_long: Vec<i32>,
    /// Columnar storage for short-gate charge.
    pub q_short: Vec<i32>,
    /// Columnar storage for the PSD ratio.
    pub psd: Vec<f64>,
}

impl EventBatch {
    /// Creates a new empty batch with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            q_long: Vec::with_capacity(capacity),
            q_short: Vec::with_capacity(capacity),
            psd: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of events in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.psd.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.psd.is_empty()
    }

    /// Pushes a single event into the batch.
    pub fn push(&mut self, event: DerivedEvent) {
        self.q_long.push(event.q_long);
        self.q_short.push(event.q_short);
        self.psd.push(event.psd);
    }

    /// Returns the event at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<DerivedEvent> {
        Some(DerivedEvent {
            q_long: *self.q_long.get(index)?,
            q_short: *self.q_short.get(index)?,
            psd: *self.psd.get(index)?,
        })
    }

    /// Returns an iterator over the events as row values.
    pub fn iter(&self) -> impl Iterator<Item = DerivedEvent> + '_ {
        self.q_long
            .iter()
            .zip(&self.q_short)
            .zip(&self.psd)
            .map(|((&q_long, &q_short), &psd)| DerivedEvent {
                q_long,
                q_short,
                psd,
            })
    }

    /// Returns a new batch holding the events for which `keep` returns true.
    #[must_use]
    pub fn select<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&DerivedEvent) -> bool,
    {
        self.iter().filter(|event| keep(event)).collect()
    }

    /// Long-gate charges as `f64`, the spectrum axis.
    pub fn q_long_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.q_long.iter().map(|&q| f64::from(q))
    }
}

impl FromIterator<DerivedEvent> for EventBatch {
    fn from_iter<I: IntoIterator<Item = DerivedEvent>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut batch = Self::with_capacity(iter.size_hint().0);
        for event in iter {
            batch.push(event);
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_batch_operations() {
        let mut batch = EventBatch::with_capacity(4);
        assert!(batch.is_empty());

        batch.push(DerivedEvent::from_charges(1000, 300));
        batch.push(DerivedEvent::from_charges(2000, 1800));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.q_long, vec![1000, 2000]);
        assert_eq!(batch.get(0).map(|e| e.q_short), Some(300));
        assert!(batch.get(2).is_none());
    }

    #[test]
    fn test_select_keeps_order() {
        let batch: EventBatch = [(1000, 300), (1000, 950), (500, 100)]
            .into_iter()
            .map(|(l, s)| DerivedEvent::from_charges(l, s))
            .collect();

        let kept = batch.select(|e| e.psd > 0.5);
        assert_eq!(kept.q_long, vec![1000, 500]);
        assert_eq!(kept.len(), 2);
        // Source batch untouched.
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_q_long_values() {
        let batch: EventBatch = [DerivedEvent::from_charges(42, 0)].into_iter().collect();
        let values: Vec<f64> = batch.q_long_values().collect();
        assert_eq!(values, vec![42.0]);
    }
}
