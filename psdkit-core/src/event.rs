//! Derived event types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Charge pair and pulse-shape metric derived from one record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivedEvent {
    /// Charge integrated over the long gate.
    pub q_long: i32,
    /// Charge integrated over the short gate.
    pub q_short: i32,
    /// Tail fraction `1 - q_short / q_long`. May be non-finite before validation.
    pub psd: f64,
}

impl DerivedEvent {
    /// Derives an event from a charge pair.
    ///
    /// The ratio is taken in `f64`, so `q_long == 0` yields a non-finite `psd`
    /// rather than a panic.
    #[inline]
    #[must_use]
    pub fn from_charges(q_long: i32, q_short: i32) -> Self {
        let psd = 1.0 - f64::from(q_short) / f64::from(q_long);
        Self {
            q_long,
            q_short,
            psd,
        }
    }

    /// Returns true if the ratio produced a finite value.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.psd.is_finite()
    }

    /// Returns true if both charges satisfy `q_long > 0` and `q_short >= 0`.
    #[inline]
    #[must_use]
    pub fn has_physical_charges(&self) -> bool {
        self.q_long > 0 && self.q_short >= 0
    }
}
