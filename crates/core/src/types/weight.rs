//! Mass-unit weight selection for priced-per-100g products.
//!
//! Weights are always a positive multiple of [`Weight::STEP`] grams and
//! never below [`Weight::MIN`]. The constructor validates; all arithmetic
//! on valid weights preserves the invariant, so holders of a `Weight`
//! never need to re-check it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a [`Weight`] out of raw grams.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    /// Below the minimum orderable weight.
    #[error("weight {0}g is below the {min}g minimum", min = Weight::MIN)]
    BelowMinimum(u32),

    /// Not aligned to the adjustment step.
    #[error("weight {0}g is not a multiple of {step}g", step = Weight::STEP)]
    NotStepAligned(u32),
}

/// A validated product weight in grams.
///
/// Prices are quoted per 100g; purchases are recorded in whole 100g
/// units (see [`Weight::purchase_units`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Weight(u32);

impl Weight {
    /// Smallest orderable weight.
    pub const MIN: u32 = 100;

    /// Granularity of weight adjustments.
    pub const STEP: u32 = 50;

    /// Grams covered by one unit of the quoted price.
    pub const PRICED_PER: u32 = 100;

    /// Default selection for a freshly listed product.
    pub const DEFAULT: Self = Self(Self::MIN);

    /// Create a weight from raw grams.
    ///
    /// # Errors
    ///
    /// Returns [`WeightError`] if `grams` is below [`Self::MIN`] or not a
    /// multiple of [`Self::STEP`].
    pub const fn new(grams: u32) -> Result<Self, WeightError> {
        if grams < Self::MIN {
            return Err(WeightError::BelowMinimum(grams));
        }
        if grams % Self::STEP != 0 {
            return Err(WeightError::NotStepAligned(grams));
        }
        Ok(Self(grams))
    }

    /// The weight in grams.
    #[must_use]
    pub const fn grams(&self) -> u32 {
        self.0
    }

    /// One step heavier.
    #[must_use]
    pub const fn increased(self) -> Self {
        Self(self.0.saturating_add(Self::STEP))
    }

    /// One step lighter, stopping at the minimum.
    ///
    /// Decreasing a weight already at [`Self::MIN`] is a no-op.
    #[must_use]
    pub const fn decreased(self) -> Self {
        if self.0 > Self::MIN {
            Self(self.0 - Self::STEP)
        } else {
            self
        }
    }

    /// The sum of two weights (used when merging cart lines).
    #[must_use]
    pub const fn combined(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Whole 100g units to purchase for this weight.
    ///
    /// The server records purchases in units of 100g, so a fractional
    /// remainder rounds up. A 150g selection purchases 2 units.
    #[must_use]
    pub const fn purchase_units(&self) -> u32 {
        self.0.div_ceil(Self::PRICED_PER)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Weight {
    type Error = WeightError;

    fn try_from(grams: u32) -> Result<Self, Self::Error> {
        Self::new(grams)
    }
}

impl From<Weight> for u32 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}g", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_new_rejects_below_minimum() {
        assert_eq!(Weight::new(50), Err(WeightError::BelowMinimum(50)));
        assert_eq!(Weight::new(0), Err(WeightError::BelowMinimum(0)));
    }

    #[test]
    fn test_new_rejects_unaligned() {
        assert_eq!(Weight::new(125), Err(WeightError::NotStepAligned(125)));
    }

    #[test]
    fn test_error_messages_name_the_limits() {
        assert_eq!(
            WeightError::BelowMinimum(50).to_string(),
            "weight 50g is below the 100g minimum"
        );
        assert_eq!(
            WeightError::NotStepAligned(125).to_string(),
            "weight 125g is not a multiple of 50g"
        );
    }

    #[test]
    fn test_decrease_at_floor_is_noop() {
        let w = Weight::DEFAULT;
        assert_eq!(w.decreased(), w);
        assert_eq!(w.decreased().grams(), 100);
    }

    #[test]
    fn test_increase_then_decrease() {
        let w = Weight::DEFAULT.increased();
        assert_eq!(w.grams(), 150);
        assert_eq!(w.decreased().grams(), 100);
    }

    #[test]
    fn test_purchase_units_round_up() {
        assert_eq!(Weight::new(100).unwrap().purchase_units(), 1);
        assert_eq!(Weight::new(150).unwrap().purchase_units(), 2);
        assert_eq!(Weight::new(200).unwrap().purchase_units(), 2);
        assert_eq!(Weight::new(250).unwrap().purchase_units(), 3);
        assert_eq!(Weight::new(400).unwrap().purchase_units(), 4);
    }

    #[test]
    fn test_combined() {
        let a = Weight::new(150).unwrap();
        let b = Weight::new(250).unwrap();
        assert_eq!(a.combined(b).grams(), 400);
        assert_eq!(a.combined(b), b.combined(a));
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let w: Weight = serde_json::from_str("150").unwrap();
        assert_eq!(w.grams(), 150);
        assert!(serde_json::from_str::<Weight>("75").is_err());
        assert_eq!(serde_json::to_string(&w).unwrap(), "150");
    }

    #[test]
    fn test_display() {
        assert_eq!(Weight::DEFAULT.to_string(), "100g");
    }

    // Property: any sequence of adjustments keeps the weight a multiple
    // of the step and at or above the minimum.
    #[test]
    fn test_random_adjustment_sequences_hold_invariant() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let mut w = Weight::DEFAULT;
            for _ in 0..200 {
                w = match rng.random_range(0..3) {
                    0 => w.increased(),
                    1 => w.decreased(),
                    _ => w.combined(Weight::DEFAULT),
                };
                assert!(w.grams() >= Weight::MIN);
                assert_eq!(w.grams() % Weight::STEP, 0);
            }
        }
    }
}
