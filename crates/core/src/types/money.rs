//! Money amounts in rupees, backed by decimal arithmetic.
//!
//! All pricing math stays in full precision; rounding to two places
//! happens only when an amount is displayed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::weight::Weight;

/// A rupee amount.
///
/// Prices on the catalog are quoted per 100g of product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rupees(Decimal);

impl Rupees {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount (full precision).
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price a weight at this per-100g rate: `rate * grams / 100`.
    ///
    /// No rounding; full precision is kept for further arithmetic.
    #[must_use]
    pub fn for_weight(&self, weight: Weight) -> Self {
        Self(self.0 * Decimal::from(weight.grams()) / Decimal::ONE_HUNDRED)
    }
}

impl std::ops::Add for Rupees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Rupees {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Rupees {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl std::ops::Mul<Decimal> for Rupees {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self(self.0 * rhs)
    }
}

impl From<Decimal> for Rupees {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Rupees {
    /// Renders with the rupee sign, rounded to two places for display only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\u{20b9}{:.2}", self.0.round_dp(2))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_for_weight_prices_per_100g() {
        let rate = Rupees::new(dec!(200));
        let w = Weight::new(150).unwrap();
        assert_eq!(rate.for_weight(w), Rupees::new(dec!(300)));
    }

    #[test]
    fn test_for_weight_linear() {
        let rate = Rupees::new(dec!(123.45));
        let w = Weight::new(150).unwrap();
        let double = Weight::new(300).unwrap();
        assert_eq!(
            rate.for_weight(w) + rate.for_weight(w),
            rate.for_weight(double)
        );
    }

    #[test]
    fn test_sum() {
        let total: Rupees = [dec!(1.50), dec!(2.25), dec!(3)]
            .into_iter()
            .map(Rupees::new)
            .sum();
        assert_eq!(total, Rupees::new(dec!(6.75)));
    }

    #[test]
    fn test_display_rounds_to_two_places() {
        assert_eq!(Rupees::new(dec!(10)).to_string(), "\u{20b9}10.00");
        assert_eq!(Rupees::new(dec!(10.506)).to_string(), "\u{20b9}10.51");
        assert_eq!(Rupees::new(dec!(0.999)).to_string(), "\u{20b9}1.00");
    }

    #[test]
    fn test_display_does_not_mutate_precision() {
        let r = Rupees::new(dec!(10.506));
        let _ = r.to_string();
        assert_eq!(r.amount(), dec!(10.506));
    }

    #[test]
    fn test_serde_transparent() {
        let r: Rupees = serde_json::from_str("199.5").unwrap();
        assert_eq!(r, Rupees::new(dec!(199.5)));
    }
}
