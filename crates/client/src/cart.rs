//! The cart ledger: an ordered list of line items with captured prices.
//!
//! Lines keep the unit price snapshotted at add time; a later catalog
//! refresh never re-prices a cart. Order reflects insertion order. The
//! ledger is pure state - persistence happens only at the checkout
//! boundary (see [`crate::storage`]) and rendering elsewhere.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sweetshop_core::{Rupees, SweetId, Weight};

use crate::api::Sweet;

/// Errors from cart ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The given line index does not name a current line.
    #[error("no cart line at position {0}")]
    OutOfRange(usize),
}

/// One product's entry in the cart.
///
/// Serializes as the same JSON object the durable `cart` key stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line refers to.
    pub sweet_id: SweetId,
    /// Product name at add time.
    pub name: String,
    /// Unit price per 100g, captured at add time and never refreshed.
    pub price: Rupees,
    /// Selected weight.
    pub weight: Weight,
    /// Image reference for display.
    pub img: String,
}

impl CartLine {
    /// This line's price: `unit price * weight / 100`, full precision.
    #[must_use]
    pub fn line_total(&self) -> Rupees {
        self.price.for_weight(self.weight)
    }
}

/// The cart ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `weight` of a product to the cart.
    ///
    /// If a line for the same product already exists its weight grows by
    /// `weight`; otherwise a new line is appended with the product's
    /// current price and image captured.
    pub fn add_line(&mut self, sweet: &Sweet, weight: Weight) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.sweet_id == sweet.id) {
            line.weight = line.weight.combined(weight);
            return;
        }
        self.lines.push(CartLine {
            sweet_id: sweet.id,
            name: sweet.name.clone(),
            price: sweet.price,
            weight,
            img: sweet.img.clone(),
        });
    }

    /// Grow the line at `index` by one weight step.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] if `index` is not a current line.
    pub fn increase_weight(&mut self, index: usize) -> Result<Weight, CartError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::OutOfRange(index))?;
        line.weight = line.weight.increased();
        Ok(line.weight)
    }

    /// Shrink the line at `index` by one weight step.
    ///
    /// Shrinking a line already at the minimum weight is a no-op, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] if `index` is not a current line.
    pub fn decrease_weight(&mut self, index: usize) -> Result<Weight, CartError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::OutOfRange(index))?;
        line.weight = line.weight.decreased();
        Ok(line.weight)
    }

    /// Remove and return the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] if `index` is not a current line.
    pub fn remove_line(&mut self, index: usize) -> Result<CartLine, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::OutOfRange(index));
        }
        Ok(self.lines.remove(index))
    }

    /// Empty the ledger (after a successful checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// True iff the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::NaiveDateTime;
    use rand::Rng;
    use rust_decimal_macros::dec;

    use super::*;

    pub(crate) fn sweet(id: i64, name: &str, price: rust_decimal::Decimal) -> Sweet {
        let ts: NaiveDateTime = "2024-01-01T00:00:00".parse().unwrap();
        Sweet {
            id: SweetId::new(id),
            name: name.to_string(),
            category: "barfi".to_string(),
            price: Rupees::new(price),
            quantity: 10,
            description: None,
            img: format!("assets/{name}.jpg"),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_add_line_appends_in_order() {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::DEFAULT);
        cart.add_line(&sweet(2, "ladoo", dec!(120)), Weight::DEFAULT);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].name, "kaju");
        assert_eq!(cart.lines()[1].name, "ladoo");
    }

    #[test]
    fn test_add_same_product_merges_weight() {
        let mut cart = Cart::new();
        let s = sweet(1, "kaju", dec!(200));
        let w1 = Weight::new(150).unwrap();
        let w2 = Weight::new(250).unwrap();
        cart.add_line(&s, w1);
        cart.add_line(&s, w2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].weight.grams(), 400);

        // Same total regardless of order
        let mut other = Cart::new();
        other.add_line(&s, w2);
        other.add_line(&s, w1);
        assert_eq!(other.lines()[0].weight, cart.lines()[0].weight);
    }

    #[test]
    fn test_price_snapshot_not_refreshed_on_merge() {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::DEFAULT);
        // Same product comes back from a refresh with a new price
        cart.add_line(&sweet(1, "kaju", dec!(250)), Weight::DEFAULT);
        assert_eq!(cart.lines()[0].price, Rupees::new(dec!(200)));
    }

    #[test]
    fn test_line_total_linear_in_weight() {
        let s = sweet(1, "kaju", dec!(200));
        let single = CartLine {
            sweet_id: s.id,
            name: s.name.clone(),
            price: s.price,
            weight: Weight::new(150).unwrap(),
            img: s.img.clone(),
        };
        let double = CartLine {
            weight: Weight::new(300).unwrap(),
            ..single.clone()
        };
        assert_eq!(
            double.line_total(),
            single.line_total() + single.line_total()
        );
    }

    #[test]
    fn test_decrease_at_minimum_is_noop() {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::DEFAULT);
        let w = cart.decrease_weight(0).unwrap();
        assert_eq!(w.grams(), 100);
    }

    #[test]
    fn test_weight_adjustments() {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::DEFAULT);
        assert_eq!(cart.increase_weight(0).unwrap().grams(), 150);
        assert_eq!(cart.increase_weight(0).unwrap().grams(), 200);
        assert_eq!(cart.decrease_weight(0).unwrap().grams(), 150);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut cart = Cart::new();
        assert_eq!(cart.increase_weight(0), Err(CartError::OutOfRange(0)));
        assert_eq!(cart.decrease_weight(3), Err(CartError::OutOfRange(3)));
        assert!(matches!(
            cart.remove_line(0),
            Err(CartError::OutOfRange(0))
        ));
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::DEFAULT);
        cart.add_line(&sweet(2, "ladoo", dec!(120)), Weight::DEFAULT);
        let removed = cart.remove_line(0).unwrap();
        assert_eq!(removed.name, "kaju");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].name, "ladoo");
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::DEFAULT);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serializes_as_json_array() {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::DEFAULT);
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored.lines(), cart.lines());
    }

    // Property: every weight in the cart stays a multiple of 50 and
    // at least 100 under random add/increase/decrease sequences.
    #[test]
    fn test_random_operation_sequences_hold_invariant() {
        let mut rng = rand::rng();
        let sweets: Vec<Sweet> = (1..=4)
            .map(|i| sweet(i, "mix", dec!(100) + rust_decimal::Decimal::from(i)))
            .collect();

        for _ in 0..50 {
            let mut cart = Cart::new();
            for _ in 0..300 {
                match rng.random_range(0..4) {
                    0 => {
                        let s = &sweets[rng.random_range(0..sweets.len())];
                        cart.add_line(s, Weight::DEFAULT);
                    }
                    1 if !cart.is_empty() => {
                        let idx = rng.random_range(0..cart.len());
                        cart.increase_weight(idx).unwrap();
                    }
                    2 if !cart.is_empty() => {
                        let idx = rng.random_range(0..cart.len());
                        cart.decrease_weight(idx).unwrap();
                    }
                    3 if !cart.is_empty() => {
                        let idx = rng.random_range(0..cart.len());
                        cart.remove_line(idx).unwrap();
                    }
                    _ => {}
                }
                for line in cart.lines() {
                    assert!(line.weight.grams() >= Weight::MIN);
                    assert_eq!(line.weight.grams() % Weight::STEP, 0);
                }
            }
        }
    }
}
