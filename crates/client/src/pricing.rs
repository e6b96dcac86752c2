//! Order pricing: subtotal, delivery fee, GST, and grand total.
//!
//! A pure function of the cart ledger's current lines. Orders above the
//! free-delivery threshold ship free; everything else pays a flat fee.
//! GST applies to the subtotal only. Note that pricing never rejects an
//! empty cart - it quotes `40` (the bare delivery fee) - so checkout
//! must guard on [`Cart::is_empty`] itself.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use sweetshop_core::Rupees;

use crate::cart::{Cart, CartLine};

/// Subtotals strictly above this amount ship free.
pub const FREE_DELIVERY_THRESHOLD: Decimal = dec!(500);

/// Flat delivery fee below the threshold.
pub const DELIVERY_FEE: Decimal = dec!(40);

/// GST rate applied to the subtotal.
pub const GST_RATE: Decimal = dec!(0.05);

/// Derived order totals. Recomputed from the cart on demand, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sum of all line totals.
    pub subtotal: Rupees,
    /// Zero when the subtotal clears the free-delivery threshold.
    pub delivery_fee: Rupees,
    /// GST on the subtotal.
    pub gst: Rupees,
    /// `subtotal + delivery_fee + gst`.
    pub total: Rupees,
}

impl OrderSummary {
    /// Quote the current cart.
    #[must_use]
    pub fn quote(cart: &Cart) -> Self {
        let subtotal: Rupees = cart.lines().iter().map(CartLine::line_total).sum();

        let delivery_fee = if subtotal.amount() > FREE_DELIVERY_THRESHOLD {
            Rupees::ZERO
        } else {
            Rupees::new(DELIVERY_FEE)
        };

        let gst = subtotal * GST_RATE;
        let total = subtotal + delivery_fee + gst;

        Self {
            subtotal,
            delivery_fee,
            gst,
            total,
        }
    }

    /// True when the order qualifies for free delivery.
    #[must_use]
    pub fn free_delivery(&self) -> bool {
        self.delivery_fee == Rupees::ZERO
    }
}
