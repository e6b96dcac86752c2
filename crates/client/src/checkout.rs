//! The checkout orchestrator.
//!
//! Converts the cart ledger into a sequence of purchase requests, one
//! per line, in ledger order. Requests are strictly sequential: request
//! `i + 1` does not start until request `i` has completed. The first
//! failure aborts the remainder and leaves the cart intact; the server
//! keeps whatever purchases were already recorded (no rollback). Only
//! when every request succeeds is the cart cleared and its durable copy
//! erased.
//!
//! There are no retries and no cancellation once submission begins; the
//! only timeout is the transport's.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, instrument, warn};

use sweetshop_core::SweetId;

use crate::api::{ApiClient, PurchaseReceipt};
use crate::cart::Cart;
use crate::error::ApiError;
use crate::storage::{StateStore, StoreError};

/// Where the purchase requests go.
///
/// [`ApiClient`] is the production implementation; tests drive the
/// orchestrator with in-memory fakes.
#[async_trait]
pub trait PurchaseGateway {
    /// Record one purchase of `quantity` 100g units of a product.
    async fn purchase(
        &self,
        sweet_id: SweetId,
        quantity: u32,
    ) -> Result<PurchaseReceipt, ApiError>;
}

#[async_trait]
impl PurchaseGateway for ApiClient {
    async fn purchase(
        &self,
        sweet_id: SweetId,
        quantity: u32,
    ) -> Result<PurchaseReceipt, ApiError> {
        self.purchase_sweet(sweet_id, quantity).await
    }
}

/// Checkout lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// No submission in progress.
    #[default]
    Idle,
    /// Purchase requests are being issued sequentially.
    Submitting,
    /// Every line was purchased; the cart has been cleared.
    Succeeded,
    /// A request failed; remaining requests were aborted and the cart
    /// retains all of its lines.
    Failed,
}

/// Errors from checkout submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was initiated on an empty cart; no request was issued.
    #[error("cart is empty")]
    EmptyCart,

    /// A purchase request failed mid-sequence. `submitted` lines were
    /// already recorded server-side; the cart still holds every line.
    #[error("purchase failed after {submitted} item(s): {source}")]
    Purchase {
        /// Lines successfully purchased before the failure.
        submitted: usize,
        /// The failing request's error.
        #[source]
        source: ApiError,
    },

    /// The durable cart copy could not be written or erased.
    #[error("cart storage error: {0}")]
    Store(#[from] StoreError),
}

/// The sequential purchase-submission state machine.
#[derive(Debug, Default)]
pub struct CheckoutOrchestrator {
    state: CheckoutState,
}

impl CheckoutOrchestrator {
    /// A fresh orchestrator in the `Idle` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// Submit the cart as one purchase request per line, in order.
    ///
    /// The cart is persisted to `store` before the first request (the
    /// payment boundary) and erased again only on full success.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] if the cart has no lines; the
    ///   state remains `Idle` and nothing is sent.
    /// - [`CheckoutError::Purchase`] on the first failing request; the
    ///   remaining requests are never issued and the cart is untouched.
    /// - [`CheckoutError::Store`] if the durable cart copy cannot be
    ///   written or erased.
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub async fn submit<G>(
        &mut self,
        gateway: &G,
        cart: &mut Cart,
        store: &StateStore,
    ) -> Result<Vec<PurchaseReceipt>, CheckoutError>
    where
        G: PurchaseGateway + Sync,
    {
        if cart.is_empty() {
            warn!("Checkout initiated on an empty cart");
            return Err(CheckoutError::EmptyCart);
        }

        // Checkout initiation: the cart crosses to the payment step
        // through durable storage.
        store.save_cart(cart)?;
        self.state = CheckoutState::Submitting;

        let mut receipts = Vec::with_capacity(cart.len());
        for (submitted, line) in cart.lines().iter().enumerate() {
            let quantity = line.weight.purchase_units();
            match gateway.purchase(line.sweet_id, quantity).await {
                Ok(receipt) => {
                    info!(
                        sweet_id = %line.sweet_id,
                        quantity,
                        remaining_stock = receipt.remaining_stock,
                        "Purchased cart line"
                    );
                    receipts.push(receipt);
                }
                Err(source) => {
                    self.state = CheckoutState::Failed;
                    warn!(
                        sweet_id = %line.sweet_id,
                        submitted,
                        error = %source,
                        "Checkout aborted; earlier purchases stand"
                    );
                    return Err(CheckoutError::Purchase { submitted, source });
                }
            }
        }

        self.state = CheckoutState::Succeeded;
        cart.clear();
        store.erase_cart()?;
        info!(purchases = receipts.len(), "Checkout complete");

        Ok(receipts)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal_macros::dec;

    use sweetshop_core::{Rupees, Weight};

    use crate::cart::tests::sweet;
    use crate::storage::keys;

    use super::*;

    /// Gateway that records calls and fails at a chosen position.
    struct FakeGateway {
        calls: Mutex<Vec<(SweetId, u32)>>,
        fail_at: Option<usize>,
    }

    impl FakeGateway {
        fn succeeding() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: None,
            }
        }

        fn failing_at(index: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: Some(index),
            }
        }

        fn calls(&self) -> Vec<(SweetId, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PurchaseGateway for FakeGateway {
        async fn purchase(
            &self,
            sweet_id: SweetId,
            quantity: u32,
        ) -> Result<PurchaseReceipt, ApiError> {
            let mut calls = self.calls.lock().unwrap();
            let position = calls.len();
            calls.push((sweet_id, quantity));

            if self.fail_at == Some(position) {
                return Err(ApiError::Rejection {
                    status: 400,
                    detail: "Insufficient stock. Only 1 available".to_string(),
                });
            }

            Ok(PurchaseReceipt {
                message: "Purchase successful".to_string(),
                sweet_name: "kaju".to_string(),
                quantity_purchased: quantity,
                total_price: Rupees::new(dec!(200)),
                remaining_stock: 5,
            })
        }
    }

    fn three_line_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_line(&sweet(1, "kaju", dec!(200)), Weight::new(100).unwrap());
        cart.add_line(&sweet(2, "ladoo", dec!(120)), Weight::new(150).unwrap());
        cart.add_line(&sweet(3, "barfi", dec!(90)), Weight::new(300).unwrap());
        cart
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let gateway = FakeGateway::succeeding();
        let mut orchestrator = CheckoutOrchestrator::new();
        let mut cart = Cart::new();

        let result = orchestrator.submit(&gateway, &mut cart, &store).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert!(gateway.calls().is_empty());
        assert_eq!(orchestrator.state(), CheckoutState::Idle);
    }

    #[tokio::test]
    async fn test_success_purchases_in_ledger_order_with_rounded_units() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let gateway = FakeGateway::succeeding();
        let mut orchestrator = CheckoutOrchestrator::new();
        let mut cart = three_line_cart();

        let receipts = orchestrator
            .submit(&gateway, &mut cart, &store)
            .await
            .unwrap();

        // One request per line, in order; 150g rounds up to 2 units
        assert_eq!(
            gateway.calls(),
            vec![
                (SweetId::new(1), 1),
                (SweetId::new(2), 2),
                (SweetId::new(3), 3),
            ]
        );
        assert_eq!(receipts.len(), 3);
        assert!(cart.is_empty());
        assert_eq!(orchestrator.state(), CheckoutState::Succeeded);
        // Durable cart copy is erased
        assert!(store.load_cart().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mid_sequence_failure_aborts_and_keeps_cart() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let gateway = FakeGateway::failing_at(1);
        let mut orchestrator = CheckoutOrchestrator::new();
        let mut cart = three_line_cart();

        let result = orchestrator.submit(&gateway, &mut cart, &store).await;

        // First purchase stands, second failed, third was never sent
        assert_eq!(gateway.calls().len(), 2);
        match result {
            Err(CheckoutError::Purchase { submitted, .. }) => assert_eq!(submitted, 1),
            other => panic!("expected purchase failure, got {other:?}"),
        }
        assert_eq!(cart.len(), 3);
        assert_eq!(orchestrator.state(), CheckoutState::Failed);
        // The persisted copy from checkout initiation is still there
        assert_eq!(store.load_cart().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_cart_persisted_at_initiation() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let gateway = FakeGateway::failing_at(0);
        let mut orchestrator = CheckoutOrchestrator::new();
        let mut cart = three_line_cart();

        let _ = orchestrator.submit(&gateway, &mut cart, &store).await;

        let persisted = store.load_cart().unwrap();
        assert_eq!(persisted.lines(), cart.lines());
        assert!(store.get::<serde_json::Value>(keys::CART).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_auth_expiry_surfaces_through_checkout() {
        struct ExpiredGateway;

        #[async_trait]
        impl PurchaseGateway for ExpiredGateway {
            async fn purchase(
                &self,
                _sweet_id: SweetId,
                _quantity: u32,
            ) -> Result<PurchaseReceipt, ApiError> {
                Err(ApiError::AuthExpired)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let mut orchestrator = CheckoutOrchestrator::new();
        let mut cart = three_line_cart();

        let result = orchestrator.submit(&ExpiredGateway, &mut cart, &store).await;
        match result {
            Err(CheckoutError::Purchase { submitted, source }) => {
                assert_eq!(submitted, 0);
                assert!(source.is_auth_expired());
            }
            other => panic!("expected purchase failure, got {other:?}"),
        }
    }
}
