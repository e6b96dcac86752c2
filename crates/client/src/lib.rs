//! Sweetshop Client - headless storefront client library.
//!
//! Everything the browser storefront did, minus the browser: a typed
//! REST client for the Sweetshop API, the in-memory catalog and cart,
//! pure order pricing, the sequential checkout orchestrator, and the
//! durable key-value state that stands in for browser storage.
//!
//! # Architecture
//!
//! - [`api`] - typed REST client (`reqwest`), short-TTL `moka` cache
//!   for catalog listings
//! - [`catalog`] - last-fetched listing plus transient weight selections
//! - [`cart`] - the cart ledger, pure state with captured unit prices
//! - [`pricing`] - derived order summary (subtotal, delivery fee, GST)
//! - [`checkout`] - the `Idle → Submitting → Succeeded | Failed`
//!   purchase-submission state machine
//! - [`session`] / [`storage`] - auth token lifecycle and the file-backed
//!   key-value store
//!
//! All work runs on one logical thread of control: network calls
//! suspend the calling task, and the checkout loop is the only place
//! with an explicit ordering guarantee (strictly sequential requests).
//!
//! # Example
//!
//! ```rust,ignore
//! use sweetshop_client::{
//!     ApiClient, Cart, CheckoutOrchestrator, ClientConfig, OrderSummary, StateStore,
//! };
//!
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config)?;
//! let store = StateStore::new(&config.state_dir);
//!
//! let mut cart = store.load_cart()?;
//! let summary = OrderSummary::quote(&cart);
//!
//! let mut checkout = CheckoutOrchestrator::new();
//! checkout.submit(&client, &mut cart, &store).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod pricing;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use cart::{Cart, CartError, CartLine};
pub use catalog::{Catalog, CatalogEntry, CatalogError, CatalogSource};
pub use checkout::{CheckoutError, CheckoutOrchestrator, CheckoutState, PurchaseGateway};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use pricing::OrderSummary;
pub use session::Session;
pub use storage::{StateStore, StoreError};
