//! Command implementations.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod history;

use thiserror::Error;

use sweetshop_client::error::ApiError;
use sweetshop_client::{
    ApiClient, CartError, CatalogError, CheckoutError, ConfigError, Session, StateStore,
    StoreError,
};
use sweetshop_core::WeightError;

/// Shared handles for every command.
pub struct Context {
    /// The API client, with the stored token attached if one exists.
    pub api: ApiClient,
    /// Durable key-value state (session + cart).
    pub store: StateStore,
}

/// Errors surfaced to the user by any command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid weight: {0}")]
    InvalidWeight(#[from] WeightError),

    #[error("not logged in; run `sweetshop login` first")]
    NotLoggedIn,

    #[error("{0} is out of stock")]
    OutOfStock(String),
}

impl CliError {
    /// Whether the stored session must be torn down.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        match self {
            Self::Api(api) => api.is_auth_expired(),
            Self::Checkout(CheckoutError::Purchase { source, .. }) => source.is_auth_expired(),
            _ => false,
        }
    }
}

/// Commands behind the login gate call this first.
pub fn require_session(ctx: &Context) -> Result<Session, CliError> {
    Session::load(&ctx.store)?.ok_or(CliError::NotLoggedIn)
}
