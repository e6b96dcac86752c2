//! Session state: the bearer token and role issued at login.
//!
//! A session exists from successful login/registration until logout or
//! an authentication rejection. Its presence gates catalog and cart
//! commands. The token is held as a `SecretString` and redacted from
//! `Debug` output.

use secrecy::{ExposeSecret, SecretString};

use sweetshop_core::Role;

use crate::api::Token;
use crate::storage::{StateStore, StoreError, keys};

/// The authenticated-user context.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    role: Role,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl Session {
    /// Create a session from a raw token and role.
    #[must_use]
    pub const fn new(token: SecretString, role: Role) -> Self {
        Self { token, role }
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// The role granted at login.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether this session may use admin commands. The server enforces
    /// this independently.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Write the session to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure.
    pub fn persist(&self, store: &StateStore) -> Result<(), StoreError> {
        store.set(keys::TOKEN, &self.token.expose_secret())?;
        store.set(keys::ROLE, &self.role)
    }

    /// Read the session back from durable storage, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure or a corrupt stored role.
    pub fn load(store: &StateStore) -> Result<Option<Self>, StoreError> {
        let Some(token) = store.get::<String>(keys::TOKEN)? else {
            return Ok(None);
        };
        let role = store.get::<Role>(keys::ROLE)?.unwrap_or_default();
        Ok(Some(Self::new(SecretString::from(token), role)))
    }

    /// Tear down the session: drop all durable state, including any
    /// pending cart (logout and auth-expiry path).
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure.
    pub fn destroy(store: &StateStore) -> Result<(), StoreError> {
        store.clear()
    }
}

impl From<Token> for Session {
    fn from(token: Token) -> Self {
        Self::new(SecretString::from(token.access_token), token.role)
    }
}
