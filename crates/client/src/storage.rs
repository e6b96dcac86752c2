//! Durable client-side key-value storage.
//!
//! A single JSON file in the configured state directory plays the role
//! of the browser's persistent storage: the session token and role live
//! here, and the serialized cart crosses the checkout boundary through
//! it (written at checkout initiation, erased after successful payment).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cart::Cart;

const STATE_FILE: &str = "state.json";

/// Storage keys.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the session role.
    pub const ROLE: &str = "role";

    /// Key for the serialized cart (JSON array of cart lines).
    pub const CART: &str = "cart";
}

/// Errors from reading or writing the state file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file holds something that is not valid JSON.
    #[error("state file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// File-backed key-value store.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Open a store rooted at `dir`. The directory and file are created
    /// lazily on first write.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_FILE),
        }
    }

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if the stored value does not
    /// deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let map = self.read_map()?;
        map.get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O or serialization failure.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_map(&map)
    }

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    /// Drop every stored key (full session teardown).
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    // =========================================================================
    // Cart boundary
    // =========================================================================

    /// Persist the cart for the payment step.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O or serialization failure.
    pub fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        self.set(keys::CART, cart)
    }

    /// Read back the persisted cart. An absent key is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a corrupt stored cart.
    pub fn load_cart(&self) -> Result<Cart, StoreError> {
        Ok(self.get::<Cart>(keys::CART)?.unwrap_or_default())
    }

    /// Erase the persisted cart after successful payment.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn erase_cart(&self) -> Result<(), StoreError> {
        self.remove(keys::CART)
    }

    // =========================================================================
    // File plumbing
    // =========================================================================

    fn read_map(&self) -> Result<BTreeMap<String, serde_json::Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, serde_json::Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}
