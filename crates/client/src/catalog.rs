//! The catalog cache: the last-fetched product list plus per-entry
//! weight selections.
//!
//! Entries are replaced wholesale on every successful refresh; a failed
//! refresh leaves the previous entries untouched and surfaces the
//! error. The weight selection is transient UI state - it defaults to
//! 100g, steps by 50g, and resets when the entry is added to the cart.
//! Selections are part of the library surface for interactive frontends
//! that step a weight before adding; the bundled CLI passes an explicit
//! weight to `cart add` instead and only uses [`Catalog::refresh`].

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

use sweetshop_core::{SweetId, Weight};

use crate::api::{ApiClient, CatalogFilter, Sweet};
use crate::error::ApiError;

/// Where catalog listings come from.
///
/// [`ApiClient`] is the production implementation; tests feed the
/// catalog from in-memory fakes.
#[async_trait]
pub trait CatalogSource {
    /// Fetch the listing matching `filter` (empty filter = everything).
    async fn fetch(&self, filter: &CatalogFilter) -> Result<Vec<Sweet>, ApiError>;
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch(&self, filter: &CatalogFilter) -> Result<Vec<Sweet>, ApiError> {
        self.search_sweets(filter).await
    }
}

/// Errors from catalog entry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No entry with this ID in the current listing.
    #[error("no catalog entry for sweet {0}")]
    UnknownSweet(SweetId),
}

/// A product plus its transient weight selection.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// The product as last fetched.
    pub sweet: Sweet,
    /// Weight currently selected for this entry.
    pub selected_weight: Weight,
}

/// The catalog cache.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the entry set with a fresh listing.
    ///
    /// Weight selections reset to the default; a product present before
    /// and after a refresh does not keep its old selection.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous entries remain in place.
    #[instrument(skip(self, source, filter))]
    pub async fn refresh<S>(&mut self, source: &S, filter: &CatalogFilter) -> Result<(), ApiError>
    where
        S: CatalogSource + Sync,
    {
        let sweets = source.fetch(filter).await?;
        self.entries = sweets
            .into_iter()
            .map(|sweet| CatalogEntry {
                sweet,
                selected_weight: Weight::DEFAULT,
            })
            .collect();
        Ok(())
    }

    /// The current entries, in listing order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// True iff no listing has been loaded (or the last one was empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by product ID.
    #[must_use]
    pub fn entry(&self, id: SweetId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.sweet.id == id)
    }

    /// Step an entry's weight selection up by 50g.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSweet`] if the product is not in
    /// the current listing.
    pub fn increase_selection(&mut self, id: SweetId) -> Result<Weight, CatalogError> {
        let entry = self.entry_mut(id)?;
        entry.selected_weight = entry.selected_weight.increased();
        Ok(entry.selected_weight)
    }

    /// Step an entry's weight selection down by 50g, floored at 100g.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSweet`] if the product is not in
    /// the current listing.
    pub fn decrease_selection(&mut self, id: SweetId) -> Result<Weight, CatalogError> {
        let entry = self.entry_mut(id)?;
        entry.selected_weight = entry.selected_weight.decreased();
        Ok(entry.selected_weight)
    }

    /// Take the entry's current selection for an add-to-cart, resetting
    /// it to the default.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSweet`] if the product is not in
    /// the current listing.
    pub fn take_selection(&mut self, id: SweetId) -> Result<(Sweet, Weight), CatalogError> {
        let entry = self.entry_mut(id)?;
        let weight = entry.selected_weight;
        entry.selected_weight = Weight::DEFAULT;
        Ok((entry.sweet.clone(), weight))
    }

    fn entry_mut(&mut self, id: SweetId) -> Result<&mut CatalogEntry, CatalogError> {
        self.entries
            .iter_mut()
            .find(|e| e.sweet.id == id)
            .ok_or(CatalogError::UnknownSweet(id))
    }
}
