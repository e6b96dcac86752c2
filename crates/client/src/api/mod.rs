//! Sweetshop REST API client.
//!
//! Thin typed wrapper over the remote catalog/auth/purchase API. The
//! server is the source of truth for stock and roles - no local sync,
//! direct calls only. Unfiltered catalog listings are cached in-memory
//! via `moka` for a short TTL and invalidated by any mutation that can
//! change stock.
//!
//! # Example
//!
//! ```rust,ignore
//! use sweetshop_client::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(&ClientConfig::from_env()?)?;
//! let token = client.login("user@example.com", "hunter22").await?;
//! client.set_token(token.access_token.into()).await;
//! let sweets = client.list_sweets().await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use sweetshop_core::SweetId;

use crate::config::ClientConfig;
use crate::error::ApiError;

const CATALOG_CACHE_KEY: &str = "sweets";
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);

/// Error responses carry a `detail` message field.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Sweetshop REST API.
///
/// Cheap to clone; all clones share the HTTP connection pool, bearer
/// token, and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base: String,
    token: tokio::sync::RwLock<Option<SecretString>>,
    catalog_cache: Cache<String, Vec<Sweet>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let catalog_cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base: config.api_base.as_str().trim_end_matches('/').to_string(),
                token: tokio::sync::RwLock::new(None),
                catalog_cache,
            }),
        })
    }

    /// Attach a bearer token to all subsequent requests.
    pub async fn set_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
    }

    /// Drop the bearer token (logout or session teardown).
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    /// Attach auth, send, and decode a JSON response body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.send_raw(request).await?;
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse Sweetshop API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Attach auth and send, discarding any response body (204 responses).
    async fn send_no_content(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(|_| ())
    }

    async fn send_raw(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let request = match self.inner.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        // An invalid or expired token must tear down the session
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthExpired);
        }

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Sweetshop API returned non-success status"
            );
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map_or_else(|_| "Request failed".to_string(), |body| body.detail);
            return Err(ApiError::Rejection {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.http.get(self.url(path))).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.inner.http.post(self.url(path)).json(body))
            .await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the full catalog listing.
    ///
    /// Cached for a short TTL; mutations invalidate the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_sweets(&self) -> Result<Vec<Sweet>, ApiError> {
        if let Some(sweets) = self.inner.catalog_cache.get(CATALOG_CACHE_KEY).await {
            debug!("Cache hit for catalog listing");
            return Ok(sweets);
        }

        let sweets: Vec<Sweet> = self.get("/sweets").await?;

        self.inner
            .catalog_cache
            .insert(CATALOG_CACHE_KEY.to_string(), sweets.clone())
            .await;

        Ok(sweets)
    }

    /// Search the catalog. Falls back to the plain listing when the
    /// filter is empty. Search results are not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter))]
    pub async fn search_sweets(&self, filter: &CatalogFilter) -> Result<Vec<Sweet>, ApiError> {
        if filter.is_empty() {
            return self.list_sweets().await;
        }

        self.send(
            self.inner
                .http
                .get(self.url("/sweets/search"))
                .query(&filter.query_pairs()),
        )
        .await
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(sweet_id = %id))]
    pub async fn get_sweet(&self, id: SweetId) -> Result<Sweet, ApiError> {
        self.get(&format!("/sweets/{id}")).await
    }

    // =========================================================================
    // Admin Catalog Methods (role enforced server-side)
    // =========================================================================

    /// Add a new product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self, sweet), fields(name = %sweet.name))]
    pub async fn create_sweet(&self, sweet: &NewSweet) -> Result<Sweet, ApiError> {
        let created = self.post("/sweets", sweet).await?;
        self.invalidate_catalog().await;
        Ok(created)
    }

    /// Update an existing product. Only the fields present in the patch
    /// change.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self, patch), fields(sweet_id = %id))]
    pub async fn update_sweet(&self, id: SweetId, patch: &SweetPatch) -> Result<Sweet, ApiError> {
        let updated = self
            .send(
                self.inner
                    .http
                    .put(self.url(&format!("/sweets/{id}")))
                    .json(patch),
            )
            .await?;
        self.invalidate_catalog().await;
        Ok(updated)
    }

    /// Delete a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self), fields(sweet_id = %id))]
    pub async fn delete_sweet(&self, id: SweetId) -> Result<(), ApiError> {
        self.send_no_content(self.inner.http.delete(self.url(&format!("/sweets/{id}"))))
            .await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// Restock a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self), fields(sweet_id = %id, quantity))]
    pub async fn restock_sweet(
        &self,
        id: SweetId,
        quantity: u32,
    ) -> Result<RestockReceipt, ApiError> {
        let receipt = self
            .post(
                &format!("/sweets/{id}/restock"),
                &RestockRequest { quantity },
            )
            .await?;
        self.invalidate_catalog().await;
        Ok(receipt)
    }

    // =========================================================================
    // Purchase Methods
    // =========================================================================

    /// Record one purchase of `quantity` 100g units.
    ///
    /// # Errors
    ///
    /// Returns an error on insufficient stock or request failure.
    #[instrument(skip(self), fields(sweet_id = %id, quantity))]
    pub async fn purchase_sweet(
        &self,
        id: SweetId,
        quantity: u32,
    ) -> Result<PurchaseReceipt, ApiError> {
        let receipt = self
            .post(
                &format!("/sweets/{id}/purchase"),
                &PurchaseRequest { quantity },
            )
            .await?;
        self.invalidate_catalog().await;
        Ok(receipt)
    }

    /// Get the authenticated user's purchase history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn purchase_history(&self) -> Result<Vec<PurchaseRecord>, ApiError> {
        self.get("/purchases/history").await
    }

    /// Get the restock history (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self))]
    pub async fn restock_history(&self) -> Result<Vec<RestockRecord>, ApiError> {
        self.get("/admin/restock-history").await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// The token is returned, not stored; call [`Self::set_token`] to use
    /// it on subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid credentials or request failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Token, ApiError> {
        self.post(
            "/auth/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Register a new account.
    ///
    /// The mobile number is validated client-side (10-15 digits) before
    /// any request is issued.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on a malformed mobile number, or
    /// a rejection if the email/username is already taken.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ApiError> {
        validate_mobile(&request.mobile)?;
        self.post("/auth/register", request).await
    }

    /// Get the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or the request fails.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get("/auth/me").await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop all cached catalog responses.
    pub async fn invalidate_catalog(&self) {
        self.inner.catalog_cache.invalidate_all();
        self.inner.catalog_cache.run_pending_tasks().await;
    }
}

/// Mobile numbers are 10-15 digits, matching the server's constraint.
fn validate_mobile(mobile: &str) -> Result<(), ApiError> {
    let digits_only = mobile.chars().all(|c| c.is_ascii_digit());
    if digits_only && (10..=15).contains(&mobile.len()) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "mobile number must be 10-15 digits".to_string(),
        ))
    }
}
