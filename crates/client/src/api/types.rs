//! Wire types for the Sweetshop REST API.
//!
//! These mirror the server's response models field-for-field. Timestamps
//! arrive as naive strings (no timezone) in either `T`-separated ISO
//! form or the SQLite `CURRENT_TIMESTAMP` space-separated form, so they
//! deserialize into `chrono::NaiveDateTime` through [`timestamp`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use sweetshop_core::{PurchaseId, Role, Rupees, SweetId, UserId};

/// Naive timestamp parsing for server response fields.
///
/// Sweets created through the API carry `T`-separated ISO timestamps
/// with fractional seconds; rows stamped by the database's
/// `CURRENT_TIMESTAMP` default use `"YYYY-MM-DD HH:MM:SS"` with a
/// space. Both occur in live responses, so both must parse.
pub(crate) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// One product in the catalog, as listed by `GET /sweets`.
///
/// `quantity` is the authoritative server-side stock level, mirrored
/// read-only on the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sweet {
    /// Unique product ID.
    pub id: SweetId,
    /// Display name.
    pub name: String,
    /// Category label (e.g., "barfi", "ladoo").
    pub category: String,
    /// Price in rupees per 100g.
    pub price: Rupees,
    /// Units in stock (100g units).
    pub quantity: u32,
    /// Optional description.
    pub description: Option<String>,
    /// Image URL or path.
    pub img: String,
    /// Creation timestamp.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
    /// Last update timestamp.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: NaiveDateTime,
}

impl Sweet {
    /// Whether the product can currently be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Body for `POST /sweets` (admin).
#[derive(Debug, Clone, Serialize)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: Rupees,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub img: String,
}

/// Body for `PUT /sweets/{id}` (admin). All fields optional; only the
/// present ones are updated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Rupees>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

/// Server-side catalog search parameters. All optional and combinable;
/// filtering happens on the server.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Name substring.
    pub name: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Minimum price per 100g.
    pub min_price: Option<Rupees>,
    /// Maximum price per 100g.
    pub max_price: Option<Rupees>,
}

impl CatalogFilter {
    /// True when no criteria are set, meaning the plain listing endpoint
    /// applies instead of the search endpoint.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Query-string pairs for `GET /sweets/search`.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(min) = &self.min_price {
            pairs.push(("min_price", min.amount().to_string()));
        }
        if let Some(max) = &self.max_price {
            pairs.push(("max_price", max.amount().to_string()));
        }
        pairs
    }
}

// =============================================================================
// Auth Types
// =============================================================================

/// Body for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub address: String,
}

/// Response from `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct Token {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token type, always "bearer".
    pub token_type: String,
    /// Role granted to the authenticated user.
    pub role: Role,
}

/// Response from `GET /auth/me` and `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub role: Role,
}

// =============================================================================
// Purchase Types
// =============================================================================

/// Body for `POST /sweets/{id}/purchase`.
#[derive(Debug, Serialize)]
pub struct PurchaseRequest {
    /// Whole 100g units to purchase.
    pub quantity: u32,
}

/// Response from a successful purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseReceipt {
    pub message: String,
    pub sweet_name: String,
    pub quantity_purchased: u32,
    pub total_price: Rupees,
    pub remaining_stock: u32,
}

/// One row of `GET /purchases/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRecord {
    pub id: PurchaseId,
    pub sweet_id: SweetId,
    pub quantity: u32,
    pub total_price: Rupees,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub purchase_date: NaiveDateTime,
    pub sweet_name: String,
    pub category: String,
    pub img: String,
}

// =============================================================================
// Restock Types (admin)
// =============================================================================

/// Body for `POST /sweets/{id}/restock` (admin).
#[derive(Debug, Serialize)]
pub struct RestockRequest {
    /// Units to add to stock.
    pub quantity: u32,
}

/// Response from a successful restock.
#[derive(Debug, Clone, Deserialize)]
pub struct RestockReceipt {
    pub message: String,
    pub sweet_name: String,
    pub quantity_added: u32,
    pub new_stock: u32,
}

/// One row of `GET /admin/restock-history`.
#[derive(Debug, Clone, Deserialize)]
pub struct RestockRecord {
    pub id: i64,
    pub sweet_id: SweetId,
    pub quantity_added: u32,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub restock_date: NaiveDateTime,
    pub sweet_name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_sweet_deserializes_server_shape() {
        let json = r#"{
            "id": 3,
            "name": "Kaju Katli",
            "category": "barfi",
            "price": 200.0,
            "quantity": 12,
            "description": null,
            "img": "assets/Images/kaju.jpg",
            "created_at": "2024-01-05T10:30:00.123456",
            "updated_at": "2024-01-06T08:00:00"
        }"#;
        let sweet: Sweet = serde_json::from_str(json).unwrap();
        assert_eq!(sweet.id, SweetId::new(3));
        assert_eq!(sweet.price, Rupees::new(dec!(200)));
        assert!(sweet.in_stock());
        assert!(sweet.description.is_none());
    }

    #[test]
    fn test_sweet_deserializes_database_default_timestamps() {
        // CURRENT_TIMESTAMP rows use a space, not a T
        let json = r#"{
            "id": 1,
            "name": "Motichoor Ladoo",
            "category": "ladoo",
            "price": 120.0,
            "quantity": 8,
            "description": "classic",
            "img": "assets/Images/ladoo.jpg",
            "created_at": "2024-01-05 10:30:00",
            "updated_at": "2024-01-05 10:30:00"
        }"#;
        let sweet: Sweet = serde_json::from_str(json).unwrap();
        assert_eq!(
            sweet.created_at,
            "2024-01-05T10:30:00".parse::<NaiveDateTime>().unwrap()
        );
    }

    #[test]
    fn test_history_rows_deserialize_space_separated_dates() {
        let purchase = r#"{
            "id": 7,
            "sweet_id": 3,
            "quantity": 2,
            "total_price": 400.0,
            "purchase_date": "2024-02-01 09:15:30",
            "sweet_name": "Kaju Katli",
            "category": "barfi",
            "img": "assets/Images/kaju.jpg"
        }"#;
        let record: PurchaseRecord = serde_json::from_str(purchase).unwrap();
        assert_eq!(record.quantity, 2);

        let restock = r#"{
            "id": 2,
            "sweet_id": 3,
            "quantity_added": 10,
            "restock_date": "2024-02-02 18:00:00",
            "sweet_name": "Kaju Katli"
        }"#;
        let record: RestockRecord = serde_json::from_str(restock).unwrap();
        assert_eq!(record.quantity_added, 10);
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        let json = r#"{
            "id": 1,
            "name": "x",
            "category": "y",
            "price": 1.0,
            "quantity": 1,
            "description": null,
            "img": "z",
            "created_at": "yesterday",
            "updated_at": "2024-01-05 10:30:00"
        }"#;
        assert!(serde_json::from_str::<Sweet>(json).is_err());
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = CatalogFilter {
            name: Some("kaju".to_string()),
            category: None,
            min_price: Some(Rupees::new(dec!(50))),
            max_price: None,
        };
        assert!(!filter.is_empty());
        assert_eq!(
            filter.query_pairs(),
            vec![("name", "kaju".to_string()), ("min_price", "50".to_string())]
        );
    }

    #[test]
    fn test_empty_filter() {
        assert!(CatalogFilter::default().is_empty());
        assert!(CatalogFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn test_sweet_patch_skips_absent_fields() {
        let patch = SweetPatch {
            price: Some(Rupees::new(dec!(150))),
            ..SweetPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"price": 150.0}));
    }
}
