//! API error taxonomy.
//!
//! Every failure surfaces as a visible message and leaves client state
//! unchanged; nothing here is fatal to the process. An expired token is
//! singled out so callers can tear down the session and route back to
//! login.

use thiserror::Error;

/// Errors that can occur when talking to the Sweetshop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success API response, with the server's `detail` message.
    #[error("request rejected ({status}): {detail}")]
    Rejection {
        /// HTTP status code.
        status: u16,
        /// Message from the response body's `detail` field.
        detail: String,
    },

    /// The bearer token was rejected as invalid or expired.
    ///
    /// Callers must destroy the session and return to the login entry
    /// point.
    #[error("authentication expired, please log in again")]
    AuthExpired,

    /// Response body could not be parsed.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Client-side input check failed before any request was issued.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl ApiError {
    /// Whether this error must tear down the current session.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        let err = ApiError::Rejection {
            status: 400,
            detail: "Insufficient stock. Only 3 available".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request rejected (400): Insufficient stock. Only 3 available"
        );
    }

    #[test]
    fn test_auth_expired_flag() {
        assert!(ApiError::AuthExpired.is_auth_expired());
        assert!(!ApiError::Validation("bad mobile".to_string()).is_auth_expired());
    }
}
