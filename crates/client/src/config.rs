//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SWEETSHOP_API_BASE` - API base URL (default: `http://127.0.0.1:8000/api`)
//! - `SWEETSHOP_STATE_DIR` - Directory for durable client state (default: `.sweetshop`)
//! - `SWEETSHOP_TIMEOUT_SECS` - HTTP request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";
const DEFAULT_STATE_DIR: &str = ".sweetshop";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
///
/// Every variable has a default, so the only failure mode is a value
/// that is present but does not parse.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Sweetshop client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the Sweetshop API (includes the `/api` prefix).
    pub api_base: Url,
    /// Directory holding the durable key-value state file.
    pub state_dir: PathBuf,
    /// Transport timeout applied to every request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base = get_env_or_default("SWEETSHOP_API_BASE", DEFAULT_API_BASE)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SWEETSHOP_API_BASE".to_string(), e.to_string())
            })?;
        let state_dir = PathBuf::from(get_env_or_default("SWEETSHOP_STATE_DIR", DEFAULT_STATE_DIR));
        let timeout_secs = get_env_or_default("SWEETSHOP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SWEETSHOP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base,
            state_dir,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // The compiled-in default is a valid URL
            #[allow(clippy::unwrap_used)]
            api_base: DEFAULT_API_BASE.parse().unwrap(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            timeout: Duration::from_secs(30),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base.as_str(), "http://127.0.0.1:8000/api");
        assert_eq!(config.state_dir, PathBuf::from(".sweetshop"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("SWEETSHOP_TEST_UNSET_VAR", "fallback"),
            "fallback"
        );
    }
}
