//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional and fall back to development defaults:
//! - `API_BASE_URL` - Backend API base URL (default: `http://localhost:3001`)
//! - `API_TIMEOUT_MS` - Request timeout in milliseconds (default: 10000)
//! - `STORAGE_DIR` - Directory for persisted JSON records (default: `.teahouse`)
//! - `AUTH_LATENCY_MS` - Simulated network latency for account operations
//!   (default: 1000; set to 0 in tests)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the backend API
    pub api_base_url: String,
    /// Bound on any single API request
    pub api_timeout: Duration,
    /// Directory holding the persisted key-value records
    pub storage_dir: PathBuf,
    /// Simulated latency for login/register/profile-update
    pub auth_latency: Duration,
}

impl StorefrontConfig {
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

        let api_base_url = get_env_or_default("API_BASE_URL", "http://localhost:3001");
        Url::parse(&api_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e.to_string()))?;

        let api_timeout_ms = get_env_or_default("API_TIMEOUT_MS", "10000")
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_TIMEOUT_MS".to_string(), e.to_string()))?;

        let storage_dir = PathBuf::from(get_env_or_default("STORAGE_DIR", ".teahouse"));

        let auth_latency_ms = get_env_or_default("AUTH_LATENCY_MS", "1000")
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("AUTH_LATENCY_MS".to_string(), e.to_string()))?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_timeout: Duration::from_millis(api_timeout_ms),
            storage_dir,
            auth_latency: Duration::from_millis(auth_latency_ms),
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001".to_string(),
            api_timeout: Duration::from_secs(10),
            storage_dir: PathBuf::from(".teahouse"),
            auth_latency: Duration::from_millis(1000),
        }
    }
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
