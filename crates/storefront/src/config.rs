//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `IX_API_BASE_URL` - Backend base URL (default: `http://127.0.0.1:8000`)
//! - `IX_DATA_DIR` - Directory holding the cart and session files (default: `.ix`)
//! - `IX_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 15)
//! - `IX_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime in seconds (default: 300)
//! - `IX_USERNAME` / `IX_PASSWORD` - Stored credentials, used by commands that
//!   need a fresh backend session

use std::path::PathBuf;
use std::time::Duration;

use ix_core::Username;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_DATA_DIR: &str = ".ix";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend base URL, always ending in `/`
    pub api_base_url: Url,
    /// Directory for durable client state
    pub data_dir: PathBuf,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Catalog cache time-to-live
    pub catalog_cache_ttl: Duration,
    /// Stored credentials, if configured
    pub credentials: Option<Credentials>,
}

/// Username and password for re-authenticating against the backend.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: Username,
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value, or if
    /// `IX_PASSWORD` is set without `IX_USERNAME`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(
            "IX_API_BASE_URL",
            &get_or_default(&lookup, "IX_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let data_dir = PathBuf::from(get_or_default(&lookup, "IX_DATA_DIR", DEFAULT_DATA_DIR));
        let http_timeout = get_secs(&lookup, "IX_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let catalog_cache_ttl = get_secs(
            &lookup,
            "IX_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CATALOG_CACHE_TTL_SECS,
        )?;
        let credentials = get_credentials(&lookup)?;

        Ok(Self {
            api_base_url,
            data_dir,
            http_timeout,
            catalog_cache_ttl,
            credentials,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a non-empty variable, or a default.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Get a duration given in whole seconds.
fn get_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(Duration::from_secs(default));
    };
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the path.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Read `IX_USERNAME` / `IX_PASSWORD`; both or neither must be usable.
fn get_credentials(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<Credentials>, ConfigError> {
    let username = lookup("IX_USERNAME").filter(|v| !v.trim().is_empty());
    let password = lookup("IX_PASSWORD").filter(|v| !v.is_empty());

    match (username, password) {
        (Some(username), Some(password)) => {
            let username = Username::parse(&username)
                .map_err(|e| ConfigError::InvalidEnvVar("IX_USERNAME".to_string(), e.to_string()))?;
            Ok(Some(Credentials {
                username,
                password: SecretString::from(password),
            }))
        }
        (None, Some(_)) => Err(ConfigError::MissingEnvVar("IX_USERNAME".to_string())),
        (_, None) => Ok(None),
    }
}
