//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TIENDA_API_URL` - Origin serving the `/api` routes
//!   (default: `https://ev3api-3fdk.onrender.com`)
//! - `TIENDA_STORAGE_PATH` - File backing client-side storage
//!   (default: `<local data dir>/tienda/storage.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Origin the storefront's `/api` routes are served from.
pub const DEFAULT_API_URL: &str = "https://ev3api-3fdk.onrender.com";

const STORAGE_DIR: &str = "tienda";
const STORAGE_FILE: &str = "storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin, always ending in `/` so relative joins keep its path
    pub api_url: Url,
    /// File backing client-side persistent storage
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if no storage path
    /// is set and the platform has no local data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("TIENDA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("TIENDA_API_URL".to_string(), e))?;

        let storage_path = match lookup("TIENDA_STORAGE_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_storage_path()
                .ok_or_else(|| ConfigError::MissingEnvVar("TIENDA_STORAGE_PATH".to_string()))?,
        };

        Ok(Self {
            api_url,
            storage_path,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Replace the API origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `raw` is not an http(s) URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(raw)
            .map_err(|e| ConfigError::InvalidEnvVar("TIENDA_API_URL".to_string(), e))?;
        Ok(self)
    }

    /// Replace the storage file path.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an API origin and make sure its path ends with `/`.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// `<local data dir>/tienda/storage.json`, if the platform has one.
fn default_storage_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(STORAGE_DIR).join(STORAGE_FILE))
}
