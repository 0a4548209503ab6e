//! Storefront REST API client.
//!
//! Uses `reqwest` for HTTP and `serde_json` for bodies. Every route lives
//! under `/api` of the configured origin:
//!
//! | Route | Auth |
//! |---|---|
//! | `GET /api/productos` | none |
//! | `POST /api/productos`, `PUT/DELETE /api/productos/{id}` | bearer |
//! | `GET /api/user` | bearer |
//! | `GET/POST /api/carrito`, `PUT/DELETE /api/carrito/{id}` | bearer |
//!
//! There is no caching, retrying or timeout: each call is exactly one
//! request, and the caller decides what to do with a failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use tienda_client::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(&ClientConfig::from_env()?);
//! let products = client.list_products().await?;
//! ```

mod cart;
mod products;
mod user;

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// How much of an error body is kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 200;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured API origin.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_base_url(config.api_url.clone())
    }

    /// Create a client for an explicit origin.
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// The API origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a route such as `api/carrito/4` against the origin.
    fn endpoint(&self, route: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(route)?)
    }

    /// Send one request and return the body of a successful response.
    async fn execute<B>(
        &self,
        method: Method,
        route: &str,
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(route)?;
        let mut request = self.inner.client.request(method.clone(), url);

        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                %method,
                route,
                status = %status,
                body = %truncate(&text, 500),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                body: truncate(&text, ERROR_BODY_LIMIT),
            });
        }

        Ok(text)
    }

    /// Send a request and decode a JSON response.
    async fn fetch<T, B>(
        &self,
        method: Method,
        route: &str,
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.execute(method, route, token, body).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(
                error = %e,
                route,
                body = %truncate(&text, 500),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }
}

/// Placeholder body type for requests without one.
type NoBody = ();

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
