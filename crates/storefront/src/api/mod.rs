//! REST clients for the storefront backend.
//!
//! # Architecture
//!
//! - One [`ApiClient`] wraps a `reqwest` client with a cookie jar; the
//!   backend's session cookie carries the logged-in identity
//! - A `csrftoken` cookie, when the backend has set one, is echoed back in
//!   the `X-CSRFToken` header on every request
//! - Catalog reads are cached in memory via `moka` (5 minute TTL by default)
//!
//! # APIs
//!
//! - [`catalog`] - product listing and detail (read-only, cached)
//! - [`orders`] - order placement and order history
//! - [`session`] - login, registration, logout
//!
//! # Example
//!
//! ```rust,ignore
//! use ix_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//!
//! let products = client.list_products().await?;
//! let whey = client.get_product(ProductId::new(1)).await?;
//! ```

mod cache;
pub mod catalog;
pub mod orders;
pub mod session;
pub mod types;

pub use types::*;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::StorefrontConfig;
use cache::{CacheKey, CacheValue};

/// Name of the cookie holding the backend's CSRF token.
const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend expects the CSRF token in.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Longest slice of a response body kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request needs a logged-in session (401) or was refused for it (403).
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status code behind this error, when there is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Unauthorized { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend.
///
/// Cheaply cloneable; clones share the HTTP connection pool, the cookie jar
/// and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                jar,
                cache,
            }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path (without leading slash) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.with_csrf(self.inner.client.get(url.clone()), &url)
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.with_csrf(self.inner.client.post(url.clone()), &url)
    }

    /// Attach the CSRF header when the jar holds a token for `url`.
    fn with_csrf(&self, request: RequestBuilder, url: &Url) -> RequestBuilder {
        match self.csrf_token(url) {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    fn csrf_token(&self, url: &Url) -> Option<String> {
        let header = self.inner.jar.cookies(url)?;
        let cookies = header.to_str().ok()?;
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == CSRF_COOKIE).then(|| value.to_owned())
        })
    }

    /// Turn a non-success response into an [`ApiError`].
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = detail_message(&body);
        tracing::debug!(status = %status, message = %message, "backend returned non-success status");

        Err(match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => ApiError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Read a JSON body, keeping a slice of the raw text on parse failure.
    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&text),
                "failed to parse backend response"
            );
            ApiError::Parse(e.to_string())
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Error body shape used by the backend (`{"detail": "..."}`).
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Pull the `detail` field out of an error body, falling back to the raw text.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| truncate(body))
}

fn truncate(text: &str) -> String {
    text.chars().take(ERROR_BODY_LIMIT).collect()
}
