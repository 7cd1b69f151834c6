//! Backend API client.
//!
//! A thin JSON/REST client over `reqwest` with the three behaviors the
//! stores rely on:
//!
//! - GET responses are cached in-memory via `moka` for the freshness window
//!   (5 minutes by default), keyed by the full URL plus the request options.
//! - Every request is bounded by the configured timeout; exceeding it fails
//!   with a distinguished [`ApiError::Timeout`] instead of hanging.
//! - Failures carry the target URL and elapsed time so callers can log
//!   something useful without re-deriving context.
//!
//! Resource helpers live in [`resources`]; they are fixed path/verb
//! combinations with no logic of their own.

mod resources;

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::StorefrontConfig;

/// How long a cached GET response stays fresh by default.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(300);

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {elapsed_ms}ms")]
    Timeout { url: String, elapsed_ms: u128 },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url} after {elapsed_ms}ms")]
    Status {
        status: u16,
        url: String,
        elapsed_ms: u128,
    },

    /// The request failed at the transport level.
    #[error("request to {url} failed after {elapsed_ms}ms: {source}")]
    Http {
        url: String,
        elapsed_ms: u128,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this failure was the request timeout.
    ///
    /// Callers special-case timeouts (for example to message the user
    /// differently than a hard server error).
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Per-request options: method, extra headers, JSON body.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    fn fingerprint(&self) -> String {
        let body = self
            .body
            .as_ref()
            .map_or_else(String::new, Value::to_string);
        format!("{}|{:?}|{}", self.method, self.headers, body)
    }
}

/// Client for the backend REST API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the
/// response cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    cache: Cache<String, Value>,
}

impl ApiClient {
    /// Create a new API client from the application configuration, with the
    /// default freshness window.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self::with_cache_ttl(config, FRESHNESS_WINDOW)
    }

    /// Create a new API client with an explicit freshness window.
    ///
    /// Tests use a short window to exercise cache expiry.
    #[must_use]
    pub fn with_cache_ttl(config: &StorefrontConfig, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                timeout: config.api_timeout,
                cache,
            }),
        }
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// GET requests are served from the cache when a fresh prior response
    /// exists for the same URL and options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Timeout`] when the bound elapses, [`ApiError::Status`]
    /// for non-2xx responses, [`ApiError::Http`] for transport failures, and
    /// [`ApiError::Parse`] when the body is not valid JSON.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let is_get = options.method == Method::GET;
        let cache_key = format!("{url}|{}", options.fingerprint());

        if is_get
            && let Some(hit) = self.inner.cache.get(&cache_key).await
        {
            debug!(%url, "cache hit");
            return Ok(hit);
        }

        debug!(method = %options.method, %url, "api request");
        let started = Instant::now();

        let mut request = self
            .inner
            .client
            .request(options.method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        // One timeout budget covers both the exchange and the body read.
        let outcome = tokio::time::timeout(self.inner.timeout, async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        })
        .await;

        let elapsed_ms = started.elapsed().as_millis();
        let (status, text) = match outcome {
            Err(_) => {
                warn!(%url, elapsed_ms, "request timed out");
                return Err(ApiError::Timeout { url, elapsed_ms });
            }
            Ok(Err(source)) => {
                warn!(%url, elapsed_ms, error = %source, "request failed");
                return Err(ApiError::Http {
                    url,
                    elapsed_ms,
                    source,
                });
            }
            Ok(Ok(pair)) => pair,
        };

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), elapsed_ms, "non-success status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
                elapsed_ms,
            });
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            error!(
                %url,
                error = %e,
                body = %text.chars().take(200).collect::<String>(),
                "failed to parse response body"
            );
            ApiError::Parse(e)
        })?;

        if is_get {
            self.inner.cache.insert(cache_key, value.clone()).await;
        }

        debug!(%url, elapsed_ms, "api response");
        Ok(value)
    }

    /// Probe whether the backend is reachable.
    ///
    /// A lightweight GET against the products collection; any failure
    /// reduces to `false` and is never surfaced as an error.
    pub async fn check_health(&self) -> bool {
        match self.request("/products", RequestOptions::default()).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "health probe failed");
                false
            }
        }
    }
}
