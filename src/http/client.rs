//! reqwest-backed transports
//!
//! Provides the async [`HttpClient`] and the [`BlockingHttpClient`]. Both:
//! - resolve relative cursor hrefs against the configured base URL
//! - send `Accept: application/json` plus the configured default headers
//! - optionally wait on a shared rate limiter before each request
//!
//! Neither retries. A failed GET is returned to the pager as-is.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::transport::{BlockingTransport, HttpResponse, Transport};
use crate::error::{Error, Result};
use crate::types::StringMap;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Settings shared by [`HttpClient`] and [`BlockingHttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that relative hrefs are joined onto
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Client-side throttling, off by default
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every fetch
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            rate_limit: None,
            default_headers: StringMap::new(),
            user_agent: format!("link-pager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Start from the defaults
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Chainable setters for [`HttpClientConfig`]
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Throttle fetches
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Fetch without throttling
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Header sent with every fetch
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Replace the default `link-pager/<version>` agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Finish building
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Turn a cursor href into an absolute URL
pub(crate) fn resolve_url(base_url: Option<&str>, href: &str) -> Result<Url> {
    match Url::parse(href) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base_url {
            Some(base) => Ok(Url::parse(base)?.join(href)?),
            None => Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithoutBase)),
        },
        Err(e) => Err(e.into()),
    }
}

/// `Accept: application/json` plus the configured headers
fn header_map(config: &HttpClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, value) in &config.default_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::config(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("invalid value for header '{name}': {e}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

// ============================================================================
// Async client
// ============================================================================

/// Async HTTP client
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Fails on headers that are not valid HTTP
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(header_map(&config)?)
            .build()?;

        Ok(Self {
            client,
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            config,
        })
    }

    /// Throttle with `limiter` instead of the configured quota
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Settings the client was built with
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check whether fetches are throttled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Absolute URL for a cursor href
    pub fn resolve(&self, href: &str) -> Result<Url> {
        resolve_url(self.config.base_url.as_deref(), href)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let url = self.resolve(url)?;
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        trace!(status, bytes = body.len(), "response received");

        Ok(HttpResponse::new(status, body))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Blocking client
// ============================================================================

/// Blocking HTTP client
///
/// Wraps `reqwest::blocking`, so it must not be created, used or dropped
/// from inside an async context; use `spawn_blocking` there.
pub struct BlockingHttpClient {
    client: reqwest::blocking::Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl BlockingHttpClient {
    /// Client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Fails on headers that are not valid HTTP
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(header_map(&config)?)
            .build()?;

        Ok(Self {
            client,
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            config,
        })
    }

    /// Throttle with `limiter` instead of the configured quota
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Settings the client was built with
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check whether fetches are throttled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Absolute URL for a cursor href
    pub fn resolve(&self, href: &str) -> Result<Url> {
        resolve_url(self.config.base_url.as_deref(), href)
    }
}

impl BlockingTransport for BlockingHttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let url = self.resolve(url)?;
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait_blocking();
        }

        debug!("GET {url} (blocking)");
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        trace!(status, bytes = body.len(), "response received");

        Ok(HttpResponse::new(status, body))
    }
}

impl std::fmt::Debug for BlockingHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingHttpClient")
            .field("config", &self.config)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}
