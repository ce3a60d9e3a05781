//! Transport contracts consumed by the pagers

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Status and body of a completed GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a 200 response
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a 2xx response, or an [`Error::HttpStatus`]
    pub fn into_body(self) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(Error::http_status(self.status, self.body))
        }
    }
}

/// Non-blocking GET
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET to `url`
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Blocking GET, run on the calling thread
pub trait BlockingTransport: Send + Sync {
    /// Issue a GET to `url`
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url).await
    }
}

impl<T: BlockingTransport + ?Sized> BlockingTransport for Arc<T> {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url)
    }
}
