//! In-memory transport
//!
//! Serves canned responses by URL. Useful for exercising pagers without a
//! network, and for fixtures in downstream tests.

use super::transport::{BlockingTransport, HttpResponse, Transport};
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Routes {
    responses: HashMap<String, VecDeque<HttpResponse>>,
    requests: Vec<String>,
}

/// Transport answering GETs from a table of queued responses
///
/// Each URL has a queue; the last queued response for a URL keeps being
/// served once the others are used up. Unknown URLs get a 404.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: Mutex<Routes>,
}

impl MemoryTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`
    pub fn respond(&self, url: impl Into<String>, response: HttpResponse) -> &Self {
        self.lock()
            .responses
            .entry(url.into())
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a 200 response whose body is `body` serialized as JSON
    pub fn respond_json<B: Serialize>(&self, url: impl Into<String>, body: &B) -> Result<&Self> {
        let body = serde_json::to_string(body)?;
        Ok(self.respond(url, HttpResponse::ok(body)))
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Number of GETs served so far
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Routes> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn serve(&self, url: &str) -> HttpResponse {
        let mut routes = self.lock();
        routes.requests.push(url.to_string());

        let Some(queue) = routes.responses.get_mut(url) else {
            return HttpResponse::new(404, format!("no route for {url}"));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| HttpResponse::new(404, ""))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| HttpResponse::new(404, format!("no route for {url}")))
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        Ok(self.serve(url))
    }
}

impl BlockingTransport for MemoryTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        Ok(self.serve(url))
    }
}
