//! HTTP transport module
//!
//! The pagers only need "GET this URL, give me status and body". This module
//! defines that contract and ships reqwest-backed implementations of it.
//!
//! # Features
//!
//! - **Async and blocking clients**: `HttpClient` and `BlockingHttpClient`
//! - **Relative cursors**: link hrefs are resolved against the configured base URL
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Header pass-through**: default headers (auth, correlation ids) on every request
//! - **In-memory transport**: `MemoryTransport` for tests and fixtures

mod client;
mod memory;
mod rate_limit;
mod transport;

pub use client::{BlockingHttpClient, HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use memory::MemoryTransport;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{BlockingTransport, HttpResponse, Transport};
