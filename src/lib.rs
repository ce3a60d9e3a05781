// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # link-pager
//!
//! Bidirectional pagination over JSON APIs that advertise `next` and
//! `previous` links in their responses.
//!
//! ## Features
//!
//! - **Blocking and async pagers**: the same navigation rules behind
//!   [`SyncPager`] and [`AsyncPager`]
//! - **Typed or dynamic responses**: implement [`PaginatedResponse`] for your
//!   own envelope, use [`ApiResponse`], or page over raw `serde_json::Value`
//! - **Auto-pagination**: item iterators and streams that fetch lazily
//! - **Pluggable transports**: reqwest clients with base URL resolution and
//!   rate limiting, plus an in-memory [`MemoryTransport`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use link_pager::{ApiResponse, AsyncPager, HttpClient, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(HttpClient::new()?);
//!     let mut pager = AsyncPager::<ApiResponse<serde_json::Value>>::open(
//!         "https://api.example.com/items",
//!         client,
//!         link_pager::pagination::json_parser(),
//!     )
//!     .await?;
//!
//!     for item in pager.all_items().await? {
//!         println!("{item}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            SyncPager / AsyncPager (pager)                │
//! │  next_page  previous_page  iter  pages  all_items  ...   │
//! └──────────────────────────────────────────────────────────┘
//!                │                              │
//! ┌──────────────┴──────────────┐ ┌─────────────┴────────────┐
//! │   PagerState (pagination)   │ │   Transport (http)       │
//! │   items · cursors · parse   │ │   reqwest · rate limit   │
//! └─────────────────────────────┘ └──────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Immutable page snapshots
pub mod page;

/// Item and cursor extraction, pager state
pub mod pagination;

/// Transports: reqwest clients, rate limiting, in-memory fake
pub mod http;

/// Blocking and async pagers
pub mod pager;

/// Client configuration files
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use http::{
    BlockingHttpClient, BlockingTransport, HttpClient, HttpResponse, MemoryTransport, Transport,
};
pub use page::Page;
pub use pager::{AsyncPager, SyncPager};
pub use pagination::{ApiResponse, PaginatedResponse};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
