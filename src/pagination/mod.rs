//! Pagination module
//!
//! Cursor and item extraction plus the shared pager state.
//!
//! # Overview
//!
//! Any response type implementing [`PaginatedResponse`] can be paged. The
//! engine reads its `data` items and its `next`/`previous` links, keeps them
//! in a [`PagerState`], and replaces that state wholesale after each
//! successful hop. Both the blocking and the async pagers drive the same
//! [`PagerState::transition`] logic.

mod extract;
mod state;
mod types;

pub use extract::{extract_cursors, extract_items, extract_page, Cursors};
pub use state::PagerState;
pub use types::{json_parser, ApiResponse, PaginatedResponse, ResponseParser};
