//! Pagers
//!
//! Two front ends over the same [`PagerState`](crate::pagination::PagerState):
//!
//! - [`SyncPager`] blocks the calling thread for each hop and offers
//!   auto-paginating item and page iterators.
//! - [`AsyncPager`] returns futures for each hop and offers loop-driven
//!   drains (`all_items`, `for_each_page`, `for_each_item`) plus an item stream.
//!
//! A pager is single-owner: navigation takes `&mut self`, so one pager never
//! has two fetches in flight.

mod async_pager;
mod sync_pager;

pub use async_pager::AsyncPager;
pub use sync_pager::{Items, Pages, SyncPager};

#[cfg(test)]
mod tests;
