//! Cursor and item extraction
//!
//! Extraction is lenient: a response without links has no cursors, and a
//! response without items yields an empty page. Neither is an error.

use super::types::PaginatedResponse;
use crate::page::Page;
use crate::types::{Direction, Link};
use std::borrow::Cow;

/// Forward and backward cursors read from a links collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursors {
    /// `href` of the last `next` link
    pub forward: Option<String>,
    /// `href` of the last `previous` link
    pub backward: Option<String>,
}

impl Cursors {
    /// The usable cursor for `direction`; empty hrefs count as absent
    pub fn get(&self, direction: Direction) -> Option<&str> {
        let cursor = match direction {
            Direction::Forward => self.forward.as_deref(),
            Direction::Backward => self.backward.as_deref(),
        };
        cursor.filter(|href| !href.is_empty())
    }

    /// Check whether a usable cursor exists for `direction`
    pub fn has(&self, direction: Direction) -> bool {
        self.get(direction).is_some()
    }
}

/// Scan links in order and pick out the `next`/`previous` hrefs
///
/// When several links share a relation the last one wins.
pub fn extract_cursors(links: Option<&[Link]>) -> Cursors {
    let mut cursors = Cursors::default();

    for link in links.unwrap_or_default() {
        if link.points(Direction::Forward) {
            cursors.forward = Some(link.href.clone());
        } else if link.points(Direction::Backward) {
            cursors.backward = Some(link.href.clone());
        }
    }

    cursors
}

/// Copy a response's items out, or nothing when it has none
pub fn extract_items<R: PaginatedResponse>(response: &R) -> Vec<R::Item> {
    response
        .items()
        .map(Cow::into_owned)
        .unwrap_or_default()
}

/// Build the [`Page`] for a response
pub fn extract_page<R: PaginatedResponse>(response: &R) -> Page<R::Item> {
    match response.items() {
        Some(Cow::Borrowed(items)) => Page::from_slice(items),
        Some(Cow::Owned(items)) => Page::new(items),
        None => Page::empty(),
    }
}
