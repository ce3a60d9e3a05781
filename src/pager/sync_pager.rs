//! Blocking pager

use crate::error::Result;
use crate::http::BlockingTransport;
use crate::page::Page;
use crate::pagination::{json_parser, PagerState, PaginatedResponse, ResponseParser};
use crate::types::Direction;
use serde::de::DeserializeOwned;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Blocking, bidirectional pager
pub struct SyncPager<R: PaginatedResponse> {
    state: PagerState<R>,
    transport: Arc<dyn BlockingTransport>,
    parser: ResponseParser<R>,
}

impl<R: PaginatedResponse> SyncPager<R> {
    /// Wrap an already fetched first response
    ///
    /// Fails with [`Error::Argument`](crate::Error::Argument) when `initial`
    /// cannot be paged.
    pub fn new(
        initial: R,
        transport: Arc<dyn BlockingTransport>,
        parser: ResponseParser<R>,
    ) -> Result<Self> {
        initial.ensure_paginated()?;

        Ok(Self {
            state: PagerState::from_response(initial),
            transport,
            parser,
        })
    }

    /// Fetch the first page from `url` and wrap it
    pub fn open(
        url: &str,
        transport: Arc<dyn BlockingTransport>,
        parser: ResponseParser<R>,
    ) -> Result<Self> {
        let body = transport.get(url)?.into_body()?;
        let initial = parser(&body)?;
        Self::new(initial, transport, parser)
    }

    /// Check for a forward cursor
    pub fn has_next(&self) -> bool {
        self.state.has(Direction::Forward)
    }

    /// Check for a backward cursor
    pub fn has_previous(&self) -> bool {
        self.state.has(Direction::Backward)
    }

    /// Move to the next page
    pub fn next_page(&mut self) -> Result<&mut Self> {
        self.navigate(Direction::Forward)
    }

    /// Move to the previous page
    pub fn previous_page(&mut self) -> Result<&mut Self> {
        self.navigate(Direction::Backward)
    }

    /// Follow the cursor for `direction`
    ///
    /// On any error the pager keeps its current page and cursors.
    pub fn navigate(&mut self, direction: Direction) -> Result<&mut Self> {
        let transport = &self.transport;
        let next = self
            .state
            .transition(direction, &self.parser, |url| transport.get(url))?;
        self.state = next;
        Ok(self)
    }

    /// Items of the current page
    pub fn items(&self) -> &[R::Item] {
        self.state.items()
    }

    /// Current page
    pub fn page(&self) -> &Page<R::Item> {
        self.state.page()
    }

    /// Last successfully parsed response
    pub fn response(&self) -> &R {
        self.state.response()
    }

    /// Read-only view of the pager state
    pub fn state(&self) -> &PagerState<R> {
        &self.state
    }

    /// Auto-paginating iterator over items, starting at the current page
    pub fn iter(&mut self) -> Items<'_, R> {
        Items {
            pager: self,
            index: 0,
            failed: false,
        }
    }

    /// Iterate pages forward, starting with the current one
    ///
    /// An empty current page ends iteration immediately, even when a
    /// forward cursor exists.
    pub fn pages(&mut self) -> Pages<'_, R> {
        Pages::new(self, Direction::Forward)
    }

    /// Iterate pages backward, starting with the current one
    ///
    /// Same empty-first-page rule as [`pages`](Self::pages).
    pub fn previous_pages(&mut self) -> Pages<'_, R> {
        Pages::new(self, Direction::Backward)
    }

    /// Drain every remaining item, stopping at the first error
    pub fn all_items(&mut self) -> Result<Vec<R::Item>> {
        self.iter().collect()
    }
}

impl<R: PaginatedResponse + DeserializeOwned> SyncPager<R> {
    /// Wrap a first response, decoding later pages as JSON
    pub fn with_json(initial: R, transport: Arc<dyn BlockingTransport>) -> Result<Self> {
        Self::new(initial, transport, json_parser())
    }
}

impl<R> fmt::Debug for SyncPager<R>
where
    R: PaginatedResponse + fmt::Debug,
    R::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncPager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Item iterator
// ============================================================================

/// Item iterator that fetches the next page when the current one runs out
///
/// A failed fetch is yielded once as `Err` and ends the iteration.
pub struct Items<'a, R: PaginatedResponse> {
    pager: &'a mut SyncPager<R>,
    index: usize,
    failed: bool,
}

impl<R: PaginatedResponse> Iterator for Items<'_, R> {
    type Item = Result<R::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pager.items().get(self.index) {
                self.index += 1;
                return Some(Ok(item.clone()));
            }
            if self.failed || !self.pager.has_next() {
                return None;
            }
            if let Err(e) = self.pager.next_page() {
                self.failed = true;
                return Some(Err(e));
            }
            self.index = 0;
        }
    }
}

impl<R: PaginatedResponse> FusedIterator for Items<'_, R> {}

// ============================================================================
// Page iterator
// ============================================================================

/// Page iterator in one direction
pub struct Pages<'a, R: PaginatedResponse> {
    pager: &'a mut SyncPager<R>,
    direction: Direction,
    started: bool,
    done: bool,
}

impl<'a, R: PaginatedResponse> Pages<'a, R> {
    fn new(pager: &'a mut SyncPager<R>, direction: Direction) -> Self {
        Self {
            pager,
            direction,
            started: false,
            done: false,
        }
    }
}

impl<R: PaginatedResponse> Iterator for Pages<'_, R> {
    type Item = Result<Page<R::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            if self.pager.page().is_empty() {
                self.done = true;
                return None;
            }
            return Some(Ok(self.pager.page().clone()));
        }

        if !self.pager.state.has(self.direction) {
            self.done = true;
            return None;
        }

        match self.pager.navigate(self.direction) {
            Ok(pager) => Some(Ok(pager.page().clone())),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: PaginatedResponse> FusedIterator for Pages<'_, R> {}
