//! Shared pager state
//!
//! A [`PagerState`] is the current page, both cursors and the response
//! they came from. Navigation never edits it in place: a hop builds a new
//! state from the fetched response and the pager swaps it in only when the
//! fetch and the parse both succeeded.

use super::extract::{extract_cursors, extract_page, Cursors};
use super::types::{PaginatedResponse, ResponseParser};
use crate::error::{Error, Result};
use crate::http::HttpResponse;
use crate::page::Page;
use crate::types::Direction;
use std::fmt;
use std::future::Future;
use tracing::{debug, trace};

/// Current page, cursors and raw response of one pager
pub struct PagerState<R: PaginatedResponse> {
    page: Page<R::Item>,
    cursors: Cursors,
    response: R,
}

impl<R: PaginatedResponse> PagerState<R> {
    /// Extract page and cursors from a parsed response
    pub fn from_response(response: R) -> Self {
        let page = extract_page(&response);
        let cursors = extract_cursors(response.links().as_deref());

        Self {
            page,
            cursors,
            response,
        }
    }

    /// Build the next state from a fetched response
    ///
    /// Non-2xx statuses become [`Error::HttpStatus`]; bodies the parser
    /// rejects surface the parser's error. A parsed value that cannot be
    /// paged is a parse error here, not an argument error.
    pub fn settle(response: HttpResponse, parser: &ResponseParser<R>) -> Result<Self> {
        let body = response.into_body()?;
        let parsed = parser(&body)?;
        parsed
            .ensure_paginated()
            .map_err(|e| Error::parse(e.to_string()))?;
        Ok(Self::from_response(parsed))
    }

    /// Current page
    pub fn page(&self) -> &Page<R::Item> {
        &self.page
    }

    /// Items of the current page
    pub fn items(&self) -> &[R::Item] {
        self.page.items()
    }

    /// The response the current page was read from
    pub fn response(&self) -> &R {
        &self.response
    }

    /// Both cursors as extracted
    pub fn cursors(&self) -> &Cursors {
        &self.cursors
    }

    /// Usable cursor for `direction`
    pub fn cursor(&self, direction: Direction) -> Option<&str> {
        self.cursors.get(direction)
    }

    /// Check whether navigation in `direction` is possible
    pub fn has(&self, direction: Direction) -> bool {
        self.cursors.has(direction)
    }

    /// URL to fetch for `direction`, or a "no such page" error
    pub fn target(&self, direction: Direction) -> Result<&str> {
        self.cursor(direction)
            .ok_or_else(|| Error::no_such_page(direction))
    }

    /// Fetch and build the state one hop away, leaving `self` untouched
    pub fn transition<F>(
        &self,
        direction: Direction,
        parser: &ResponseParser<R>,
        fetch: F,
    ) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<HttpResponse>,
    {
        let url = self.target(direction)?;
        debug!(%direction, url, "following cursor");

        let next = Self::settle(fetch(url)?, parser)?;
        trace!(items = next.page.len(), "page loaded");
        Ok(next)
    }

    /// Async form of [`transition`](Self::transition)
    pub async fn transition_async<F, Fut>(
        &self,
        direction: Direction,
        parser: &ResponseParser<R>,
        fetch: F,
    ) -> Result<Self>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<HttpResponse>>,
    {
        let url = self.target(direction)?.to_string();
        debug!(%direction, url = %url, "following cursor");

        let next = Self::settle(fetch(url).await?, parser)?;
        trace!(items = next.page.len(), "page loaded");
        Ok(next)
    }
}

impl<R> fmt::Debug for PagerState<R>
where
    R: PaginatedResponse + fmt::Debug,
    R::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagerState")
            .field("page", &self.page)
            .field("cursors", &self.cursors)
            .field("response", &self.response)
            .finish()
    }
}
