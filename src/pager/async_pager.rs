//! Non-blocking pager

use crate::error::Result;
use crate::http::Transport;
use crate::page::Page;
use crate::pagination::{json_parser, PagerState, PaginatedResponse, ResponseParser};
use crate::types::Direction;
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::{self as std_future, Future};
use std::sync::Arc;
use tracing::debug;

/// Non-blocking, bidirectional pager
///
/// Every hop is a single GET awaited in place. Drains run as plain loops
/// over `next_page`, so stack depth does not grow with the page count.
pub struct AsyncPager<R: PaginatedResponse> {
    state: PagerState<R>,
    transport: Arc<dyn Transport>,
    parser: ResponseParser<R>,
}

impl<R: PaginatedResponse> AsyncPager<R> {
    /// Wrap an already fetched first response
    ///
    /// Fails with [`Error::Argument`](crate::Error::Argument) when `initial`
    /// cannot be paged.
    pub fn new(
        initial: R,
        transport: Arc<dyn Transport>,
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
    pub async fn open(
        url: &str,
        transport: Arc<dyn Transport>,
        parser: ResponseParser<R>,
    ) -> Result<Self> {
        let body = transport.get(url).await?.into_body()?;
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
    pub async fn next_page(&mut self) -> Result<&mut Self> {
        self.navigate(Direction::Forward).await
    }

    /// Move to the previous page
    pub async fn previous_page(&mut self) -> Result<&mut Self> {
        self.navigate(Direction::Backward).await
    }

    /// Follow the cursor for `direction`
    ///
    /// On any error the pager keeps its current page and cursors.
    pub async fn navigate(&mut self, direction: Direction) -> Result<&mut Self> {
        let transport = Arc::clone(&self.transport);
        let next = self
            .state
            .transition_async(direction, &self.parser, |url| async move {
                transport.get(&url).await
            })
            .await?;
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

    /// Collect the current page and every page after it
    pub async fn all_items(&mut self) -> Result<Vec<R::Item>> {
        let mut items = self.page().to_vec();
        let mut pages = 1usize;

        while self.has_next() {
            self.next_page().await?;
            items.extend_from_slice(self.items());
            pages += 1;
        }

        debug!(pages, items = items.len(), "drained pager");
        Ok(items)
    }

    /// Run `processor` on the current page and every page after it
    ///
    /// Each processor future completes before the next page is fetched.
    pub async fn for_each_page<F, Fut>(&mut self, mut processor: F) -> Result<()>
    where
        F: FnMut(Page<R::Item>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        loop {
            processor(self.page().clone()).await?;
            if !self.has_next() {
                return Ok(());
            }
            self.next_page().await?;
        }
    }

    /// Run `consumer` on every item of the current and following pages
    pub async fn for_each_item<F>(&mut self, mut consumer: F) -> Result<()>
    where
        F: FnMut(R::Item),
    {
        self.for_each_page(|page| {
            page.iter().cloned().for_each(&mut consumer);
            std_future::ready(Ok(()))
        })
        .await
    }

    /// Turn the pager into an auto-paginating item stream
    ///
    /// A failed fetch is yielded once as `Err` and ends the stream.
    pub fn into_item_stream(self) -> impl Stream<Item = Result<R::Item>> {
        stream::unfold(Some((self, 0usize)), |cursor| async move {
            let Some((mut pager, mut index)) = cursor else {
                return None;
            };
            loop {
                let item = pager.items().get(index).cloned();
                if let Some(item) = item {
                    return Some((Ok(item), Some((pager, index + 1))));
                }
                if !pager.has_next() {
                    return None;
                }
                if let Err(e) = pager.next_page().await {
                    return Some((Err(e), None));
                }
                index = 0;
            }
        })
    }
}

impl<R: PaginatedResponse + DeserializeOwned> AsyncPager<R> {
    /// Wrap a first response, decoding later pages as JSON
    pub fn with_json(initial: R, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::new(initial, transport, json_parser())
    }
}

impl<R> fmt::Debug for AsyncPager<R>
where
    R: PaginatedResponse + fmt::Debug,
    R::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncPager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
