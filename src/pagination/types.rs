//! Pagination types and traits
//!
//! Defines the response capability every pageable type implements and the
//! parser contract used to turn fetched bodies back into responses.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Link};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// A response that carries a page of items and navigation links
///
/// Both accessors default to `None`, so a type that opts in without
/// exposing either field still pages (as a single empty page).
pub trait PaginatedResponse {
    /// Element type of the `data` collection
    type Item: Clone;

    /// The response's items, if it has any
    fn items(&self) -> Option<Cow<'_, [Self::Item]>> {
        None
    }

    /// The response's links, if it has any
    fn links(&self) -> Option<Cow<'_, [Link]>> {
        None
    }

    /// Reject values that cannot be paged at all
    ///
    /// Checked once when a pager is constructed.
    fn ensure_paginated(&self) -> Result<()> {
        Ok(())
    }
}

/// Maps a raw response body back into the response type
pub type ResponseParser<R> = Arc<dyn Fn(&str) -> Result<R> + Send + Sync>;

/// Parser that decodes bodies as JSON into `R`
pub fn json_parser<R: DeserializeOwned>() -> ResponseParser<R> {
    Arc::new(|body: &str| serde_json::from_str::<R>(body).map_err(Error::from))
}

// ============================================================================
// Typed wire shape
// ============================================================================

/// The `{ "data": [...], "links": [...] }` envelope with typed items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Items on this page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    /// Navigation links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl<T> ApiResponse<T> {
    /// Create a response with items and links
    pub fn new(data: Vec<T>, links: Vec<Link>) -> Self {
        Self {
            data: Some(data),
            links: Some(links),
        }
    }
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            links: None,
        }
    }
}

impl<T: Clone> PaginatedResponse for ApiResponse<T> {
    type Item = T;

    fn items(&self) -> Option<Cow<'_, [T]>> {
        self.data.as_deref().map(Cow::Borrowed)
    }

    fn links(&self) -> Option<Cow<'_, [Link]>> {
        self.links.as_deref().map(Cow::Borrowed)
    }
}

// ============================================================================
// Dynamic JSON
// ============================================================================

impl PaginatedResponse for JsonValue {
    type Item = JsonValue;

    fn items(&self) -> Option<Cow<'_, [JsonValue]>> {
        self.get("data")
            .and_then(JsonValue::as_array)
            .map(|items| Cow::Borrowed(items.as_slice()))
    }

    fn links(&self) -> Option<Cow<'_, [Link]>> {
        let links = self.get("links")?.as_array()?;
        Some(Cow::Owned(links.iter().filter_map(link_from_value).collect()))
    }

    fn ensure_paginated(&self) -> Result<()> {
        if self.is_object() {
            Ok(())
        } else {
            Err(Error::argument(format!(
                "expected a JSON object response, got {}",
                json_kind(self)
            )))
        }
    }
}

/// Read one `links` entry, skipping anything without string `rel`/`href`
fn link_from_value(value: &JsonValue) -> Option<Link> {
    let entry = value.as_object()?;
    let rel = entry.get("rel")?.as_str()?;
    let href = entry.get("href")?.as_str()?;
    let method = entry
        .get("method")
        .and_then(JsonValue::as_str)
        .unwrap_or("GET");

    Some(Link {
        rel: rel.to_string(),
        href: href.to_string(),
        method: method.to_string(),
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
