//! Links, directions and shared aliases

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Navigation
// ============================================================================

/// Link relation naming the forward cursor
pub const REL_NEXT: &str = "next";

/// Link relation naming the backward cursor
pub const REL_PREVIOUS: &str = "previous";

/// Which cursor a navigation step reads and follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Follow the `next` link
    Forward,
    /// Follow the `previous` link
    Backward,
}

impl Direction {
    /// The link relation that carries this direction's cursor
    pub fn rel(self) -> &'static str {
        match self {
            Direction::Forward => REL_NEXT,
            Direction::Backward => REL_PREVIOUS,
        }
    }

    /// The opposite direction
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rel())
    }
}

// ============================================================================
// Links
// ============================================================================

/// A navigation link as it appears in a response's `links` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation (`next`, `previous`, or anything else, which is ignored)
    #[serde(default)]
    pub rel: String,
    /// Target URL, absolute or relative to the client's base URL
    #[serde(default)]
    pub href: String,
    /// HTTP method advertised by the server
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Link {
    /// Create a GET link
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            method: default_method(),
        }
    }

    /// Create a `next` link
    pub fn next(href: impl Into<String>) -> Self {
        Self::new(REL_NEXT, href)
    }

    /// Create a `previous` link
    pub fn previous(href: impl Into<String>) -> Self {
        Self::new(REL_PREVIOUS, href)
    }

    /// Does this link carry the cursor for `direction`?
    pub fn points(&self, direction: Direction) -> bool {
        self.rel == direction.rel()
    }
}
