//! Error types for link-pager
//!
//! The pagination engine distinguishes four hard failure classes:
//! argument errors (raised at pager construction), navigation errors
//! (no cursor in the requested direction), transport errors and parse
//! errors. Missing `data`/`links` fields are never errors.

use crate::types::Direction;
use thiserror::Error;

/// The main error type for link-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Construction Errors
    // ============================================================================
    /// The initial response cannot be paged
    #[error("Invalid argument: {message}")]
    Argument {
        /// What was wrong with it
        message: String,
    },

    // ============================================================================
    // Navigation Errors
    // ============================================================================
    /// No cursor in the requested direction
    #[error("No such page: no {direction} cursor")]
    NoSuchPage {
        /// Direction that was requested
        direction: Direction,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// The GET could not be completed
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body, as received
        body: String,
    },

    /// A cursor href could not be turned into a URL
    #[error("Cannot resolve cursor URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Parse Errors
    // ============================================================================
    /// A fetched body is not JSON of the expected shape
    #[error("Response is not valid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A fetched body could not be mapped to the response type
    #[error("Failed to parse response: {message}")]
    Parse {
        /// Parser's explanation
        message: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid client configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was invalid
        message: String,
    },

    /// Config file is not valid YAML or JSON
    #[error("Invalid config file: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Reading a file or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file path does not exist
    #[error("Config file not found: {path}")]
    FileNotFound {
        /// Path as given
        path: String,
    },

    /// An error with context prepended
    #[error("{0}")]
    Other(String),

    /// Error from an `anyhow`-based caller
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create a navigation error for a missing cursor
    pub fn no_such_page(direction: Direction) -> Self {
        Self::NoSuchPage { direction }
    }

    /// Create an error for a non-2xx response
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for "no such page" errors, which callers avoid by checking
    /// `has_next`/`has_previous` first
    pub fn is_navigation(&self) -> bool {
        matches!(self, Error::NoSuchPage { .. })
    }

    /// True when the GET itself failed (network, status or URL)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::InvalidUrl(_)
        )
    }

    /// True when a fetched body could not be mapped to the response type
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::JsonParse(_) | Error::Parse { .. })
    }
}

/// Result type alias for link-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Prefix errors with what was being attempted
pub trait ResultExt<T> {
    /// Prefix the error with `message`
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Like [`context`](Self::context), building the message only on error
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.with_context(|| message.into())
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", f(), e.into())))
    }
}
