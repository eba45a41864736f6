//! Error types and result handling for titanwiki operations.
//!
//! This module defines the error handling system used throughout titanwiki.
//! All operations return a [`Result<T>`] which is a type alias for `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! titanwiki errors are categorized into several types:
//!
//! - **Network Errors**: Connection issues, timeouts, TLS failures
//! - **HTTP Errors**: The wiki answered with a non-success status code
//! - **Format Errors**: The response was JSON, but not a shape the wiki ever sends
//! - **Not Found**: Missing records
//! - **Config Errors**: Unreadable or invalid configuration
//! - **IO Errors**: File system or other IO operations
//! - **JSON Errors**: Serialization/deserialization failures
//!
//! The first three categories are what a list view shows in its error panel;
//! [`Error::user_message`] renders them the same way so callers don't have to
//! tell them apart.
//!
//! # Examples
//!
//! ```rust
//! use titanwiki::error::{Error, Result};
//!
//! fn describe(result: Result<()>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(Error::Http { status, .. }) => format!("wiki returned {}", status),
//!         Err(Error::Network(e)) => format!("network error: {}", e),
//!         Err(e) => e.to_string(),
//!     }
//! }
//!
//! assert_eq!(describe(Err(Error::http(503, "https://example.com"))), "wiki returned 503");
//! ```

use thiserror::Error;

/// Type alias for Results with titanwiki errors.
///
/// # Examples
///
/// ```rust
/// use titanwiki::{Result, Error};
///
/// fn example_operation() -> Result<String> {
///     Ok("Success".to_string())
/// }
///
/// fn example_with_error() -> Result<()> {
///     Err(Error::format("expected an object"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all titanwiki operations.
///
/// # Variants
///
/// * [`Network`](Error::Network) - HTTP client and connection errors
/// * [`Http`](Error::Http) - Non-success HTTP status codes
/// * [`Format`](Error::Format) - Unexpected response shapes
/// * [`NotFound`](Error::NotFound) - Missing resources
/// * [`Config`](Error::Config) - Configuration errors
/// * [`Io`](Error::Io) - File system and IO errors
/// * [`Json`](Error::Json) - JSON serialization errors
#[derive(Error, Debug)]
pub enum Error {
    /// Network-related errors from HTTP operations.
    ///
    /// This variant wraps errors from the underlying HTTP client (reqwest),
    /// including connection timeouts, DNS resolution failures, and HTTP
    /// transport errors.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered, but with a non-success status code.
    ///
    /// The status code is part of the message so that it reaches the user
    /// through the error panel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::Error;
    ///
    /// let error = Error::http(404, "https://api.example.com/characters?page=99");
    /// assert!(error.to_string().contains("404"));
    /// ```
    #[error("HTTP error! status: {status} ({url})")]
    Http { status: u16, url: String },

    /// The response body was valid JSON but not an envelope or a bare array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::Error;
    ///
    /// let error = Error::format("expected `results` array or top-level array");
    /// ```
    #[error("Unexpected response format: {0}")]
    Format(String),

    /// Resource not found errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::Error;
    ///
    /// let error = Error::not_found("Character with ID 9999");
    /// ```
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// File system and IO operation errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization and deserialization errors.
    ///
    /// This variant wraps errors from serde_json when a record inside a
    /// well-shaped response does not match the expected fields.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates an HTTP status error for the given URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::Error;
    ///
    /// let error = Error::http(500, "https://api.example.com/titans");
    /// assert!(matches!(error, Error::Http { status: 500, .. }));
    /// ```
    pub fn http(status: u16, url: impl Into<String>) -> Self {
        Error::Http {
            status,
            url: url.into(),
        }
    }

    /// Creates a format error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::Error;
    ///
    /// let error = Error::format("top-level value is a string");
    /// let error = Error::format(format!("`results` is {}", "null"));
    /// ```
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    /// Creates a not found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns `true` for errors a user can reasonably fix by retrying.
    ///
    /// Transport failures and server-side (5xx) or throttling (429) statuses
    /// qualify; everything else will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Renders the error as the single line shown in a view's error panel.
    ///
    /// Network, HTTP and format errors are collapsed into one
    /// "Failed to load ..." message; only the embedded text differs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::Error;
    ///
    /// let msg = Error::http(502, "https://api.example.com/characters").user_message("characters");
    /// assert_eq!(msg, "Failed to load characters: HTTP error! status: 502");
    /// ```
    pub fn user_message(&self, what: &str) -> String {
        let detail = match self {
            Error::Http { status, .. } => format!("HTTP error! status: {}", status),
            Error::Network(e) if e.is_timeout() => "request timed out".to_string(),
            Error::Network(_) => "could not reach the wiki".to_string(),
            other => other.to_string(),
        };
        format!("Failed to load {}: {}", what, detail)
    }
}
