//! Error types and handling for fav-core operations.
//!
//! Only failures that stop a discovery run before it can produce anything
//! are surfaced as [`Error`] values:
//!
//! - **Invalid URL**: the page URL or explicit base URL cannot be parsed
//! - **Network / Not found / Timeout**: the primary page could not be fetched
//! - **Parse / I/O**: supplied content could not be read or decoded
//! - **Config**: a configuration file is unreadable, malformed or invalid
//!
//! Manifest fetches, well-known probes and individual malformed links never
//! produce an error; those sources simply contribute fewer icons.
//!
//! ```rust
//! use fav_core::Error;
//!
//! let err = Error::InvalidUrl("not a url".to_string());
//! assert_eq!(err.category(), "invalid_url");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for fav-core operations.
///
/// All fallible public functions return `Result<T, Error>`. The underlying
/// `reqwest` and `std::io` errors are preserved so callers can inspect the
/// source chain.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Raised when caller-supplied content cannot be read, or a config file
    /// cannot be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers connection failures and non-success statuses (other than 404)
    /// while fetching the primary page.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Content could not be parsed.
    ///
    /// ## Common Causes
    ///
    /// - Binary content (NUL bytes) served where HTML was expected
    /// - UTF-16 encoded pages
    #[error("Parse error: {0}")]
    Parse(String),

    /// The primary page returned 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or uses an unsupported scheme.
    ///
    /// ## Common Causes
    ///
    /// - Missing scheme (`example.com` instead of `https://example.com`)
    /// - Non-HTTP schemes such as `ftp://` or `file://`
    /// - Invalid characters in the host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The primary page fetch exceeded the client timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if the error might succeed if the caller tries again later.
    ///
    /// Discovery itself never retries; this is a hint for callers that want to.
    ///
    /// ```rust
    /// use fav_core::Error;
    ///
    /// assert!(Error::Timeout("slow host".to_string()).is_recoverable());
    /// assert!(!Error::Parse("binary content".to_string()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful as a structured logging field or for grouping failures.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Config(_) => "config",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
