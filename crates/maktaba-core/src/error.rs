//! Error types for Maktaba.
//!
//! Three kinds matter to callers:
//!
//! - [`Error::InvalidContentType`]: a content type reached a fixed,
//!   developer-controlled table that has no row for it. Programming error.
//! - [`Error::SearchUnavailable`]: the external index failed or timed out.
//!   Recoverable at the request boundary.
//! - [`Error::InvalidParameter`]: inbound request input could not be parsed.
//!
//! Missing document fields are never errors; the hit adapter falls back or
//! returns `None`.

use std::path::{Path, PathBuf};

/// Errors that can occur in Maktaba search.
///
/// All variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A content type has no entry in a routing or lookup table.
    #[error("Invalid content type: {value}")]
    InvalidContentType {
        /// The offending content type key
        value: String,
    },

    /// The external search index could not serve the request.
    #[error("Search unavailable: {message}")]
    SearchUnavailable {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An inbound request parameter is malformed.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name as it appears in the query string
        name: String,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error with the path that caused it
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for Maktaba operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether the request boundary should degrade instead of failing.
    ///
    /// Only provider unavailability qualifies; everything else indicates a
    /// programming, configuration, or input problem.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::SearchUnavailable { .. } => true,
            Error::InvalidContentType { .. } => false,
            Error::InvalidParameter { .. } => false,
            Error::Config { .. } => false,
            Error::Io { .. } => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates a new invalid content type error.
    pub fn invalid_content_type<S: Into<String>>(value: S) -> Self {
        Error::InvalidContentType {
            value: value.into(),
        }
    }

    /// Creates a new search unavailable error with a message.
    pub fn search_unavailable<S: Into<String>>(message: S) -> Self {
        Error::SearchUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new search unavailable error with a message and source error.
    pub fn search_unavailable_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::SearchUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid parameter error.
    pub fn invalid_parameter<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Error::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error together with the path it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
