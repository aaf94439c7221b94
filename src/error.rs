//! Unified error types for prism.
//!
//! Failures fall into two classes: transient fetch failures, which the view
//! content provider retries a bounded number of times, and everything else,
//! which surfaces to the host unchanged. Configuration resolution never
//! produces an error; any snapshot resolves to a (possibly empty) list.

use thiserror::Error;

/// The main error type for prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// The remote query endpoint returned a non-empty error list.
    ///
    /// The message is the newline-joined concatenation of every error
    /// message in the response. Not retryable.
    #[error("remote query failed: {message}")]
    RemoteQuery { message: String },

    /// Network or timeout-class failure from the query channel.
    ///
    /// Transient by definition; the view content provider retries these.
    #[error("stats fetch failed: {message}")]
    Fetch { message: String },

    /// The remote response did not match the expected payload shape.
    #[error("malformed stats response: {message}")]
    Decode { message: String },

    /// An insight definition carries neither a repository nor a query.
    ///
    /// Such a definition still registers; every render request it serves
    /// fails with this error at query-resolution time.
    #[error("insight '{id}' has neither a repository nor a query configured")]
    MalformedDefinition { id: String },

    /// The host view registry rejected a registration.
    #[error("view registration failed: {message}")]
    Registration { message: String },
}

/// A specialized Result type for prism operations.
pub type Result<T> = std::result::Result<T, PrismError>;

impl PrismError {
    /// Create a remote query error.
    pub fn remote_query(message: impl Into<String>) -> Self {
        Self::RemoteQuery {
            message: message.into(),
        }
    }

    /// Create a transient fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a malformed definition error.
    pub fn malformed_definition(id: impl Into<String>) -> Self {
        Self::MalformedDefinition { id: id.into() }
    }

    /// Create a registration error.
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Check whether this failure is worth retrying.
    ///
    /// Only fetch failures qualify: they are expected to be search-side
    /// timeouts, and a retry is likely to hit a now-warm cache. A remote
    /// error list or a payload mismatch will not improve on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}
