//! Error types for the devfinder-search crate.
//!
//! Messages are stable and meant to be shown to the user verbatim as the
//! detail line of a failed search.

/// Errors that can occur while querying a provider.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request could not be sent, the body could not be read, or the
    /// provider answered with a non-success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The payload did not have the expected top-level shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for devfinder-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
