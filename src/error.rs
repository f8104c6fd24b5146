//! Error types for the atlas-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Query text never appears in error messages.

/// Errors that can occur during federated search operations.
///
/// Note that a single provider failing during a search is *not* an error
/// at this level — the dispatcher absorbs it as an empty contribution.
/// These variants cover configuration mistakes, capability misuse, and
/// failures inside a single provider call before it reaches the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to a search back-end failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a provider's response payload.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search options or registry misconfiguration.
    #[error("config error: {0}")]
    Config(String),

    /// A result item referenced a provider id that is not registered.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A capability (more-results, geometry) was requested from a provider
    /// that does not declare it.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Geometry resolution for a single item failed. Affects only the
    /// caller of that resolution, never the surrounding result list.
    #[error("geometry resolution failed: {0}")]
    Geometry(String),
}

/// Convenience type alias for atlas-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
