//! Shared HTTP client builder for remote search providers.
//!
//! Provides a configured [`reqwest::Client`] with a per-provider timeout
//! and an identifying User-Agent. Public geocoding services (Nominatim
//! among them) require clients to identify themselves; there is no UA
//! rotation here.

use std::time::Duration;

use crate::config::SearchOptions;
use crate::error::SearchError;

/// Default identifying User-Agent sent when the host configures none.
const DEFAULT_USER_AGENT: &str = concat!("atlas-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for provider requests.
///
/// The client has:
/// - Timeout from options
/// - Identifying User-Agent (custom if configured)
/// - Gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(options: &SearchOptions) -> Result<reqwest::Client, SearchError> {
    let ua = options
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .user_agent(ua)
        .gzip(true)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}
