//! Search options with sensible defaults.
//!
//! [`SearchOptions`] controls result limits, per-provider HTTP timeout,
//! the map display CRS (consumed by the coordinate provider), and request
//! identity headers for remote providers.

use crate::error::SearchError;
use crate::types::Crs;

/// Options applied to every provider call within a search session.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Per-provider result cap for the initial search. Providers that
    /// truncate at this limit append a MORE marker to the affected group.
    pub result_limit: usize,
    /// Result cap for an expanded more-results fetch. Must be at least
    /// `result_limit`; the expanded response replaces the truncated group.
    pub more_result_limit: usize,
    /// Per-provider HTTP request timeout in seconds. The engine itself
    /// imposes no deadline — a provider that never responds simply
    /// contributes nothing.
    pub timeout_seconds: u64,
    /// CRS the map currently displays coordinates in.
    pub display_crs: Crs,
    /// Preferred result language (`Accept-Language`) for remote providers.
    pub language: Option<String>,
    /// Custom User-Agent. If `None`, a built-in identifying UA is sent —
    /// public geocoding services require one.
    pub user_agent: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            result_limit: 10,
            more_result_limit: 50,
            timeout_seconds: 8,
            display_crs: Crs::new("EPSG:3857"),
            language: None,
            user_agent: None,
        }
    }
}

impl SearchOptions {
    /// Validates these options, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `result_limit` must be greater than 0
    /// - `more_result_limit` must be >= `result_limit`
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.result_limit == 0 {
            return Err(SearchError::Config(
                "result_limit must be greater than 0".into(),
            ));
        }
        if self.more_result_limit < self.result_limit {
            return Err(SearchError::Config(
                "more_result_limit must be >= result_limit".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_have_sensible_values() {
        let options = SearchOptions::default();
        assert_eq!(options.result_limit, 10);
        assert_eq!(options.more_result_limit, 50);
        assert_eq!(options.timeout_seconds, 8);
        assert_eq!(options.display_crs.as_str(), "EPSG:3857");
        assert!(options.language.is_none());
        assert!(options.user_agent.is_none());
    }

    #[test]
    fn default_options_pass_validation() {
        assert!(SearchOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_result_limit_rejected() {
        let options = SearchOptions {
            result_limit: 0,
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("result_limit"));
    }

    #[test]
    fn more_limit_below_result_limit_rejected() {
        let options = SearchOptions {
            result_limit: 20,
            more_result_limit: 10,
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("more_result_limit"));
    }

    #[test]
    fn equal_limits_valid() {
        let options = SearchOptions {
            result_limit: 20,
            more_result_limit: 20,
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let options = SearchOptions {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn custom_display_crs_kept() {
        let options = SearchOptions {
            display_crs: Crs::new("EPSG:2056"),
            ..Default::default()
        };
        assert_eq!(options.display_crs.as_str(), "EPSG:2056");
        assert!(options.validate().is_ok());
    }
}
