//! Trait definition for pluggable search providers.
//!
//! Each back-end (geocoder, theme-layer catalog, built-in coordinate
//! parser) implements [`SearchProvider`] to produce canonical
//! [`ResultGroup`]s. Optional capabilities (more-results, geometry
//! resolution) are declared with explicit `supports_*` presence checks
//! rather than probed by calling.

use async_trait::async_trait;

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::types::{MapState, MoreItem, PlaceItem, ResolvedGeometry, ResultGroup};

/// How a provider labels itself in the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderLabel {
    /// A literal, already-localized label.
    Text(String),
    /// A localization message id the host resolves itself.
    MsgId(String),
}

/// A pluggable search back-end.
///
/// Implementors normalize their service's native payload into the
/// canonical result model. Each provider handles its own:
///
/// - request construction and transport
/// - payload parsing, skipping malformed entries individually
/// - group id namespacing (e.g. `"nominatimgroup0"`) and per-item
///   `provider_id` tagging
/// - truncation markers when a result limit was applied
///
/// Providers are registered once and immutable for the process lifetime;
/// identity is the string `id`. All implementations must be `Send + Sync`
/// so the dispatcher can fan out concurrently.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable provider identifier. Every produced item carries it so the
    /// engine can route geometry resolution and more-results back here.
    fn id(&self) -> &str;

    /// Display label for the host UI.
    fn label(&self) -> ProviderLabel;

    /// Availability predicate, evaluated against current application
    /// state on every search call. Providers without a real predicate
    /// keep the default and are always available.
    fn is_available(&self, map: &MapState) -> bool {
        let _ = map;
        true
    }

    /// Perform a search and return normalized result groups.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails or the payload cannot
    /// be parsed at all. The dispatcher converts any error into an empty
    /// contribution; it never aborts the other providers.
    async fn search(
        &self,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ResultGroup>, SearchError>;

    /// Whether [`more_results`](Self::more_results) is implemented.
    fn supports_more_results(&self) -> bool {
        false
    }

    /// Fetch the complete expanded result set for a truncated group.
    ///
    /// The returned groups replace every group this provider previously
    /// contributed — full re-fetch semantics, not a delta.
    async fn more_results(
        &self,
        item: &MoreItem,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ResultGroup>, SearchError> {
        let _ = (item, text, options);
        Err(SearchError::Unsupported(format!(
            "{} does not support expanded results",
            self.id()
        )))
    }

    /// Whether [`result_geometry`](Self::result_geometry) is implemented.
    fn supports_geometry(&self) -> bool {
        false
    }

    /// Resolve full geometry for one already-displayed place.
    ///
    /// Resolves exactly once per call and may return a CRS different from
    /// the item's summary CRS; reprojection is the caller's concern.
    async fn result_geometry(
        &self,
        item: &PlaceItem,
        options: &SearchOptions,
    ) -> Result<ResolvedGeometry, SearchError> {
        let _ = (item, options);
        Err(SearchError::Unsupported(format!(
            "{} does not support geometry resolution",
            self.id()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Crs, ResultItem};

    /// A minimal provider exercising the trait defaults.
    struct EchoProvider;

    #[async_trait]
    impl SearchProvider for EchoProvider {
        fn id(&self) -> &str {
            "echo"
        }

        fn label(&self) -> ProviderLabel {
            ProviderLabel::Text("Echo".into())
        }

        async fn search(
            &self,
            text: &str,
            _options: &SearchOptions,
        ) -> Result<Vec<ResultGroup>, SearchError> {
            let mut group = ResultGroup::titled("echogroup0", "Echo");
            group.items.push(ResultItem::Place(PlaceItem::point(
                "e0",
                text,
                0.0,
                0.0,
                Crs::wgs84(),
                self.id(),
            )));
            Ok(vec![group])
        }
    }

    #[test]
    fn provider_is_object_safe() {
        fn assert_dyn(_: &dyn SearchProvider) {}
        assert_dyn(&EchoProvider);
    }

    #[test]
    fn defaults_declare_no_optional_capabilities() {
        let provider = EchoProvider;
        assert!(!provider.supports_more_results());
        assert!(!provider.supports_geometry());
        assert!(provider.is_available(&MapState::empty()));
    }

    #[tokio::test]
    async fn default_more_results_is_unsupported() {
        let provider = EchoProvider;
        let item = MoreItem::new("m0", "echo", None);
        let err = provider
            .more_results(&item, "x", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expanded results"));
    }

    #[tokio::test]
    async fn default_geometry_is_unsupported() {
        let provider = EchoProvider;
        let item = PlaceItem::point("e0", "spot", 0.0, 0.0, Crs::wgs84(), "echo");
        let err = provider
            .result_geometry(&item, &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("geometry"));
    }

    #[tokio::test]
    async fn search_tags_items_with_provider_id() {
        let provider = EchoProvider;
        let groups = provider
            .search("Lausanne", &SearchOptions::default())
            .await
            .expect("search");
        assert_eq!(groups.len(), 1);
        let place = groups[0].items[0].as_place().expect("place item");
        assert_eq!(place.provider_id, "echo");
        assert_eq!(place.text, "Lausanne");
    }
}
