//! Theme-layer catalog provider.
//!
//! Searches an in-memory catalog of activatable theme layers by title
//! and produces THEMELAYER items — references to layers to switch on,
//! not locations. Only available while the map actually has a theme
//! loaded; the availability predicate is evaluated against application
//! state on every search call.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::provider::{ProviderLabel, SearchProvider};
use crate::types::{MapState, MoreItem, ResultGroup, ResultItem, ThemeLayerItem};

pub(crate) const PROVIDER_ID: &str = "themelayers";

/// One activatable catalog entry.
#[derive(Debug, Clone)]
pub struct ThemeLayerEntry {
    /// Stable layer name, used as the item id.
    pub name: String,
    /// Human-readable title, matched against the query.
    pub title: String,
    /// Opaque layer definition handed back to the host unchanged.
    pub layer_definition: Value,
}

/// Provider over a fixed layer catalog, built once per loaded theme.
pub struct ThemeLayerProvider {
    entries: Vec<ThemeLayerEntry>,
}

impl ThemeLayerProvider {
    pub fn new(entries: Vec<ThemeLayerEntry>) -> Self {
        Self { entries }
    }

    /// Case-insensitive substring matches, in catalog order.
    fn matches(&self, text: &str) -> Vec<&ThemeLayerEntry> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .collect()
    }

    fn group_for(&self, matches: &[&ThemeLayerEntry], truncate_at: Option<usize>) -> ResultGroup {
        let mut group = ResultGroup::with_title_key("themelayers0", "search.themelayers");
        let shown = truncate_at.unwrap_or(matches.len()).min(matches.len());
        for entry in &matches[..shown] {
            group.items.push(ResultItem::ThemeLayer(ThemeLayerItem {
                id: entry.name.clone(),
                text: entry.title.clone(),
                layer_definition: entry.layer_definition.clone(),
            }));
        }
        if shown < matches.len() {
            group.items.push(ResultItem::More(MoreItem::new(
                format!("themelayersmore{shown}"),
                PROVIDER_ID,
                None,
            )));
        }
        group
    }
}

#[async_trait]
impl SearchProvider for ThemeLayerProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn label(&self) -> ProviderLabel {
        ProviderLabel::MsgId("search.themelayers".into())
    }

    fn is_available(&self, map: &MapState) -> bool {
        !map.layers.is_empty() && !self.entries.is_empty()
    }

    async fn search(
        &self,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ResultGroup>, SearchError> {
        let matches = self.matches(text);
        if matches.is_empty() {
            return Ok(vec![]);
        }
        Ok(vec![self.group_for(&matches, Some(options.result_limit))])
    }

    fn supports_more_results(&self) -> bool {
        true
    }

    async fn more_results(
        &self,
        _item: &MoreItem,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ResultGroup>, SearchError> {
        let matches = self.matches(text);
        if matches.is_empty() {
            return Ok(vec![]);
        }
        Ok(vec![
            self.group_for(&matches, Some(options.more_result_limit))
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MapLayer;
    use serde_json::json;

    fn catalog() -> Vec<ThemeLayerEntry> {
        [
            ("rivers", "Rivers and Streams"),
            ("lakes", "Lakes"),
            ("groundwater", "Groundwater Protection Zones"),
            ("wells", "Drinking Water Wells"),
        ]
        .into_iter()
        .map(|(name, title)| ThemeLayerEntry {
            name: name.into(),
            title: title.into(),
            layer_definition: json!({"name": name, "visibility": true}),
        })
        .collect()
    }

    fn provider() -> ThemeLayerProvider {
        ThemeLayerProvider::new(catalog())
    }

    fn loaded_map() -> MapState {
        MapState {
            layers: vec![MapLayer {
                name: "base".into(),
                title: "Base Map".into(),
            }],
        }
    }

    #[test]
    fn unavailable_without_loaded_theme() {
        let provider = provider();
        assert!(!provider.is_available(&MapState::empty()));
        assert!(provider.is_available(&loaded_map()));
    }

    #[test]
    fn unavailable_with_empty_catalog() {
        let provider = ThemeLayerProvider::new(vec![]);
        assert!(!provider.is_available(&loaded_map()));
    }

    #[tokio::test]
    async fn matches_title_case_insensitively() {
        let provider = provider();
        let groups = provider
            .search("WATER", &SearchOptions::default())
            .await
            .expect("search");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "themelayers0");
        let ids: Vec<&str> = groups[0].items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["groundwater", "wells"]);
    }

    #[tokio::test]
    async fn items_carry_opaque_layer_definition() {
        let provider = provider();
        let groups = provider
            .search("lakes", &SearchOptions::default())
            .await
            .expect("search");
        match &groups[0].items[0] {
            ResultItem::ThemeLayer(item) => {
                assert_eq!(item.text, "Lakes");
                assert_eq!(item.layer_definition["name"], "lakes");
            }
            other => panic!("expected theme layer item, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_match_yields_no_groups() {
        let provider = provider();
        let groups = provider
            .search("geology", &SearchOptions::default())
            .await
            .expect("search");
        assert!(groups.is_empty());
        let groups = provider
            .search("   ", &SearchOptions::default())
            .await
            .expect("search");
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn truncation_appends_more_marker() {
        let provider = provider();
        let options = SearchOptions {
            result_limit: 1,
            more_result_limit: 10,
            ..Default::default()
        };
        let groups = provider.search("water", &options).await.expect("search");
        assert_eq!(groups[0].items.len(), 2);
        let more = groups[0].items[1].as_more().expect("more marker");
        assert_eq!(more.provider_id, PROVIDER_ID);
    }

    #[tokio::test]
    async fn more_results_returns_complete_set() {
        let provider = provider();
        let options = SearchOptions {
            result_limit: 1,
            more_result_limit: 10,
            ..Default::default()
        };
        let item = MoreItem::new("themelayersmore1", PROVIDER_ID, None);
        let groups = provider
            .more_results(&item, "water", &options)
            .await
            .expect("more");
        assert_eq!(groups[0].items.len(), 2);
        assert!(groups[0].items.iter().all(|i| !i.is_more()));
    }
}
