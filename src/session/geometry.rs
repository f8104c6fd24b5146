//! On-demand geometry resolution for a single displayed place.
//!
//! Resolution bypasses the request accumulator entirely: it concerns one
//! item the user already selected, so it is not subject to staleness
//! rules. A failure is surfaced to this caller alone and never touches
//! the surrounding result list.

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::registry::ProviderRegistry;
use crate::types::{PlaceItem, ResolvedGeometry};

/// Resolve full geometry for `item` via its owning provider.
///
/// The returned CRS may differ from the item's summary CRS; the engine
/// never reprojects.
///
/// # Errors
///
/// [`SearchError::UnknownProvider`] when `item.provider_id` is not
/// registered, [`SearchError::Unsupported`] when the provider declares
/// no geometry capability, or whatever the provider's own lookup fails
/// with.
pub async fn resolve_geometry(
    registry: &ProviderRegistry,
    item: &PlaceItem,
    options: &SearchOptions,
) -> Result<ResolvedGeometry, SearchError> {
    let provider = registry
        .get(&item.provider_id)
        .ok_or_else(|| SearchError::UnknownProvider(item.provider_id.clone()))?;
    if !provider.supports_geometry() {
        return Err(SearchError::Unsupported(format!(
            "{} does not support geometry resolution",
            provider.id()
        )));
    }
    tracing::debug!(provider = %item.provider_id, item = %item.id, "resolving geometry");
    provider.result_geometry(item, options).await
}
