//! OpenStreetMap Nominatim geocoder provider.
//!
//! Queries the public Nominatim `search` endpoint (JSON, `format=jsonv2`)
//! and normalizes entries into place groups keyed by Nominatim category.
//! Declares both optional capabilities: more-results re-fetches with a
//! larger limit (full replace), and geometry resolution goes through the
//! `lookup` endpoint with `polygon_text=1` for WKT output.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::http;
use crate::provider::{ProviderLabel, SearchProvider};
use crate::types::{BBox, Crs, MoreItem, PlaceItem, ResolvedGeometry, ResultGroup, ResultItem};

pub(crate) const PROVIDER_ID: &str = "nominatim";

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Nominatim geocoder backed by a configurable service instance.
pub struct NominatimProvider {
    base_url: Url,
}

impl NominatimProvider {
    /// Provider against the public OSM instance.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an unparsable base URL.
    pub fn new(base_url: Option<&str>) -> Result<Self, SearchError> {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(base)
            .map_err(|e| SearchError::Config(format!("invalid Nominatim base URL: {e}")))?;
        Ok(Self { base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        self.base_url
            .join(path)
            .map_err(|e| SearchError::Config(format!("invalid Nominatim endpoint: {e}")))
    }

    async fn fetch_groups(
        &self,
        text: &str,
        options: &SearchOptions,
        limit: usize,
    ) -> Result<Vec<ResultGroup>, SearchError> {
        let client = http::build_client(options)?;

        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", text)
            .append_pair("format", "jsonv2")
            .append_pair("addressdetails", "0")
            .append_pair("limit", &limit.to_string());

        let mut request = client.get(url);
        if let Some(language) = &options.language {
            request = request.header("Accept-Language", language);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Nominatim request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Nominatim HTTP error: {e}")))?;

        let payload = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("Nominatim response read failed: {e}")))?;

        tracing::trace!(bytes = payload.len(), "Nominatim response received");
        parse_search_payload(&payload, limit)
    }
}

#[async_trait]
impl SearchProvider for NominatimProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn label(&self) -> ProviderLabel {
        ProviderLabel::Text("OpenStreetMap".into())
    }

    async fn search(
        &self,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ResultGroup>, SearchError> {
        self.fetch_groups(text, options, options.result_limit).await
    }

    fn supports_more_results(&self) -> bool {
        true
    }

    /// Full re-fetch with the expanded limit. The complete set comes
    /// back; the session replaces this provider's prior groups with it.
    async fn more_results(
        &self,
        _item: &MoreItem,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ResultGroup>, SearchError> {
        self.fetch_groups(text, options, options.more_result_limit)
            .await
    }

    fn supports_geometry(&self) -> bool {
        true
    }

    async fn result_geometry(
        &self,
        item: &PlaceItem,
        options: &SearchOptions,
    ) -> Result<ResolvedGeometry, SearchError> {
        let osm_ref = osm_lookup_ref(&item.id)?;
        let client = http::build_client(options)?;

        let mut url = self.endpoint("lookup")?;
        url.query_pairs_mut()
            .append_pair("osm_ids", &osm_ref)
            .append_pair("format", "jsonv2")
            .append_pair("polygon_text", "1");

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Geometry(format!("Nominatim lookup failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Geometry(format!("Nominatim lookup HTTP error: {e}")))?;

        let payload = response
            .text()
            .await
            .map_err(|e| SearchError::Geometry(format!("Nominatim lookup read failed: {e}")))?;

        parse_geometry_payload(&payload, item)
    }
}

/// Normalize a Nominatim search payload into category groups.
///
/// Entries are bucketed by their `category` field into groups
/// `nominatimgroup0…N` in first-seen order, each titled with the raw
/// category. A malformed entry is skipped on its own; it never drops the
/// group or the payload. When the service returned as many entries as
/// requested, the response is assumed truncated and a MORE marker is
/// appended to the last group (the provider applies one global limit, so
/// the marker carries no category).
pub(crate) fn parse_search_payload(
    payload: &str,
    limit: usize,
) -> Result<Vec<ResultGroup>, SearchError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| SearchError::Parse(format!("Nominatim payload is not JSON: {e}")))?;
    let entries = value
        .as_array()
        .ok_or_else(|| SearchError::Parse("Nominatim payload is not an array".into()))?;

    let mut groups: Vec<ResultGroup> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(item) = parse_entry(entry) else {
            tracing::debug!("skipping malformed Nominatim entry");
            continue;
        };
        let category = entry
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or("place")
            .to_owned();

        let index = *group_index.entry(category.clone()).or_insert_with(|| {
            groups.push(ResultGroup::titled(
                format!("nominatimgroup{}", groups.len()),
                category,
            ));
            groups.len() - 1
        });
        groups[index].items.push(ResultItem::Place(item));
    }

    tracing::debug!(
        entries = entries.len(),
        groups = groups.len(),
        "Nominatim results parsed"
    );

    if limit > 0 && entries.len() >= limit {
        if let Some(last) = groups.last_mut() {
            last.items.push(ResultItem::More(MoreItem::new(
                format!("nominatimmore{}", entries.len()),
                PROVIDER_ID,
                None,
            )));
        }
    }

    Ok(groups)
}

/// One Nominatim entry to a place item, `None` when required fields are
/// missing or unparsable.
fn parse_entry(entry: &Value) -> Option<PlaceItem> {
    let osm_type = entry.get("osm_type")?.as_str()?;
    let osm_id = entry.get("osm_id")?.as_u64()?;
    let text = entry.get("display_name")?.as_str()?;
    let lon: f64 = coordinate_field(entry.get("lon")?)?;
    let lat: f64 = coordinate_field(entry.get("lat")?)?;

    let mut item = PlaceItem::point(
        format!("{osm_type}:{osm_id}"),
        text,
        lon,
        lat,
        Crs::wgs84(),
        PROVIDER_ID,
    );
    if let Some(bbox) = entry.get("boundingbox").and_then(parse_boundingbox) {
        // The centroid must stay within the advertised extent; keep the
        // zero-area point box otherwise.
        if bbox.contains(lon, lat) {
            item.bbox = bbox;
        }
    }
    Some(item)
}

/// Nominatim serializes coordinates as strings in JSON output; accept a
/// bare number too.
fn coordinate_field(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// `boundingbox` comes as `[south, north, west, east]`.
fn parse_boundingbox(value: &Value) -> Option<BBox> {
    let parts = value.as_array()?;
    if parts.len() != 4 {
        return None;
    }
    let south = coordinate_field(&parts[0])?;
    let north = coordinate_field(&parts[1])?;
    let west = coordinate_field(&parts[2])?;
    let east = coordinate_field(&parts[3])?;
    Some(BBox::new(west, south, east, north))
}

/// Item ids encode `osm_type:osm_id`; the lookup endpoint wants `N…`,
/// `W…` or `R…`.
fn osm_lookup_ref(item_id: &str) -> Result<String, SearchError> {
    let (osm_type, osm_id) = item_id.split_once(':').ok_or_else(|| {
        SearchError::Geometry(format!("item id is not of the form osm_type:osm_id: {item_id}"))
    })?;
    let prefix = match osm_type {
        "node" => "N",
        "way" => "W",
        "relation" => "R",
        other => {
            return Err(SearchError::Geometry(format!(
                "unknown OSM object type: {other}"
            )))
        }
    };
    Ok(format!("{prefix}{osm_id}"))
}

/// Extract WKT geometry from a lookup response.
///
/// Falls back to a point WKT built from the item's own coordinates when
/// the service returns an entry without geometry text. The CRS is always
/// geographic here — reprojection stays with the caller.
pub(crate) fn parse_geometry_payload(
    payload: &str,
    item: &PlaceItem,
) -> Result<ResolvedGeometry, SearchError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| SearchError::Geometry(format!("Nominatim lookup payload is not JSON: {e}")))?;
    let entry = value
        .as_array()
        .and_then(|entries| entries.first())
        .ok_or_else(|| SearchError::Geometry("lookup returned no entry".into()))?;

    let geometry = entry
        .get("geotext")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("POINT({} {})", item.x, item.y));

    Ok(ResolvedGeometry {
        item: item.clone(),
        geometry,
        crs: Crs::wgs84(),
    })
}
