//! Canonical result model shared by every search provider.
//!
//! Providers normalize their native payloads into [`ResultGroup`]s of
//! [`ResultItem`]s. The serialized field names form the wire contract the
//! host UI depends on (`providerId`, `layerDefinition`, `titleKey`,
//! `bbox` as `[xmin, ymin, xmax, ymax]`) and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one search request within a session.
///
/// Strictly monotonically increasing: every new query (or "more results"
/// action) supersedes all earlier ids forever. Responses carrying a
/// non-current id are dropped, never resurrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// The id predating any search; `next()` of this is the first real id.
    pub const ZERO: RequestId = RequestId(0);

    /// The strictly greater successor of this id.
    #[must_use]
    pub fn next(self) -> RequestId {
        RequestId(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A coordinate reference system identifier, e.g. `"EPSG:3857"`.
///
/// Carried alongside every coordinate pair — nothing downstream of
/// normalization may assume a default CRS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crs(String);

impl Crs {
    /// Create a CRS identifier from a code such as `"EPSG:2056"`.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Geographic WGS84 longitude/latitude.
    pub fn wgs84() -> Self {
        Self("EPSG:4326".into())
    }

    /// The CRS code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this CRS expresses geographic (lon/lat degree) coordinates.
    pub fn is_geographic(&self) -> bool {
        self.0.eq_ignore_ascii_case("EPSG:4326") || self.0.eq_ignore_ascii_case("CRS:84")
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An axis-aligned bounding box, serialized as `[xmin, ymin, xmax, ymax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// A zero-area box collapsed onto a single point, used when a result
    /// has no known extent.
    pub fn point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    /// Whether `(x, y)` lies within the box (boundary inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    /// Whether the box has collapsed to a single point.
    pub fn is_point(&self) -> bool {
        self.xmin == self.xmax && self.ymin == self.ymax
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.xmin, b.ymin, b.xmax, b.ymax]
    }
}

/// A point-like search candidate from a geocoder or catalog.
///
/// `(x, y)` lies within `bbox`; when the provider knows no extent,
/// `bbox` collapses to the point itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceItem {
    /// Provider-scoped identifier, unique within its group.
    pub id: String,
    /// Primary display text.
    pub text: String,
    /// Optional secondary display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    /// CRS of `x`/`y` and `bbox`.
    pub crs: Crs,
    pub bbox: BBox,
    /// Id of the provider that produced this item. Required for later
    /// geometry resolution and more-results dispatch.
    pub provider_id: String,
}

impl PlaceItem {
    /// A place with no known extent: bbox collapses to the point.
    pub fn point(
        id: impl Into<String>,
        text: impl Into<String>,
        x: f64,
        y: f64,
        crs: Crs,
        provider_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            label: None,
            x,
            y,
            crs,
            bbox: BBox::point(x, y),
            provider_id: provider_id.into(),
        }
    }
}

/// A reference to a map layer (or sublayer set) to activate — not a
/// location. `layer_definition` is opaque to the engine; the host hands
/// it back to its layer machinery unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeLayerItem {
    pub id: String,
    pub text: String,
    pub layer_definition: serde_json::Value,
}

/// Marker item: the group was truncated and the provider can produce an
/// expanded set for `category` via the more-results path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoreItem {
    pub id: String,
    pub provider_id: String,
    /// Always `true` on the wire.
    pub more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MoreItem {
    pub fn new(
        id: impl Into<String>,
        provider_id: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            more: true,
            category,
        }
    }
}

/// A single entry in a result group.
///
/// Serialized untagged: the variants are distinguished by their required
/// fields (`x`/`y`/`crs` for places, `layerDefinition` for theme layers,
/// `more` for truncation markers), matching the host wire schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultItem {
    Place(PlaceItem),
    ThemeLayer(ThemeLayerItem),
    More(MoreItem),
}

impl ResultItem {
    /// Item id, whichever the variant.
    pub fn id(&self) -> &str {
        match self {
            Self::Place(p) => &p.id,
            Self::ThemeLayer(t) => &t.id,
            Self::More(m) => &m.id,
        }
    }

    pub fn as_place(&self) -> Option<&PlaceItem> {
        match self {
            Self::Place(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_more(&self) -> Option<&MoreItem> {
        match self {
            Self::More(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_more(&self) -> bool {
        matches!(self, Self::More(_))
    }
}

/// A titled, ordered bucket of result items.
///
/// Group ids are namespaced by construction — providers choose ids like
/// `"nominatimgroup0"` — and must not collide across providers. The
/// engine orders groups by descending `priority` (groups without one sort
/// after any with an explicit priority), ties broken by first-arrival
/// insertion order; it never reorders items within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultGroup {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Localization message id, used instead of `title` by hosts that
    /// translate group headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    pub items: Vec<ResultItem>,
}

impl ResultGroup {
    /// A group with a literal title.
    pub fn titled(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            title_key: None,
            priority: None,
            items: Vec::new(),
        }
    }

    /// A group titled via a localization message id.
    pub fn with_title_key(id: impl Into<String>, title_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            title_key: Some(title_key.into()),
            priority: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Full geometry for one already-displayed place, resolved on demand.
///
/// `crs` may differ from the item's summary CRS; reprojection is the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGeometry {
    pub item: PlaceItem,
    /// Geometry as WKT text.
    pub geometry: String,
    pub crs: Crs,
}

/// A currently loaded map layer, as seen by availability predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub name: String,
    pub title: String,
}

/// The slice of application state that provider availability predicates
/// are evaluated against on every search call.
#[derive(Debug, Clone, Default)]
pub struct MapState {
    /// Layers of the currently loaded theme, empty when none is loaded.
    pub layers: Vec<MapLayer>,
}

impl MapState {
    /// State with no theme loaded.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_strictly_increases() {
        let a = RequestId::ZERO;
        let b = a.next();
        let c = b.next();
        assert!(b > a);
        assert!(c > b);
        assert_eq!(b.to_string(), "1");
    }

    #[test]
    fn crs_geographic_detection() {
        assert!(Crs::wgs84().is_geographic());
        assert!(Crs::new("crs:84").is_geographic());
        assert!(!Crs::new("EPSG:3857").is_geographic());
        assert!(!Crs::new("EPSG:2056").is_geographic());
    }

    #[test]
    fn bbox_point_is_zero_area() {
        let b = BBox::point(2600000.0, 1200000.0);
        assert!(b.is_point());
        assert!(b.contains(2600000.0, 1200000.0));
        assert!(!b.contains(2600001.0, 1200000.0));
    }

    #[test]
    fn bbox_contains_boundary() {
        let b = BBox::new(0.0, 0.0, 10.0, 5.0);
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(10.0, 5.0));
        assert!(b.contains(5.0, 2.5));
        assert!(!b.contains(10.1, 2.5));
        assert!(!b.is_point());
    }

    #[test]
    fn bbox_serializes_as_array() {
        let b = BBox::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&b).expect("serialize");
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
        let back: BBox = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, b);
    }

    #[test]
    fn place_item_wire_field_names() {
        let item = PlaceItem::point("p1", "Lausanne", 6.63, 46.52, Crs::wgs84(), "nominatim");
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["providerId"], "nominatim");
        assert_eq!(json["crs"], "EPSG:4326");
        assert_eq!(json["bbox"], serde_json::json!([6.63, 46.52, 6.63, 46.52]));
        assert!(json.get("label").is_none(), "absent label must be omitted");
    }

    #[test]
    fn place_point_coordinates_within_bbox() {
        let item = PlaceItem::point("p1", "Spot", 12.0, -3.0, Crs::new("EPSG:3857"), "x");
        assert!(item.bbox.contains(item.x, item.y));
        assert!(item.bbox.is_point());
    }

    #[test]
    fn theme_layer_wire_field_names() {
        let item = ThemeLayerItem {
            id: "hydrology".into(),
            text: "Hydrology".into(),
            layer_definition: serde_json::json!({"sublayers": ["rivers", "lakes"]}),
        };
        let json = serde_json::to_value(&item).expect("serialize");
        assert!(json.get("layerDefinition").is_some());
    }

    #[test]
    fn more_item_always_true_on_wire() {
        let item = MoreItem::new("m0", "nominatim", Some("waterway".into()));
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["more"], true);
        assert_eq!(json["providerId"], "nominatim");
        assert_eq!(json["category"], "waterway");
    }

    #[test]
    fn result_item_untagged_round_trip() {
        let items = vec![
            ResultItem::Place(PlaceItem::point("a", "A", 1.0, 2.0, Crs::wgs84(), "p")),
            ResultItem::ThemeLayer(ThemeLayerItem {
                id: "b".into(),
                text: "B".into(),
                layer_definition: serde_json::json!({"name": "b"}),
            }),
            ResultItem::More(MoreItem::new("c", "p", None)),
        ];
        let json = serde_json::to_string(&items).expect("serialize");
        let back: Vec<ResultItem> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, items);
        assert!(back[0].as_place().is_some());
        assert!(back[2].is_more());
    }

    #[test]
    fn group_title_key_serialized_camel_case() {
        let group = ResultGroup::with_title_key("coordinates0", "search.coordinates").priority(2);
        let json = serde_json::to_value(&group).expect("serialize");
        assert_eq!(json["titleKey"], "search.coordinates");
        assert_eq!(json["priority"], 2);
        assert!(json.get("title").is_none());
    }

    #[test]
    fn group_builders() {
        let group = ResultGroup::titled("g0", "Addresses");
        assert_eq!(group.id, "g0");
        assert_eq!(group.title.as_deref(), Some("Addresses"));
        assert!(group.title_key.is_none());
        assert!(group.priority.is_none());
        assert!(group.items.is_empty());
    }

    #[test]
    fn map_state_empty_has_no_layers() {
        assert!(MapState::empty().layers.is_empty());
    }
}
