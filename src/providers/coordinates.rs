//! Built-in coordinate-pair provider — the one provider implemented
//! entirely inside the engine, since it needs no network call.
//!
//! Matches the input against a strict two-number pattern
//! (`x[,/ ]y`, optional leading sign, optional decimals) and offers up
//! to three candidate interpretations, each with its own CRS:
//!
//! 1. the raw pair in the map display CRS, when that CRS is not geographic
//! 2. the pair as (lon, lat), when both values are in valid lon/lat ranges
//! 3. the pair as (lat, lon), when both values are in range **and** not
//!    numerically equal (x == y would duplicate interpretation 2)

use async_trait::async_trait;

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::provider::{ProviderLabel, SearchProvider};
use crate::types::{Crs, PlaceItem, ResultGroup, ResultItem};

pub(crate) const PROVIDER_ID: &str = "coordinates";

/// Coordinate-input provider. Stateless; candidates are derived from the
/// query text and the display CRS alone.
pub struct CoordinatesProvider;

#[async_trait]
impl SearchProvider for CoordinatesProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn label(&self) -> ProviderLabel {
        ProviderLabel::MsgId("search.coordinates".into())
    }

    async fn search(
        &self,
        text: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ResultGroup>, SearchError> {
        let items = candidates(text, &options.display_crs);
        if items.is_empty() {
            return Ok(vec![]);
        }
        let mut group = ResultGroup::with_title_key("coordinates0", "search.coordinates");
        group.items = items.into_iter().map(ResultItem::Place).collect();
        Ok(vec![group])
    }
}

/// Candidate interpretations for a coordinate-looking input.
///
/// Returns an empty list when the input does not match the strict
/// two-number pattern. Each candidate is a place with a zero-area bbox
/// at the point.
pub(crate) fn candidates(text: &str, display_crs: &Crs) -> Vec<PlaceItem> {
    let Some((first, second)) = parse_pair(text) else {
        return Vec::new();
    };

    let mut items = Vec::new();

    if !display_crs.is_geographic() {
        items.push(candidate(items.len(), first, second, display_crs.clone()));
    }

    // (lon, lat) as typed.
    if (-180.0..=180.0).contains(&first) && (-90.0..=90.0).contains(&second) {
        items.push(candidate(items.len(), first, second, Crs::wgs84()));
    }

    // (lat, lon), i.e. swapped. Suppressed when the values are equal —
    // it would render the exact same point as the previous candidate.
    if (-90.0..=90.0).contains(&first) && (-180.0..=180.0).contains(&second) && first != second {
        items.push(candidate(items.len(), second, first, Crs::wgs84()));
    }

    items
}

fn candidate(index: usize, x: f64, y: f64, crs: Crs) -> PlaceItem {
    let text = format!("{x}, {y} ({crs})");
    PlaceItem::point(format!("coord{index}"), text, x, y, crs, PROVIDER_ID)
}

/// Split the input into exactly two strictly numeric tokens.
///
/// Accepted separators: one comma, one slash, or whitespace. Tokens must
/// match `[+-]?digits[.digits]` — no exponents, no infinities, nothing
/// trailing.
pub(crate) fn parse_pair(text: &str) -> Option<(f64, f64)> {
    let text = text.trim();
    let (a, b) = if let Some((a, b)) = text.split_once(',') {
        (a, b)
    } else if let Some((a, b)) = text.split_once('/') {
        (a, b)
    } else {
        let mut parts = text.split_whitespace();
        let a = parts.next()?;
        let b = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        (a, b)
    };
    Some((parse_strict_number(a)?, parse_strict_number(b)?))
}

/// Parse a number of the form `[+-]?digits[.digits]`, rejecting
/// everything `f64::from_str` would additionally accept (exponents,
/// `inf`, `nan`, hex-ish forms).
fn parse_strict_number(token: &str) -> Option<f64> {
    let token = token.trim();
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (digits, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    token.parse().ok()
}
