//! Bundled search provider implementations.
//!
//! Each module provides a struct implementing
//! [`crate::provider::SearchProvider`]. Hosts register whichever of
//! these apply, alongside their own providers.

pub mod coordinates;
pub mod layers;
pub mod nominatim;

pub use coordinates::CoordinatesProvider;
pub use layers::{ThemeLayerEntry, ThemeLayerProvider};
pub use nominatim::NominatimProvider;
