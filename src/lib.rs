//! # atlas-search
//!
//! Federated place and layer search for map viewers.
//!
//! One user query fans out to several independently-implemented search
//! back-ends — geocoders, municipal catalogs, map-layer catalogs — and
//! the merged answers come back as one ranked, grouped result list. The
//! back-ends are heterogeneous (their own field names, CRS conventions,
//! pagination); the engine's job is the aggregation protocol: request
//! correlation, merge, "more results", and on-demand geometry
//! resolution, without ever blocking the caller or showing results from
//! a superseded query.
//!
//! ## Design
//!
//! - Providers implement [`SearchProvider`] and register once in a
//!   [`ProviderRegistry`]; availability predicates are re-evaluated
//!   against application state on every search
//! - A [`SearchSession`] mints strictly increasing request ids and
//!   silently drops responses of superseded requests — logical
//!   cancellation, no provider call is ever aborted
//! - Results merge additively as providers respond; group order is
//!   re-derived from priorities and insertion order, never arrival time
//! - One provider failing means one empty contribution, nothing more
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> atlas_search::Result<()> {
//! use std::sync::Arc;
//! use atlas_search::{
//!     providers::{CoordinatesProvider, NominatimProvider},
//!     MapState, ProviderRegistry, SearchOptions, SearchSession,
//! };
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register(Arc::new(CoordinatesProvider))?;
//! registry.register(Arc::new(NominatimProvider::new(None)?))?;
//!
//! let (session, mut updates) = SearchSession::new(Arc::new(registry), SearchOptions::default())?;
//! session.search("Lausanne", &MapState::empty());
//! while let Some(update) = updates.recv().await {
//!     for group in &update.groups {
//!         println!("{}: {} items", group.id, group.items.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod session;
pub mod types;

pub use config::SearchOptions;
pub use error::{Result, SearchError};
pub use provider::{ProviderLabel, SearchProvider};
pub use registry::ProviderRegistry;
pub use session::dispatch::{search_collect, SearchSession, SearchUpdate};
pub use session::geometry::resolve_geometry;
pub use types::{
    BBox, Crs, MapLayer, MapState, MoreItem, PlaceItem, RequestId, ResolvedGeometry, ResultGroup,
    ResultItem, ThemeLayerItem,
};
