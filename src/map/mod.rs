//! map
//!
//! Map surface abstraction and marker bookkeeping.
//!
//! # Modules
//!
//! - [`view`] - The `MapView` trait, marker options/content and gestures
//! - [`headless`] - In-memory `MapView` used by the CLI and tests
//! - [`registry`] - `MarkerRegistry`, the record-to-marker mapping

pub mod headless;
pub mod registry;
pub mod view;

pub use headless::{create_map_view, HeadlessMap, PlacedMarker};
pub use registry::{MarkerIntent, MarkerRegistry};
pub use view::{
    IconConfig, MapEvent, MapView, MapViewConfig, MarkerAction, MarkerContent, MarkerHandle,
    MarkerOptions,
};
