//! map::view
//!
//! The map interface consumed by the marker components.
//!
//! # Design
//!
//! A `MapView` is whatever surface renders markers over base tiles. The
//! components in this crate only need positioning, marker lifecycle, marker
//! content and a queue of user gestures; tile sources, attribution and layer
//! controls belong to the renderer.
//!
//! Marker chrome is described declaratively by [`MarkerContent`] and
//! rendered by the view. A tap on one of its actions, or the end of a drag,
//! comes back as a [`MapEvent`] from [`MapView::poll_event`].
//!
//! Marker appearance is passed explicitly through [`MarkerOptions`]; there is
//! no process-wide default icon.

use serde::{Deserialize, Serialize};

use crate::core::coords::Coordinate;

/// Reference to a marker placed on a particular view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

impl std::fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Marker icon description, in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    pub icon_url: String,
    pub retina_url: String,
    pub shadow_url: String,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub tooltip_anchor: [i32; 2],
    pub shadow_size: [u32; 2],
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            icon_url: "assets/marker-icon.png".into(),
            retina_url: "assets/marker-icon-2x.png".into(),
            shadow_url: "assets/marker-shadow.png".into(),
            size: [25, 41],
            anchor: [12, 41],
            popup_anchor: [1, -34],
            tooltip_anchor: [16, -28],
            shadow_size: [41, 41],
        }
    }
}

/// Options for placing a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOptions {
    pub draggable: bool,
    pub icon: IconConfig,
}

impl MarkerOptions {
    /// A marker the user cannot move.
    pub fn fixed(icon: IconConfig) -> Self {
        Self {
            draggable: false,
            icon,
        }
    }

    /// A marker the user can drag.
    pub fn draggable(icon: IconConfig) -> Self {
        Self {
            draggable: true,
            icon,
        }
    }
}

/// An affordance shown in a marker's popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerAction {
    Edit,
    Delete,
}

impl std::fmt::Display for MarkerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerAction::Edit => write!(f, "edit"),
            MarkerAction::Delete => write!(f, "delete"),
        }
    }
}

/// Declarative popup content for a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerContent {
    pub label: String,
    pub actions: Vec<MarkerAction>,
}

impl MarkerContent {
    /// Plain label without affordances.
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            actions: Vec::new(),
        }
    }

    /// Label with edit and delete affordances, as shown for stored points.
    pub fn record(name: impl Into<String>) -> Self {
        Self {
            label: name.into(),
            actions: vec![MarkerAction::Edit, MarkerAction::Delete],
        }
    }

    pub fn has_action(&self, action: MarkerAction) -> bool {
        self.actions.contains(&action)
    }
}

/// A user gesture reported by the view.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A draggable marker was released at `position`.
    DragEnd {
        handle: MarkerHandle,
        position: Coordinate,
    },
    /// One of a marker's popup actions was tapped.
    ActionInvoked {
        handle: MarkerHandle,
        action: MarkerAction,
    },
}

/// Initial view settings handed to the map factory.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewConfig {
    pub center: Coordinate,
    pub zoom: u8,
    pub icon: IconConfig,
}

/// A rendered map surface.
///
/// Views live on the UI thread and are driven from a single event loop, so
/// the trait has no `Send` bound.
pub trait MapView {
    /// Center the viewport.
    fn set_view(&mut self, center: Coordinate, zoom: u8);

    /// Place a marker and return its handle.
    fn place_marker(&mut self, at: Coordinate, options: &MarkerOptions) -> MarkerHandle;

    /// Move a marker. Returns `false` if the handle is unknown to this view.
    fn move_marker(&mut self, handle: MarkerHandle, to: Coordinate) -> bool;

    /// Detach and destroy a marker. Unknown handles are ignored.
    fn remove_marker(&mut self, handle: MarkerHandle);

    /// Current position of a marker.
    fn marker_position(&self, handle: MarkerHandle) -> Option<Coordinate>;

    /// Ask to be told (through [`MapView::poll_event`]) when a drag of this
    /// marker ends.
    fn on_drag_end(&mut self, handle: MarkerHandle);

    /// Replace a marker's popup content.
    fn bind_content(&mut self, handle: MarkerHandle, content: MarkerContent);

    /// Next pending gesture, if any.
    fn poll_event(&mut self) -> Option<MapEvent>;
}
