//! map::headless
//!
//! In-memory `MapView` with gesture simulation.
//!
//! # Design
//!
//! `HeadlessMap` keeps markers in memory and queues gestures as events. It
//! backs the command-line front end, where there is no rendered surface, and
//! the tests, which use [`HeadlessMap::drag`] and [`HeadlessMap::tap`] to
//! stand in for a user.
//!
//! Clones share state, so a caller can hand one clone to a component as a
//! `Box<dyn MapView>` and keep another to inspect or drive it.
//!
//! # Example
//!
//! ```
//! use pointmap::core::coords::Coordinate;
//! use pointmap::map::{HeadlessMap, MapEvent, MapView, MarkerOptions, IconConfig};
//!
//! let map = HeadlessMap::new();
//! let mut view: Box<dyn MapView> = Box::new(map.clone());
//!
//! let start = Coordinate::new(0.0, 0.0).unwrap();
//! let handle = view.place_marker(start, &MarkerOptions::draggable(IconConfig::default()));
//! view.on_drag_end(handle);
//!
//! let end = Coordinate::new(1.0, 2.0).unwrap();
//! assert!(map.drag(handle, end));
//! assert_eq!(
//!     view.poll_event(),
//!     Some(MapEvent::DragEnd { handle, position: end })
//! );
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use super::view::{
    MapEvent, MapView, MapViewConfig, MarkerAction, MarkerContent, MarkerHandle, MarkerOptions,
};
use crate::core::coords::Coordinate;

/// Snapshot of one marker on a headless map.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub position: Coordinate,
    pub options: MarkerOptions,
    pub content: Option<MarkerContent>,
    pub drag_watched: bool,
}

/// Headless map view.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMap {
    inner: Rc<RefCell<HeadlessInner>>,
}

#[derive(Debug, Default)]
struct HeadlessInner {
    markers: BTreeMap<MarkerHandle, PlacedMarker>,
    next_handle: u64,
    events: VecDeque<MapEvent>,
    viewport: Option<(Coordinate, u8)>,
}

impl HeadlessMap {
    /// Create an empty map with no viewport set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map already centered per `config`.
    pub fn with_config(config: &MapViewConfig) -> Self {
        let map = Self::new();
        map.inner.borrow_mut().viewport = Some((config.center, config.zoom));
        map
    }

    /// Current center and zoom, if set.
    pub fn viewport(&self) -> Option<(Coordinate, u8)> {
        self.inner.borrow().viewport
    }

    /// All markers, ordered by handle.
    pub fn markers(&self) -> Vec<PlacedMarker> {
        self.inner.borrow().markers.values().cloned().collect()
    }

    /// A single marker.
    pub fn marker(&self, handle: MarkerHandle) -> Option<PlacedMarker> {
        self.inner.borrow().markers.get(&handle).cloned()
    }

    pub fn marker_count(&self) -> usize {
        self.inner.borrow().markers.len()
    }

    /// Find the first marker whose label matches.
    pub fn find_by_label(&self, label: &str) -> Option<PlacedMarker> {
        self.inner
            .borrow()
            .markers
            .values()
            .find(|m| m.content.as_ref().is_some_and(|c| c.label == label))
            .cloned()
    }

    /// Simulate the user dragging a marker and releasing it at `to`.
    ///
    /// Returns `false` (and does nothing) if the marker is unknown or not
    /// draggable. A drag-end event is queued only if someone subscribed.
    pub fn drag(&self, handle: MarkerHandle, to: Coordinate) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(marker) = inner.markers.get_mut(&handle) else {
            return false;
        };
        if !marker.options.draggable {
            return false;
        }
        marker.position = to;
        let watched = marker.drag_watched;
        if watched {
            inner.events.push_back(MapEvent::DragEnd {
                handle,
                position: to,
            });
        }
        true
    }

    /// Simulate a tap on one of a marker's popup actions.
    ///
    /// Returns `false` if the marker is unknown or does not offer `action`.
    pub fn tap(&self, handle: MarkerHandle, action: MarkerAction) -> bool {
        let mut inner = self.inner.borrow_mut();
        let offered = inner
            .markers
            .get(&handle)
            .and_then(|m| m.content.as_ref())
            .is_some_and(|c| c.has_action(action));
        if offered {
            inner
                .events
                .push_back(MapEvent::ActionInvoked { handle, action });
        }
        offered
    }

    /// Number of queued, unpolled events.
    pub fn pending_events(&self) -> usize {
        self.inner.borrow().events.len()
    }
}

impl MapView for HeadlessMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.inner.borrow_mut().viewport = Some((center, zoom));
    }

    fn place_marker(&mut self, at: Coordinate, options: &MarkerOptions) -> MarkerHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_handle += 1;
        let handle = MarkerHandle(inner.next_handle);
        inner.markers.insert(
            handle,
            PlacedMarker {
                handle,
                position: at,
                options: options.clone(),
                content: None,
                drag_watched: false,
            },
        );
        handle
    }

    fn move_marker(&mut self, handle: MarkerHandle, to: Coordinate) -> bool {
        match self.inner.borrow_mut().markers.get_mut(&handle) {
            Some(marker) => {
                marker.position = to;
                true
            }
            None => false,
        }
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.markers.remove(&handle);
        // Gestures on a destroyed marker must not surface later.
        inner.events.retain(|e| match e {
            MapEvent::DragEnd { handle: h, .. } | MapEvent::ActionInvoked { handle: h, .. } => {
                *h != handle
            }
        });
    }

    fn marker_position(&self, handle: MarkerHandle) -> Option<Coordinate> {
        self.inner.borrow().markers.get(&handle).map(|m| m.position)
    }

    fn on_drag_end(&mut self, handle: MarkerHandle) {
        if let Some(marker) = self.inner.borrow_mut().markers.get_mut(&handle) {
            marker.drag_watched = true;
        }
    }

    fn bind_content(&mut self, handle: MarkerHandle, content: MarkerContent) {
        if let Some(marker) = self.inner.borrow_mut().markers.get_mut(&handle) {
            marker.content = Some(content);
        }
    }

    fn poll_event(&mut self) -> Option<MapEvent> {
        self.inner.borrow_mut().events.pop_front()
    }
}

/// Create the map view used when no rendered surface is available.
pub fn create_map_view(config: &MapViewConfig) -> HeadlessMap {
    HeadlessMap::with_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::view::IconConfig;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn handles_are_unique() {
        let mut map = HeadlessMap::new();
        let a = map.place_marker(c(0.0, 0.0), &MarkerOptions::fixed(IconConfig::default()));
        let b = map.place_marker(c(0.0, 0.0), &MarkerOptions::fixed(IconConfig::default()));
        assert_ne!(a, b);
        assert_eq!(map.marker_count(), 2);
    }

    #[test]
    fn fixed_markers_cannot_be_dragged() {
        let mut map = HeadlessMap::new();
        let h = map.place_marker(c(0.0, 0.0), &MarkerOptions::fixed(IconConfig::default()));
        map.on_drag_end(h);
        assert!(!map.drag(h, c(1.0, 1.0)));
        assert_eq!(map.marker_position(h), Some(c(0.0, 0.0)));
        assert_eq!(map.pending_events(), 0);
    }

    #[test]
    fn drag_without_subscription_moves_silently() {
        let mut map = HeadlessMap::new();
        let h = map.place_marker(c(0.0, 0.0), &MarkerOptions::draggable(IconConfig::default()));
        assert!(map.drag(h, c(1.0, 1.0)));
        assert_eq!(map.marker_position(h), Some(c(1.0, 1.0)));
        assert!(map.poll_event().is_none());
    }

    #[test]
    fn tap_requires_offered_action() {
        let mut map = HeadlessMap::new();
        let h = map.place_marker(c(0.0, 0.0), &MarkerOptions::fixed(IconConfig::default()));
        assert!(!map.tap(h, MarkerAction::Edit));

        map.bind_content(h, MarkerContent::record("A"));
        assert!(map.tap(h, MarkerAction::Delete));
        assert_eq!(
            map.poll_event(),
            Some(MapEvent::ActionInvoked {
                handle: h,
                action: MarkerAction::Delete
            })
        );
    }

    #[test]
    fn remove_drops_pending_events() {
        let mut map = HeadlessMap::new();
        let h = map.place_marker(c(0.0, 0.0), &MarkerOptions::fixed(IconConfig::default()));
        map.bind_content(h, MarkerContent::record("A"));
        map.tap(h, MarkerAction::Edit);

        map.remove_marker(h);
        assert_eq!(map.marker_count(), 0);
        assert!(map.poll_event().is_none());
        assert!(!map.move_marker(h, c(1.0, 1.0)));
    }

    #[test]
    fn find_by_label() {
        let mut map = HeadlessMap::new();
        let h = map.place_marker(c(3.0, 4.0), &MarkerOptions::fixed(IconConfig::default()));
        map.bind_content(h, MarkerContent::record("Tugu"));
        assert_eq!(map.find_by_label("Tugu").map(|m| m.handle), Some(h));
        assert!(map.find_by_label("Kraton").is_none());
    }

    #[test]
    fn create_map_view_applies_viewport() {
        let config = MapViewConfig {
            center: c(-7.7956, 110.3695),
            zoom: 13,
            icon: IconConfig::default(),
        };
        let map = create_map_view(&config);
        assert_eq!(map.viewport(), Some((c(-7.7956, 110.3695), 13)));
    }
}
