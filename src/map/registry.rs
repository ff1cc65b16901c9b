//! map::registry
//!
//! The live mapping between store records and on-map markers.
//!
//! # Invariants
//!
//! - At most one marker per record id.
//! - The registry is the only owner of this mapping; other components ask it
//!   instead of keeping their own copy.
//! - Every handle it holds refers to a marker currently on its view.
//!
//! Taps on a marker's popup actions are resolved through the registry into
//! [`MarkerIntent`]s naming the record, see [`MarkerRegistry::resolve_action`].

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::view::{
    IconConfig, MapView, MarkerAction, MarkerContent, MarkerHandle, MarkerOptions,
};
use crate::core::coords::Coordinate;
use crate::core::types::RecordId;

/// What the user asked for by tapping a marker's chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerIntent {
    EditRequested(RecordId),
    DeleteRequested(RecordId),
}

/// Owner of the record-to-marker mapping for one map view.
pub struct MarkerRegistry {
    view: Box<dyn MapView>,
    icon: IconConfig,
    by_record: BTreeMap<RecordId, MarkerHandle>,
    by_handle: HashMap<MarkerHandle, RecordId>,
}

impl std::fmt::Debug for MarkerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerRegistry")
            .field("markers", &self.by_record)
            .finish()
    }
}

impl MarkerRegistry {
    /// Create a registry that places markers on `view` with `icon`.
    pub fn new(view: Box<dyn MapView>, icon: IconConfig) -> Self {
        Self {
            view,
            icon,
            by_record: BTreeMap::new(),
            by_handle: HashMap::new(),
        }
    }

    /// Place or refresh the marker for `id`.
    ///
    /// An existing marker is moved and its content replaced in place; its
    /// handle does not change. Calling this twice with the same arguments
    /// leaves exactly one marker at `at`.
    pub fn upsert(&mut self, id: RecordId, at: Coordinate, content: MarkerContent) -> MarkerHandle {
        if let Some(&handle) = self.by_record.get(&id) {
            if self.view.move_marker(handle, at) {
                self.view.bind_content(handle, content);
                return handle;
            }
            // The view lost the marker behind our back; forget it and re-place.
            debug!(id = %id, %handle, "registered marker missing from view");
            self.by_record.remove(&id);
            self.by_handle.remove(&handle);
        }

        let handle = self
            .view
            .place_marker(at, &MarkerOptions::fixed(self.icon.clone()));
        self.view.bind_content(handle, content);
        self.by_handle.insert(handle, id.clone());
        self.by_record.insert(id, handle);
        handle
    }

    /// Remove the marker for `id`. Absent ids are not an error.
    pub fn remove(&mut self, id: &RecordId) {
        if let Some(handle) = self.by_record.remove(id) {
            self.by_handle.remove(&handle);
            self.view.remove_marker(handle);
        }
    }

    /// Remove every registered marker.
    pub fn clear(&mut self) {
        for (_, handle) in std::mem::take(&mut self.by_record) {
            self.view.remove_marker(handle);
        }
        self.by_handle.clear();
    }

    /// Translate a tap on `handle`'s popup into an intent.
    ///
    /// Returns `None` for handles this registry does not own.
    pub fn resolve_action(&self, handle: MarkerHandle, action: MarkerAction) -> Option<MarkerIntent> {
        let id = self.by_handle.get(&handle)?.clone();
        Some(match action {
            MarkerAction::Edit => MarkerIntent::EditRequested(id),
            MarkerAction::Delete => MarkerIntent::DeleteRequested(id),
        })
    }

    pub fn handle_of(&self, id: &RecordId) -> Option<MarkerHandle> {
        self.by_record.get(id).copied()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.by_record.contains_key(id)
    }

    /// Registered record ids, in order.
    pub fn record_ids(&self) -> Vec<RecordId> {
        self.by_record.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_record.is_empty()
    }

    /// The underlying view, for viewport changes and unregistered markers.
    pub fn view_mut(&mut self) -> &mut dyn MapView {
        self.view.as_mut()
    }

    pub fn view(&self) -> &dyn MapView {
        self.view.as_ref()
    }
}
