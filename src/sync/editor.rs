//! sync::editor
//!
//! Editor session for a single point.
//!
//! A session is opened with the route's optional record id. In create mode
//! the draggable marker starts at the configured center; in edit mode the
//! record is loaded once the view is ready and the marker jumps to it.
//!
//! Dragging the marker writes the canonical encoding of its new position.
//! Saving requires a non-empty name and decodable coordinates; anything less
//! is silently skipped. After a successful save the session navigates back
//! and closes itself, so a repeated save cannot create a second record.
//!
//! Every operation on a closed session is a no-op. An in-flight load that is
//! dropped with its future simply never lands.

use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::navigation::Navigator;
use super::SyncError;
use crate::core::coords::{self, Coordinate};
use crate::core::types::{PointFields, RecordId};
use crate::map::{MapEvent, MapView, MapViewConfig, MarkerContent, MarkerHandle, MarkerOptions};
use crate::store::{PointStore, StoreError};
use crate::ui::prompts::{Alert, Prompter};

/// Hint shown on the editor's marker.
pub const DRAG_HINT: &str =
    "Drag the marker or move the map to change the coordinates of the location";

/// What a session will do on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(RecordId),
}

impl EditorMode {
    pub fn from_route(id: Option<RecordId>) -> Self {
        match id {
            Some(id) => EditorMode::Edit(id),
            None => EditorMode::Create,
        }
    }
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Name or coordinates missing or invalid, or the session is closed.
    Skipped,
    /// The store accepted the record.
    Saved(RecordId),
    /// The store refused; the user was alerted and may retry.
    Failed(StoreError),
}

pub struct PointEditor {
    mode: EditorMode,
    name: String,
    coordinates: String,
    store: Arc<dyn PointStore>,
    prompter: Rc<dyn Prompter>,
    navigator: Rc<dyn Navigator>,
    config: MapViewConfig,
    view: Option<Box<dyn MapView>>,
    marker: Option<MarkerHandle>,
    closed: bool,
}

impl std::fmt::Debug for PointEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointEditor")
            .field("mode", &self.mode)
            .field("name", &self.name)
            .field("coordinates", &self.coordinates)
            .field("store", &self.store.name())
            .field("marker", &self.marker)
            .field("closed", &self.closed)
            .finish()
    }
}

impl PointEditor {
    /// Open a session. `route_id` selects edit mode.
    pub fn open(
        route_id: Option<RecordId>,
        store: Arc<dyn PointStore>,
        prompter: Rc<dyn Prompter>,
        navigator: Rc<dyn Navigator>,
        config: MapViewConfig,
    ) -> Self {
        Self {
            mode: EditorMode::from_route(route_id),
            name: String::new(),
            coordinates: String::new(),
            store,
            prompter,
            navigator,
            config,
            view: None,
            marker: None,
            closed: false,
        }
    }

    /// The host has laid out the map container.
    ///
    /// Places the draggable marker at the configured center, then either
    /// takes the center as the new point's position or loads the record
    /// being edited. A load failure is alerted and returned; the session
    /// stays open so the user can back out.
    pub async fn on_view_ready(&mut self, mut view: Box<dyn MapView>) -> Result<(), SyncError> {
        if self.closed {
            return Ok(());
        }
        if self.view.is_some() {
            debug!("editor view already attached");
            return Ok(());
        }

        let center = self.config.center;
        view.set_view(center, self.config.zoom);
        let handle = view.place_marker(center, &MarkerOptions::draggable(self.config.icon.clone()));
        view.bind_content(handle, MarkerContent::text(DRAG_HINT));
        view.on_drag_end(handle);
        self.view = Some(view);
        self.marker = Some(handle);

        match self.mode.clone() {
            EditorMode::Create => {
                self.coordinates = center.encode();
                Ok(())
            }
            EditorMode::Edit(id) => self.load(id).await,
        }
    }

    async fn load(&mut self, id: RecordId) -> Result<(), SyncError> {
        let fields = match self.store.get(&id).await {
            Ok(fields) => fields,
            Err(e) => {
                warn!(id = %id, error = %e, "failed to load point");
                self.prompter.alert(&Alert::new("Load Failed", e.to_string()));
                return Err(e.into());
            }
        };
        if self.closed {
            return Ok(());
        }

        let position = match fields.decode() {
            Ok(position) => position,
            Err(e) => {
                warn!(id = %id, coordinates = %fields.coordinates, error = %e, "stored point has malformed coordinates");
                self.prompter.alert(&Alert::new(
                    "Load Failed",
                    format!("point {} has invalid coordinates: {}", id, e),
                ));
                return Err(SyncError::InvalidRecord { id, source: e });
            }
        };

        self.name = fields.name;
        self.coordinates = position.encode();
        if let (Some(view), Some(handle)) = (self.view.as_mut(), self.marker) {
            view.set_view(position, self.config.zoom);
            view.move_marker(handle, position);
        }
        debug!(id = %id, coordinates = %self.coordinates, "point loaded");
        Ok(())
    }

    /// The marker was released at `position`.
    pub fn on_marker_drag_end(&mut self, position: Coordinate) {
        if self.closed {
            return;
        }
        self.coordinates = position.encode();
    }

    /// Route a gesture from the view. Only drag-ends of this session's
    /// marker matter.
    pub fn handle_event(&mut self, event: MapEvent) {
        if let MapEvent::DragEnd { handle, position } = event {
            if Some(handle) == self.marker {
                self.on_marker_drag_end(position);
            }
        }
    }

    /// Drain and route every queued gesture.
    pub fn process_pending_events(&mut self) {
        while let Some(event) = self.view.as_mut().and_then(|view| view.poll_event()) {
            self.handle_event(event);
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.closed {
            return;
        }
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded coordinates, empty until the view is ready.
    pub fn coordinates(&self) -> &str {
        &self.coordinates
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn marker(&self) -> Option<MarkerHandle> {
        self.marker
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Write the session to the store.
    pub async fn save(&mut self) -> SaveOutcome {
        if self.closed {
            return SaveOutcome::Skipped;
        }
        if self.name.is_empty() || self.coordinates.is_empty() {
            debug!("save skipped: name or coordinates empty");
            return SaveOutcome::Skipped;
        }
        if let Err(e) = coords::decode(&self.coordinates) {
            debug!(error = %e, "save skipped: coordinates do not decode");
            return SaveOutcome::Skipped;
        }

        let fields = PointFields::new(self.name.clone(), self.coordinates.clone());
        let result = match &self.mode {
            EditorMode::Edit(id) => self.store.update(id, fields).await.map(|()| id.clone()),
            EditorMode::Create => self.store.create(fields).await,
        };

        match result {
            Ok(id) => {
                info!(id = %id, "point saved");
                self.navigator.back();
                self.close();
                SaveOutcome::Saved(id)
            }
            Err(e) => {
                let header = match self.mode {
                    EditorMode::Edit(_) => "Update Failed",
                    EditorMode::Create => "Save Failed",
                };
                warn!(error = %e, "{}", header);
                self.prompter.alert(&Alert::new(header, e.to_string()));
                SaveOutcome::Failed(e)
            }
        }
    }

    /// Tear the session down and remove its marker.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if let (Some(view), Some(handle)) = (self.view.as_mut(), self.marker.take()) {
            view.remove_marker(handle);
        }
        self.view = None;
        self.closed = true;
    }
}
