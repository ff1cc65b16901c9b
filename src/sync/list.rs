//! sync::list
//!
//! Map-view controller: keeps the marker set equal to the store's contents.
//!
//! # Refresh cycle
//!
//! ```text
//! Idle -> Fetching -> Reconciling -> Idle
//! ```
//!
//! The only suspension point is the listing fetch. Reconciliation (clear,
//! then upsert every valid record) runs without yielding, so the marker set
//! always mirrors exactly one completed fetch. `refresh` takes `&mut self`,
//! which rules out two overlapping refreshes on the same controller. A
//! refresh dropped while fetching leaves the previous markers in place.
//!
//! # Failure policy
//!
//! - A record whose coordinates do not decode is skipped, logged and listed
//!   in [`RefreshReport::skipped`]; the rest of the listing is still shown.
//!   Stores hand misshapen entries on with empty coordinates, so they land
//!   here too. Entries whose key is unusable never reach this layer.
//! - A failed listing is alerted and leaves the current markers untouched.
//! - A delete is only reflected on the map after the store confirms it.

use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::navigation::Navigator;
use super::SyncError;
use crate::core::types::{PointRecord, RecordId};
use crate::map::{MapEvent, MapView, MapViewConfig, MarkerContent, MarkerIntent, MarkerOptions, MarkerRegistry};
use crate::store::{PointStore, StoreError};
use crate::ui::prompts::{Alert, ConfirmRequest, PromptError, Prompter};

/// Where a refresh currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Reconciling,
}

/// Result of one refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    /// Records now shown on the map, ordered by id.
    pub shown: Vec<PointRecord>,
    /// Records left off the map because their stored fields were malformed.
    pub skipped: Vec<RecordId>,
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent to the store.
    Cancelled,
    /// The store deleted the record and the map was refreshed.
    Deleted(RefreshReport),
    /// The store refused; the user was alerted and the map is unchanged.
    Failed(StoreError),
}

/// Controller for the map screen.
pub struct PointListSync {
    store: Arc<dyn PointStore>,
    prompter: Rc<dyn Prompter>,
    navigator: Rc<dyn Navigator>,
    config: MapViewConfig,
    landmark: Option<String>,
    registry: Option<MarkerRegistry>,
    state: SyncState,
}

impl PointListSync {
    pub fn new(
        store: Arc<dyn PointStore>,
        prompter: Rc<dyn Prompter>,
        navigator: Rc<dyn Navigator>,
        config: MapViewConfig,
    ) -> Self {
        Self {
            store,
            prompter,
            navigator,
            config,
            landmark: None,
            registry: None,
            state: SyncState::Idle,
        }
    }

    /// Show a labelled marker at the view center that is not a store record.
    pub fn with_landmark(mut self, label: impl Into<String>) -> Self {
        self.landmark = Some(label.into());
        self
    }

    /// The host has laid out the map container.
    ///
    /// Centers the view, places the landmark (if any) and runs the first
    /// refresh. A second call keeps the already attached view and only
    /// refreshes.
    pub async fn on_view_ready(
        &mut self,
        mut view: Box<dyn MapView>,
    ) -> Result<RefreshReport, SyncError> {
        if self.registry.is_some() {
            debug!("map view already attached; refreshing only");
            return self.refresh().await;
        }

        view.set_view(self.config.center, self.config.zoom);
        if let Some(label) = &self.landmark {
            let handle = view.place_marker(
                self.config.center,
                &MarkerOptions::fixed(self.config.icon.clone()),
            );
            view.bind_content(handle, MarkerContent::text(label.clone()));
        }

        self.registry = Some(MarkerRegistry::new(view, self.config.icon.clone()));
        self.refresh().await
    }

    /// Replace the marker set with the store's current contents.
    pub async fn refresh(&mut self) -> Result<RefreshReport, SyncError> {
        if self.registry.is_none() {
            return Err(SyncError::ViewNotReady);
        }

        self.state = SyncState::Fetching;
        let listing = match self.store.list().await {
            Ok(listing) => listing,
            Err(e) => {
                self.state = SyncState::Idle;
                warn!(error = %e, "failed to fetch point listing");
                self.prompter.alert(&Alert::new("Load Failed", e.to_string()));
                return Err(e.into());
            }
        };

        self.state = SyncState::Reconciling;
        let mut report = RefreshReport::default();
        for (id, fields) in listing {
            let raw = fields.coordinates.clone();
            match PointRecord::from_fields(id.clone(), fields) {
                Ok(record) => report.shown.push(record),
                Err(e) => {
                    warn!(id = %id, coordinates = %raw, error = %e, "skipping malformed point");
                    report.skipped.push(id);
                }
            }
        }

        if let Some(registry) = self.registry.as_mut() {
            registry.clear();
            for record in &report.shown {
                registry.upsert(
                    record.id.clone(),
                    record.coordinate,
                    MarkerContent::record(record.name.clone()),
                );
            }
        }
        self.state = SyncState::Idle;

        debug!(
            shown = report.shown.len(),
            skipped = report.skipped.len(),
            "refresh complete"
        );
        Ok(report)
    }

    /// Ask for confirmation, then delete the record and refresh.
    pub async fn on_delete_requested(&mut self, id: RecordId) -> Result<DeleteOutcome, SyncError> {
        if self.registry.is_none() {
            return Err(SyncError::ViewNotReady);
        }

        let confirmed = match self.prompter.confirm(&ConfirmRequest::delete_point()) {
            Ok(answer) => answer,
            Err(PromptError::Cancelled) => false,
            Err(e) => return Err(e.into()),
        };
        if !confirmed {
            debug!(id = %id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(e) = self.store.delete(&id).await {
            warn!(id = %id, error = %e, "delete failed");
            self.prompter.alert(&Alert::new("Delete Failed", e.to_string()));
            return Ok(DeleteOutcome::Failed(e));
        }
        info!(id = %id, "point deleted");

        let report = self.refresh().await?;
        Ok(DeleteOutcome::Deleted(report))
    }

    /// Hand the record over to an editor session.
    pub fn on_edit_requested(&self, id: RecordId) {
        self.navigator.open_editor(Some(id));
    }

    /// Open an editor session for a new record.
    pub fn on_create_requested(&self) {
        self.navigator.open_editor(None);
    }

    /// Dispatch a gesture reported by the map view.
    ///
    /// Taps on record markers become edit/delete requests; anything else is
    /// ignored.
    pub async fn handle_event(&mut self, event: MapEvent) -> Result<(), SyncError> {
        let MapEvent::ActionInvoked { handle, action } = event else {
            return Ok(());
        };
        let intent = match &self.registry {
            Some(registry) => registry.resolve_action(handle, action),
            None => return Err(SyncError::ViewNotReady),
        };

        match intent {
            Some(MarkerIntent::EditRequested(id)) => self.on_edit_requested(id),
            Some(MarkerIntent::DeleteRequested(id)) => {
                self.on_delete_requested(id).await?;
            }
            None => debug!(%handle, %action, "tap on unregistered marker"),
        }
        Ok(())
    }

    /// Drain and dispatch every queued gesture.
    pub async fn process_pending_events(&mut self) -> Result<(), SyncError> {
        loop {
            let event = match self.registry.as_mut() {
                Some(registry) => registry.view_mut().poll_event(),
                None => return Err(SyncError::ViewNotReady),
            };
            match event {
                Some(event) => self.handle_event(event).await?,
                None => return Ok(()),
            }
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The marker registry, once the view is ready.
    pub fn registry(&self) -> Option<&MarkerRegistry> {
        self.registry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coords::Coordinate;
    use crate::core::types::PointFields;
    use crate::map::{HeadlessMap, IconConfig, MarkerAction};
    use crate::store::mock::{FailOn, MockOperation, MockStore};
    use crate::sync::navigation::{NavigationEvent, RecordingNavigator};
    use crate::ui::prompts::ScriptedPrompter;

    fn rid(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    fn config() -> MapViewConfig {
        MapViewConfig {
            center: Coordinate::new(-7.7956, 110.3695).unwrap(),
            zoom: 13,
            icon: IconConfig::default(),
        }
    }

    struct Harness {
        sync: PointListSync,
        store: MockStore,
        map: HeadlessMap,
        prompter: Rc<ScriptedPrompter>,
        navigator: Rc<RecordingNavigator>,
    }

    fn harness(store: MockStore, prompter: ScriptedPrompter) -> Harness {
        let prompter = Rc::new(prompter);
        let navigator = Rc::new(RecordingNavigator::new());
        let sync = PointListSync::new(
            Arc::new(store.clone()),
            prompter.clone(),
            navigator.clone(),
            config(),
        );
        Harness {
            sync,
            store,
            map: HeadlessMap::new(),
            prompter,
            navigator,
        }
    }

    fn abc_store() -> MockStore {
        MockStore::with_points(vec![
            (rid("a"), PointFields::new("A", "1.000000000,1.000000000")),
            (rid("b"), PointFields::new("B", "2.000000000,2.000000000")),
            (rid("c"), PointFields::new("C", "3.000000000,3.000000000")),
        ])
    }

    #[tokio::test]
    async fn refresh_before_view_ready_fails() {
        let mut h = harness(MockStore::new(), ScriptedPrompter::new());
        assert!(matches!(h.sync.refresh().await, Err(SyncError::ViewNotReady)));
        assert!(h.store.operations().is_empty());
    }

    #[tokio::test]
    async fn view_ready_centers_and_shows_listing() {
        let mut h = harness(abc_store(), ScriptedPrompter::new());

        let report = h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        assert_eq!(report.shown.len(), 3);
        assert_eq!(h.map.viewport(), Some((config().center, 13)));
        assert_eq!(h.map.marker_count(), 3);
        assert_eq!(h.sync.state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn landmark_survives_refresh() {
        let mut h = harness(abc_store(), ScriptedPrompter::new());
        h.sync = h.sync.with_landmark("yogyakarta");

        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();
        h.sync.refresh().await.unwrap();

        assert_eq!(h.map.marker_count(), 4);
        let landmark = h.map.find_by_label("yogyakarta").unwrap();
        assert!(landmark.content.unwrap().actions.is_empty());
    }

    #[tokio::test]
    async fn refresh_reflects_remote_deletion() {
        let mut h = harness(abc_store(), ScriptedPrompter::new());
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        h.store.remove_remote(&rid("b"));
        h.sync.refresh().await.unwrap();

        let registry = h.sync.registry().unwrap();
        assert_eq!(registry.record_ids(), vec![rid("a"), rid("c")]);
        assert_eq!(h.map.marker_count(), 2);
        assert!(h.map.find_by_label("B").is_none());
    }

    #[tokio::test]
    async fn malformed_record_is_skipped_not_fatal() {
        let store = abc_store();
        store.put_remote(rid("bad"), PointFields::new("Bad", "somewhere"));
        let mut h = harness(store, ScriptedPrompter::new());

        let report = h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        assert_eq!(report.skipped, vec![rid("bad")]);
        assert_eq!(report.shown.len(), 3);
        assert!(!h.sync.registry().unwrap().contains(&rid("bad")));
    }

    #[tokio::test]
    async fn misshapen_record_is_reported_as_skipped() {
        let store = abc_store();
        store.put_remote(rid("no-coords"), PointFields::new("Nameless", ""));
        let mut h = harness(store, ScriptedPrompter::new());

        let report = h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        assert_eq!(report.skipped, vec![rid("no-coords")]);
        assert!(h.map.find_by_label("Nameless").is_none());
    }

    #[tokio::test]
    async fn failed_listing_keeps_markers_and_alerts() {
        let mut h = harness(abc_store(), ScriptedPrompter::new());
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        h.store
            .set_fail_on(FailOn::List(StoreError::NetworkError("offline".into())));
        let result = h.sync.refresh().await;

        assert!(matches!(
            result,
            Err(SyncError::Store(StoreError::NetworkError(_)))
        ));
        assert_eq!(h.map.marker_count(), 3);
        assert_eq!(h.sync.state(), SyncState::Idle);
        assert_eq!(
            h.prompter.alerts(),
            vec![Alert::new("Load Failed", "network error: offline")]
        );
    }

    #[tokio::test]
    async fn delete_confirmed_calls_store_once_and_refreshes() {
        let mut h = harness(abc_store(), ScriptedPrompter::with_answers([true]));
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();
        h.store.clear_operations();

        let outcome = h.sync.on_delete_requested(rid("b")).await.unwrap();

        let DeleteOutcome::Deleted(report) = outcome else {
            panic!("expected deletion, got {:?}", outcome);
        };
        assert!(report.shown.iter().all(|r| r.id != rid("b")));
        assert_eq!(
            h.store.operations(),
            vec![MockOperation::Delete { id: rid("b") }, MockOperation::List]
        );
        assert!(!h.sync.registry().unwrap().contains(&rid("b")));
    }

    #[tokio::test]
    async fn delete_cancelled_makes_no_store_calls() {
        let mut h = harness(abc_store(), ScriptedPrompter::with_answers([false]));
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();
        h.store.clear_operations();

        let outcome = h.sync.on_delete_requested(rid("b")).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(h.store.operations().is_empty());
        assert!(h.sync.registry().unwrap().contains(&rid("b")));
        assert_eq!(h.prompter.asked(), vec![ConfirmRequest::delete_point()]);
    }

    #[tokio::test]
    async fn delete_failure_leaves_markers_and_alerts() {
        let store = abc_store().fail_on(FailOn::Delete(StoreError::AuthFailed(
            "Permission denied".into(),
        )));
        let mut h = harness(store, ScriptedPrompter::with_answers([true]));
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();
        h.store.clear_operations();

        let outcome = h.sync.on_delete_requested(rid("b")).await.unwrap();

        assert!(matches!(outcome, DeleteOutcome::Failed(StoreError::AuthFailed(_))));
        assert_eq!(h.map.marker_count(), 3);
        assert!(h.sync.registry().unwrap().contains(&rid("b")));
        assert_eq!(h.store.operations(), vec![MockOperation::Delete { id: rid("b") }]);
        assert_eq!(
            h.prompter.alerts(),
            vec![Alert::new(
                "Delete Failed",
                "authentication failed: Permission denied"
            )]
        );
    }

    #[tokio::test]
    async fn non_interactive_prompt_is_an_error() {
        let prompter = ScriptedPrompter::new();
        prompter.push_error(PromptError::NotInteractive);
        let mut h = harness(abc_store(), prompter);
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        let result = h.sync.on_delete_requested(rid("b")).await;
        assert!(matches!(
            result,
            Err(SyncError::Prompt(PromptError::NotInteractive))
        ));
        assert_eq!(h.store.mutation_count(), 0);
    }

    #[tokio::test]
    async fn edit_tap_navigates_with_record_id() {
        let mut h = harness(abc_store(), ScriptedPrompter::new());
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        let handle = h.sync.registry().unwrap().handle_of(&rid("a")).unwrap();
        assert!(h.map.tap(handle, MarkerAction::Edit));
        h.sync.process_pending_events().await.unwrap();

        assert_eq!(
            h.navigator.events(),
            vec![NavigationEvent::OpenEditor(Some(rid("a")))]
        );
        assert_eq!(h.store.mutation_count(), 0);
    }

    #[tokio::test]
    async fn delete_tap_runs_delete_flow() {
        let mut h = harness(abc_store(), ScriptedPrompter::with_answers([true]));
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        let handle = h.sync.registry().unwrap().handle_of(&rid("c")).unwrap();
        h.map.tap(handle, MarkerAction::Delete);
        h.sync.process_pending_events().await.unwrap();

        assert!(h.store.get_sync(&rid("c")).is_none());
        assert_eq!(h.sync.registry().unwrap().record_ids(), vec![rid("a"), rid("b")]);
    }

    #[tokio::test]
    async fn create_request_opens_empty_editor() {
        let h = harness(MockStore::new(), ScriptedPrompter::new());
        h.sync.on_create_requested();
        assert_eq!(h.navigator.events(), vec![NavigationEvent::OpenEditor(None)]);
    }

    #[tokio::test]
    async fn second_view_ready_keeps_first_view() {
        let mut h = harness(abc_store(), ScriptedPrompter::new());
        h.sync.on_view_ready(Box::new(h.map.clone())).await.unwrap();

        let other = HeadlessMap::new();
        h.sync.on_view_ready(Box::new(other.clone())).await.unwrap();

        assert_eq!(other.marker_count(), 0);
        assert_eq!(h.map.marker_count(), 3);
    }
}
