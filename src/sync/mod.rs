//! sync
//!
//! Controllers that keep the map and the store in step.
//!
//! # Modules
//!
//! - [`list`] - The map screen: every stored point as a marker
//! - [`editor`] - The editor screen: one draggable marker and a name
//! - [`navigation`] - The boundary between the two screens
//!
//! Controllers are single-threaded. They own their map view and share the
//! store, prompter and navigator with the host.

pub mod editor;
pub mod list;
pub mod navigation;

use thiserror::Error;

use crate::core::coords::DecodeError;
use crate::core::types::RecordId;
use crate::store::StoreError;
use crate::ui::prompts::PromptError;

pub use editor::{EditorMode, PointEditor, SaveOutcome, DRAG_HINT};
pub use list::{DeleteOutcome, PointListSync, RefreshReport, SyncState};
pub use navigation::{NavigationEvent, Navigator, RecordingNavigator};

/// Errors from the sync controllers.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("map view is not ready")]
    ViewNotReady,

    #[error("point {id} has invalid coordinates")]
    InvalidRecord {
        id: RecordId,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}
