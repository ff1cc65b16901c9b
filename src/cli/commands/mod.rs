//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Attaches a headless map to a controller and drives it
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Store calls are async. Handlers build a tokio current-thread runtime and
//! `block_on` the controller flow; the controllers are not `Send`, which a
//! current-thread runtime does not require.

mod add;
mod completion;
mod config_cmd;
mod delete;
mod edit;
mod list;
mod show;

pub use add::add;
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use delete::delete;
pub use edit::edit;
pub use list::list;
pub use show::show;

use std::rc::Rc;

use anyhow::{bail, Context as _, Result};

use super::args::{Command, ConfigAction};
use super::Context;
use crate::core::coords::Coordinate;
use crate::core::types::RecordId;
use crate::map::{create_map_view, HeadlessMap};
use crate::sync::{PointEditor, PointListSync, RecordingNavigator};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::List => list::list(ctx),
        Command::Show { id } => show::show(ctx, &id),
        Command::Add { name, lat, lng } => add::add(ctx, &name, position(lat, lng)?),
        Command::Edit { id, name, lat, lng } => {
            edit::edit(ctx, &id, name.as_deref(), position(lat, lng)?)
        }
        Command::Delete { id, yes } => delete::delete(ctx, &id, yes),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn parse_id(id: &str) -> Result<RecordId> {
    RecordId::new(id).with_context(|| format!("Invalid point id '{}'", id))
}

fn position(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coordinate>> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Some(
            Coordinate::new(lat, lng).context("Invalid coordinates")?,
        )),
        (None, None) => Ok(None),
        _ => bail!("--lat and --lng must be given together"),
    }
}

/// Build the map screen: a list controller over the configured store, with
/// the configured landmark, and the headless map it will attach.
fn map_screen(ctx: &Context, assume_yes: bool) -> Result<(PointListSync, HeadlessMap)> {
    let config = ctx.load_config()?;
    let store = ctx.open_store(&config)?;
    let view_config = config.map_view_config()?;
    let map = create_map_view(&view_config);

    let mut sync = PointListSync::new(
        store,
        ctx.prompter(assume_yes),
        Rc::new(RecordingNavigator::new()),
        view_config,
    );
    if let Some(label) = config.landmark() {
        sync = sync.with_landmark(label);
    }
    Ok((sync, map))
}

/// Drag the editor's marker to `to`, the way a user would.
fn drag_marker(map: &HeadlessMap, editor: &mut PointEditor, to: Coordinate) -> Result<()> {
    let handle = editor.marker().context("Editor has no marker")?;
    if !map.drag(handle, to) {
        bail!("Editor marker cannot be dragged");
    }
    editor.process_pending_events();
    Ok(())
}
