//! add command - Create a point

use std::rc::Rc;

use anyhow::{bail, Context as _, Result};

use super::{drag_marker, runtime};
use crate::cli::Context;
use crate::core::coords::Coordinate;
use crate::map::create_map_view;
use crate::sync::{PointEditor, RecordingNavigator, SaveOutcome};

/// Create a point named `name`, at `position` or the map center.
///
/// Prints the new record id on success.
pub fn add(ctx: &Context, name: &str, position: Option<Coordinate>) -> Result<()> {
    let config = ctx.load_config()?;
    let store = ctx.open_store(&config)?;
    let view_config = config.map_view_config()?;
    let map = create_map_view(&view_config);

    let mut editor = PointEditor::open(
        None,
        store,
        ctx.prompter(false),
        Rc::new(RecordingNavigator::new()),
        view_config,
    );

    let outcome = runtime()?.block_on(async {
        editor.on_view_ready(Box::new(map.clone())).await?;
        if let Some(to) = position {
            drag_marker(&map, &mut editor, to)?;
        }
        editor.set_name(name);
        Ok::<_, anyhow::Error>(editor.save().await)
    })?;

    match outcome {
        SaveOutcome::Saved(id) => {
            println!("{}", id);
            Ok(())
        }
        SaveOutcome::Skipped => bail!("Point name must not be empty"),
        SaveOutcome::Failed(e) => Err(e).context("Failed to save point"),
    }
}
