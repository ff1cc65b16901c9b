//! edit command - Rename or move a point

use std::rc::Rc;

use anyhow::{bail, Context as _, Result};

use super::{drag_marker, parse_id, runtime};
use crate::cli::Context;
use crate::core::coords::Coordinate;
use crate::map::create_map_view;
use crate::sync::{PointEditor, RecordingNavigator, SaveOutcome};
use crate::ui::output;

/// Load the point, apply the changes and save it back.
pub fn edit(
    ctx: &Context,
    id: &str,
    name: Option<&str>,
    position: Option<Coordinate>,
) -> Result<()> {
    let id = parse_id(id)?;
    if name.is_none() && position.is_none() {
        bail!("Nothing to change; pass --name and/or --lat/--lng");
    }

    let config = ctx.load_config()?;
    let store = ctx.open_store(&config)?;
    let view_config = config.map_view_config()?;
    let map = create_map_view(&view_config);

    let mut editor = PointEditor::open(
        Some(id.clone()),
        store,
        ctx.prompter(false),
        Rc::new(RecordingNavigator::new()),
        view_config,
    );

    let outcome = runtime()?.block_on(async {
        editor
            .on_view_ready(Box::new(map.clone()))
            .await
            .with_context(|| format!("Failed to load point '{}'", id))?;
        if let Some(name) = name {
            editor.set_name(name);
        }
        if let Some(to) = position {
            drag_marker(&map, &mut editor, to)?;
        }
        Ok::<_, anyhow::Error>(editor.save().await)
    })?;

    match outcome {
        SaveOutcome::Saved(id) => {
            output::print(format!("Updated point {}", id), ctx.verbosity());
            Ok(())
        }
        SaveOutcome::Skipped => bail!("Point name must not be empty"),
        SaveOutcome::Failed(e) => Err(e).context("Failed to update point"),
    }
}
