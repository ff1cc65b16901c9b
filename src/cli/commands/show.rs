//! show command - Print one point

use std::rc::Rc;

use anyhow::{Context as _, Result};

use super::{parse_id, runtime};
use crate::cli::Context;
use crate::map::create_map_view;
use crate::sync::{PointEditor, RecordingNavigator};

/// Open the point in an editor session and print what it loaded.
pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let id = parse_id(id)?;
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
    runtime()?
        .block_on(editor.on_view_ready(Box::new(map)))
        .with_context(|| format!("Failed to load point '{}'", id))?;

    println!("id:          {}", id);
    println!("name:        {}", editor.name());
    println!("coordinates: {}", editor.coordinates());

    editor.close();
    Ok(())
}
