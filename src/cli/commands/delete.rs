//! delete command - Delete a point after confirmation

use anyhow::{bail, Context as _, Result};

use super::{map_screen, parse_id, runtime};
use crate::cli::Context;
use crate::sync::{DeleteOutcome, SyncError};
use crate::ui::output;
use crate::ui::prompts::PromptError;

/// Delete the point with `id`. Only points shown on the map can be deleted.
pub fn delete(ctx: &Context, id: &str, yes: bool) -> Result<()> {
    let id = parse_id(id)?;
    let (mut sync, map) = map_screen(ctx, yes)?;

    let outcome = runtime()?.block_on(async {
        sync.on_view_ready(Box::new(map))
            .await
            .context("Failed to load points")?;
        if !sync.registry().is_some_and(|r| r.contains(&id)) {
            bail!("No point with id '{}'", id);
        }
        match sync.on_delete_requested(id.clone()).await {
            Err(SyncError::Prompt(PromptError::NotInteractive)) => {
                bail!("Refusing to delete without confirmation; pass --yes")
            }
            other => Ok::<_, anyhow::Error>(other?),
        }
    })?;

    match outcome {
        DeleteOutcome::Deleted(_) => {
            output::print(format!("Deleted point {}", id), ctx.verbosity());
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            output::print("Delete cancelled.", ctx.verbosity());
            Ok(())
        }
        DeleteOutcome::Failed(e) => Err(e).context("Failed to delete point"),
    }
}
