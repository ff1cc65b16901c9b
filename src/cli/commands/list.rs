//! list command - Print every stored point

use anyhow::{Context as _, Result};

use super::{map_screen, runtime};
use crate::cli::Context;
use crate::ui::output::{self, format_point};

/// List every point the map would show.
pub fn list(ctx: &Context) -> Result<()> {
    let (mut sync, map) = map_screen(ctx, false)?;

    let report = runtime()?
        .block_on(sync.on_view_ready(Box::new(map)))
        .context("Failed to list points")?;

    for record in &report.shown {
        println!("{}", format_point(record));
    }
    for id in &report.skipped {
        output::warn(
            format!("skipped point '{}': stored record is malformed", id),
            ctx.verbosity(),
        );
    }
    if report.shown.is_empty() && report.skipped.is_empty() {
        output::print("No points.", ctx.verbosity());
    }

    Ok(())
}
