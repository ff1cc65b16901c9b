//! cli
//!
//! Command-line interface layer for pointmap.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Build the store, map and prompter, then delegate to command handlers
//!
//! # Architecture
//!
//! The CLI is a sequential host for the controllers in [`crate::sync`]: each
//! command attaches a headless map, drives it with simulated gestures and
//! prints what the controllers report.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::store::{create_store, PointStore};
use crate::ui::output::Verbosity;
use crate::ui::prompts::TerminalPrompter;

/// Execution context shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file.
    pub config_path: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Interactive mode enabled.
    pub interactive: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load(self.config_path.as_deref()).context("Failed to load config")
    }

    /// Open the configured store.
    pub fn open_store(&self, config: &Config) -> Result<Arc<dyn PointStore>> {
        create_store(
            config.backend(),
            config.store_url(),
            config.collection(),
            config.auth_token(),
        )
        .with_context(|| format!("Failed to open {} store", config.backend()))
    }

    /// Prompter for the controllers.
    ///
    /// Alerts are not printed: commands return the same failure as an error,
    /// which `main` prints once.
    pub fn prompter(&self, assume_yes: bool) -> Rc<TerminalPrompter> {
        Rc::new(TerminalPrompter::new(self.interactive, assume_yes).without_alerts())
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let ctx = Context {
        config_path: cli.config.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(),
    };

    commands::dispatch(cli.command, &ctx)
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings only, or debug for
/// this crate under `--debug`.
fn init_tracing(debug: bool) {
    let fallback = if debug { "warn,pointmap=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
