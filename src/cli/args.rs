//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of the default lookup
//! - `--debug`: Enable debug logging
//! - `--no-interactive`: Never prompt
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// pmap - Keep named map points in a remote store
#[derive(Parser, Debug)]
#[command(name = "pmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// True unless `--no-interactive` or `--quiet` was given, or stdin is
    /// not a terminal.
    pub fn interactive(&self) -> bool {
        if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every stored point
    #[command(
        name = "list",
        long_about = "List every stored point.\n\n\
            Prints one line per point: id, coordinates and name, separated by tabs. \
            Records whose stored fields cannot be read are skipped with a warning.",
        after_help = "\
EXAMPLES:
    pmap list
    pmap list | cut -f3        # names only"
    )]
    List,

    /// Show one point
    #[command(name = "show")]
    Show {
        /// Record id
        id: String,
    },

    /// Create a point
    #[command(
        name = "add",
        long_about = "Create a point.\n\n\
            Without --lat/--lng the point is placed at the configured map center.",
        after_help = "\
EXAMPLES:
    pmap add --name Tugu --lat -7.7829 --lng 110.3671
    pmap add --name Center"
    )]
    Add {
        /// Point name
        #[arg(long)]
        name: String,

        /// Latitude in degrees
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// Rename or move a point
    #[command(name = "edit")]
    Edit {
        /// Record id
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New latitude in degrees
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// New longitude in degrees
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// Delete a point
    #[command(
        name = "delete",
        long_about = "Delete a point.\n\n\
            Asks for confirmation unless --yes is given. In non-interactive mode \
            --yes is required."
    )]
    Delete {
        /// Record id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Get, set, or list configuration values
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    pmap completion bash > ~/.local/share/bash-completion/completions/pmap

    # Zsh
    pmap completion zsh > ~/.zfunc/_pmap

    # Fish
    pmap completion fish > ~/.config/fish/completions/pmap.fish

    # PowerShell
    pmap completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key, e.g. store.url
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
    /// List all configuration values
    List,
}

/// Shells supported by `completion`.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
