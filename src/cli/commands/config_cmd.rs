//! config command - Get, set, or list configuration values

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{set_value, Config, FileConfig, KEYS};

/// Print the effective value of a key. Keys without a value print nothing.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = ctx.load_config()?;
    if let Some(value) = config.get(key)? {
        println!("{}", value);
    }
    Ok(())
}

/// Set a key and write the config file.
///
/// Writes to `--config` if given (creating it if needed), else to the
/// loaded file, else to `~/.pointmap/config.toml`.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let (mut file, path) = match &ctx.config_path {
        Some(path) if !path.exists() => (FileConfig::default(), path.clone()),
        _ => {
            let config = ctx.load_config()?;
            let path = config.write_path()?;
            (config.file, path)
        }
    };

    set_value(&mut file, key, value)?;
    Config::write(&path, &file).context("Failed to write config")?;

    if !ctx.quiet {
        println!("Set {} = {}", key, value);
    }
    Ok(())
}

/// List every key with its effective value.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    match config.loaded_from() {
        Some(path) => println!("# Configuration ({})", path.display()),
        None => println!("# Configuration (defaults)"),
    }

    for key in KEYS {
        let shown = match config.get(key)? {
            Some(_) if *key == "store.auth_token" => "(set)".to_string(),
            Some(value) if value.is_empty() => "(empty)".to_string(),
            Some(value) => value,
            None => "(not set)".to_string(),
        };
        println!("{} = {}", key, shown);
    }

    Ok(())
}
