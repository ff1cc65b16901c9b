//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! An explicit path (`--config`) is used as-is and must exist. Otherwise the
//! first existing file of:
//! 1. `$POINTMAP_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pointmap/config.toml`
//! 3. `~/.pointmap/config.toml` (canonical write location)
//!
//! No file at all means defaults.
//!
//! # Example
//!
//! ```no_run
//! use pointmap::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Backend: {}", config.backend());
//! println!("Zoom: {}", config.zoom());
//! ```

pub mod schema;

pub use schema::{FileConfig, MapSection, StoreSection};

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::coords::Coordinate;
use crate::map::{IconConfig, MapViewConfig};
use crate::store::http::DEFAULT_COLLECTION;
use crate::store::StoreBackend;

pub const DEFAULT_CENTER_LAT: f64 = -7.7956;
pub const DEFAULT_CENTER_LNG: f64 = 110.3695;
pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_LANDMARK: &str = "yogyakarta";

/// Keys understood by `config get` and `config set`.
pub const KEYS: &[&str] = &[
    "store.backend",
    "store.url",
    "store.collection",
    "store.auth_token",
    "map.center_lat",
    "map.center_lng",
    "map.zoom",
    "map.landmark",
];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
///
/// Accessors apply defaults for anything the file leaves out.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values as read from disk
    pub file: FileConfig,
    /// Path the file was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated, or if `explicit` names a file that does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::search_paths().into_iter().find(|p| p.exists()),
        };

        let Some(path) = path else {
            debug!("no config file found; using defaults");
            return Ok(Self::default());
        };

        let file = Self::read(&path)?;
        file.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(Self {
            file,
            path: Some(path),
        })
    }

    /// Candidate locations in lookup order, from the environment.
    pub fn search_paths() -> Vec<PathBuf> {
        candidate_paths(
            std::env::var_os("POINTMAP_CONFIG"),
            std::env::var_os("XDG_CONFIG_HOME"),
            dirs::home_dir(),
        )
    }

    /// Read and parse a config file.
    pub fn read(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical write location.
    ///
    /// Returns `~/.pointmap/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".pointmap/config.toml"))
    }

    /// Where `config set` should write: the loaded file, else the default.
    pub fn write_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Self::default_path(),
        }
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Uses atomic write
    /// (write to temp file, then rename) to prevent corruption.
    pub fn write(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    fn store(&self) -> Option<&StoreSection> {
        self.file.store.as_ref()
    }

    fn map(&self) -> Option<&MapSection> {
        self.file.map.as_ref()
    }

    /// Store backend. Defaults to http.
    pub fn backend(&self) -> StoreBackend {
        self.store()
            .and_then(|s| s.backend.as_deref())
            .and_then(StoreBackend::parse)
            .unwrap_or(StoreBackend::Http)
    }

    pub fn store_url(&self) -> Option<&str> {
        self.store().and_then(|s| s.url.as_deref())
    }

    /// Collection path. Defaults to "points".
    pub fn collection(&self) -> &str {
        self.store()
            .and_then(|s| s.collection.as_deref())
            .unwrap_or(DEFAULT_COLLECTION)
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.store().and_then(|s| s.auth_token.as_deref())
    }

    /// Initial map center.
    pub fn center(&self) -> Result<Coordinate, ConfigError> {
        let lat = self
            .map()
            .and_then(|m| m.center_lat)
            .unwrap_or(DEFAULT_CENTER_LAT);
        let lng = self
            .map()
            .and_then(|m| m.center_lng)
            .unwrap_or(DEFAULT_CENTER_LNG);
        Coordinate::new(lat, lng)
            .map_err(|e| ConfigError::InvalidValue(format!("invalid map center: {}", e)))
    }

    pub fn zoom(&self) -> u8 {
        self.map().and_then(|m| m.zoom).unwrap_or(DEFAULT_ZOOM)
    }

    /// Landmark label, or `None` when configured as empty.
    pub fn landmark(&self) -> Option<&str> {
        let label = self
            .map()
            .and_then(|m| m.landmark.as_deref())
            .unwrap_or(DEFAULT_LANDMARK);
        (!label.is_empty()).then_some(label)
    }

    pub fn icon(&self) -> IconConfig {
        self.map()
            .and_then(|m| m.icon.clone())
            .unwrap_or_default()
    }

    /// Settings handed to the map factory.
    pub fn map_view_config(&self) -> Result<MapViewConfig, ConfigError> {
        Ok(MapViewConfig {
            center: self.center()?,
            zoom: self.zoom(),
            icon: self.icon(),
        })
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Effective value of a dotted key, defaults applied.
    ///
    /// Returns `Ok(None)` for keys with no value and no default.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let value = match key {
            "store.backend" => Some(self.backend().to_string()),
            "store.url" => self.store_url().map(str::to_string),
            "store.collection" => Some(self.collection().to_string()),
            "store.auth_token" => self.auth_token().map(str::to_string),
            "map.center_lat" => Some(self.center()?.lat().to_string()),
            "map.center_lng" => Some(self.center()?.lng().to_string()),
            "map.zoom" => Some(self.zoom().to_string()),
            "map.landmark" => Some(self.landmark().unwrap_or_default().to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }
}

/// Set a dotted key in `file`, then validate the result.
///
/// On error `file` is left unchanged.
pub fn set_value(file: &mut FileConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let mut updated = file.clone();
    {
        let store = StoreSection::default;
        match key {
            "store.backend" => {
                updated.store.get_or_insert_with(store).backend = Some(value.to_lowercase())
            }
            "store.url" => updated.store.get_or_insert_with(store).url = Some(value.to_string()),
            "store.collection" => {
                updated.store.get_or_insert_with(store).collection = Some(value.to_string())
            }
            "store.auth_token" => {
                updated.store.get_or_insert_with(store).auth_token = Some(value.to_string())
            }
            "map.center_lat" => {
                updated.map.get_or_insert_with(MapSection::default).center_lat =
                    Some(parse_number(key, value)?)
            }
            "map.center_lng" => {
                updated.map.get_or_insert_with(MapSection::default).center_lng =
                    Some(parse_number(key, value)?)
            }
            "map.zoom" => {
                let zoom = value.trim().parse::<u8>().map_err(|_| {
                    ConfigError::InvalidValue(format!("{} must be a whole number, got '{}'", key, value))
                })?;
                updated.map.get_or_insert_with(MapSection::default).zoom = Some(zoom)
            }
            "map.landmark" => {
                updated.map.get_or_insert_with(MapSection::default).landmark =
                    Some(value.to_string())
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    updated.validate()?;
    *file = updated;
    Ok(())
}

fn parse_number(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConfigError::InvalidValue(format!("{} must be a number, got '{}'", key, value)))
}

/// Lookup order for config files, given the relevant environment.
fn candidate_paths(
    explicit_env: Option<OsString>,
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit_env.filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(path));
    }
    if let Some(xdg) = xdg_config_home.filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(xdg).join("pointmap/config.toml"));
    }
    if let Some(home) = home {
        paths.push(home.join(".pointmap/config.toml"));
    }
    paths
}
