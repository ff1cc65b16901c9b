//! core::config::schema
//!
//! Configuration schema types.
//!
//! Every field is optional; defaults are applied by the accessors on
//! [`super::Config`], so a written file only ever contains what the user set.
//!
//! # Validation
//!
//! Values are validated after parsing: the backend must be a known store
//! backend, the URL must be http(s), and the map center must be a valid
//! coordinate.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::coords::Coordinate;
use crate::core::types::RecordId;
use crate::map::IconConfig;
use crate::store::valid_backend_names;

/// The whole config file.
///
/// # Example
///
/// ```toml
/// [store]
/// backend = "http"
/// url = "https://example.firebaseio.com"
/// collection = "points"
///
/// [map]
/// center_lat = -7.7956
/// center_lng = 110.3695
/// zoom = 13
/// landmark = "yogyakarta"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub store: Option<StoreSection>,
    pub map: Option<MapSection>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(store) = &self.store {
            store.validate()?;
        }
        if let Some(map) = &self.map {
            map.validate()?;
        }
        Ok(())
    }
}

/// `[store]`: where points live.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// "http" or "memory"
    pub backend: Option<String>,

    /// Database root URL for the http backend
    pub url: Option<String>,

    /// Collection path below the root (default: "points")
    pub collection: Option<String>,

    /// Sent as the `auth` query parameter
    pub auth_token: Option<String>,
}

impl StoreSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(backend) = &self.backend {
            let valid = valid_backend_names();
            if !valid.iter().any(|name| name.eq_ignore_ascii_case(backend)) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid store backend '{}', must be one of: {}",
                    backend,
                    valid.join(", ")
                )));
            }
        }

        if let Some(url) = &self.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "store url '{}' must start with http:// or https://",
                    url
                )));
            }
        }

        if let Some(collection) = &self.collection {
            let mut segments = collection.split('/').filter(|s| !s.is_empty()).peekable();
            if segments.peek().is_none() {
                return Err(ConfigError::InvalidValue(
                    "store collection cannot be empty".to_string(),
                ));
            }
            for segment in segments {
                RecordId::new(segment).map_err(|e| {
                    ConfigError::InvalidValue(format!("invalid store collection: {}", e))
                })?;
            }
        }

        Ok(())
    }
}

/// `[map]`: initial view and marker look.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MapSection {
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub zoom: Option<u8>,

    /// Label of the fixed marker at the center; empty disables it
    pub landmark: Option<String>,

    pub icon: Option<IconConfig>,
}

impl MapSection {
    /// Largest zoom level tile servers commonly provide.
    pub const MAX_ZOOM: u8 = 22;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lat = self.center_lat.unwrap_or(super::DEFAULT_CENTER_LAT);
        let lng = self.center_lng.unwrap_or(super::DEFAULT_CENTER_LNG);
        Coordinate::new(lat, lng)
            .map_err(|e| ConfigError::InvalidValue(format!("invalid map center: {}", e)))?;

        if let Some(zoom) = self.zoom {
            if zoom > Self::MAX_ZOOM {
                return Err(ConfigError::InvalidValue(format!(
                    "map zoom {} is above the maximum of {}",
                    zoom,
                    Self::MAX_ZOOM
                )));
            }
        }

        Ok(())
    }
}
