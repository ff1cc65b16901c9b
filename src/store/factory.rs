//! store::factory
//!
//! Store backend selection and creation.
//!
//! # Design
//!
//! Commands use `create_store()` instead of naming a concrete backend, so the
//! map controller and editor only ever see `dyn PointStore`.
//!
//! # Example
//!
//! ```ignore
//! use pointmap::store::{create_store, StoreBackend};
//!
//! let store = create_store(
//!     StoreBackend::Http,
//!     Some("https://demo.firebaseio.com"),
//!     "points",
//!     None,
//! )?;
//! let listing = store.list().await?;
//! ```

use std::sync::Arc;

use super::http::HttpStore;
use super::mock::MockStore;
use super::traits::{PointStore, StoreError};

/// Supported store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Remote REST database
    Http,
    /// Process-local memory (nothing survives the process)
    Memory,
}

impl StoreBackend {
    /// Get all available backends.
    pub fn all() -> &'static [StoreBackend] {
        &[StoreBackend::Http, StoreBackend::Memory]
    }

    /// Get the backend name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Http => "http",
            StoreBackend::Memory => "memory",
        }
    }

    /// Parse a backend from a string (case-insensitive).
    ///
    /// ```
    /// use pointmap::store::StoreBackend;
    ///
    /// assert_eq!(StoreBackend::parse("HTTP"), Some(StoreBackend::Http));
    /// assert_eq!(StoreBackend::parse("sqlite"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "http" => Some(StoreBackend::Http),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create a store for the given backend.
///
/// # Errors
///
/// Returns `StoreError::InvalidResponse` if the http backend has no usable URL.
pub fn create_store(
    backend: StoreBackend,
    url: Option<&str>,
    collection: &str,
    auth_token: Option<&str>,
) -> Result<Arc<dyn PointStore>, StoreError> {
    match backend {
        StoreBackend::Http => {
            let url = url.ok_or_else(|| {
                StoreError::InvalidResponse(
                    "the http store needs a url; set store.url in the config file".into(),
                )
            })?;
            let store = HttpStore::new(url, collection, auth_token.map(str::to_string))?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MockStore::new())),
    }
}

/// Get the list of valid backend names for configuration validation.
pub fn valid_backend_names() -> Vec<&'static str> {
    StoreBackend::all().iter().map(|b| b.name()).collect()
}
