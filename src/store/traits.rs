//! store::traits
//!
//! PointStore trait definition for the remote key-value point store.
//!
//! # Design
//!
//! The `PointStore` trait is async because every operation involves network
//! I/O. All methods return `Result` so that callers can turn failures into
//! user-facing messages instead of letting them propagate unhandled.
//!
//! Store failures never compromise local state: the map controller and the
//! editor only mutate their own state after a call has succeeded.
//!
//! # Example
//!
//! ```ignore
//! use pointmap::store::{PointStore, StoreError};
//! use pointmap::core::types::PointFields;
//!
//! async fn add(store: &dyn PointStore) -> Result<(), StoreError> {
//!     let id = store
//!         .create(PointFields::new("Tugu", "-7.782900000,110.367100000"))
//!         .await?;
//!     println!("Created point {}", id);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{PointFields, RecordId};

/// Errors from point store operations.
///
/// The `Display` form of every variant is the human-readable message shown
/// to the user verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, rules denied access).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The store returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The store answered with a body that could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The operation is not supported by this backend.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// A full listing of the store, keyed by record id.
///
/// Ordered so that reconciliation and CLI output are deterministic.
pub type PointListing = BTreeMap<RecordId, PointFields>;

/// The PointStore trait for CRUD access to named point records.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single store can be shared by
/// the map controller and editor sessions through an `Arc`.
///
/// # Error Handling
///
/// All methods return `Result<T, StoreError>`. Callers should handle:
/// - `NotFound`: the record vanished (treated like any other store failure)
/// - `AuthRequired` / `AuthFailed`: configure a token
/// - `NetworkError` / `ApiError`: display the message and let the user retry
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Get the backend name (e.g., "http", "memory").
    fn name(&self) -> &'static str;

    /// List every record in the store.
    ///
    /// Record bodies are returned unvalidated; decoding their coordinates is
    /// the caller's job.
    async fn list(&self) -> Result<PointListing, StoreError>;

    /// Get a single record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record has this id
    async fn get(&self, id: &RecordId) -> Result<PointFields, StoreError>;

    /// Create a record and return its store-assigned id.
    async fn create(&self, fields: PointFields) -> Result<RecordId, StoreError>;

    /// Overwrite the fields of an existing record (last write wins).
    async fn update(&self, id: &RecordId, fields: PointFields) -> Result<(), StoreError>;

    /// Delete a record.
    async fn delete(&self, id: &RecordId) -> Result<(), StoreError>;
}
