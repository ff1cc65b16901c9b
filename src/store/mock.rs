//! store::mock
//!
//! In-memory point store for deterministic testing and offline use.
//!
//! # Design
//!
//! The mock store provides a deterministic implementation of the `PointStore`
//! trait. It keeps records in memory, records every call for later
//! verification, and can be configured to fail a specific operation.
//!
//! # Example
//!
//! ```
//! use pointmap::store::mock::MockStore;
//! use pointmap::store::PointStore;
//! use pointmap::core::types::PointFields;
//!
//! # tokio_test::block_on(async {
//! let store = MockStore::new();
//!
//! let id = store
//!     .create(PointFields::new("Tugu", "-7.782900000,110.367100000"))
//!     .await
//!     .unwrap();
//!
//! let fields = store.get(&id).await.unwrap();
//! assert_eq!(fields.name, "Tugu");
//! assert_eq!(store.point_count(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::traits::{PointListing, PointStore, StoreError};
use crate::core::types::{PointFields, RecordId};

/// Mock store for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping. Clones share state,
/// so a test can keep a handle while the code under test owns another.
#[derive(Debug, Clone)]
pub struct MockStore {
    inner: Arc<Mutex<MockStoreInner>>,
}

#[derive(Debug)]
struct MockStoreInner {
    points: BTreeMap<RecordId, PointFields>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    List(StoreError),
    Get(StoreError),
    Create(StoreError),
    Update(StoreError),
    Delete(StoreError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    List,
    Get { id: RecordId },
    Create { fields: PointFields },
    Update { id: RecordId, fields: PointFields },
    Delete { id: RecordId },
}

impl MockStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self::with_points(Vec::new())
    }

    /// Create a mock store with pre-existing records.
    ///
    /// # Example
    ///
    /// ```
    /// use pointmap::store::mock::MockStore;
    /// use pointmap::core::types::{PointFields, RecordId};
    ///
    /// let store = MockStore::with_points(vec![(
    ///     RecordId::new("a").unwrap(),
    ///     PointFields::new("A", "1.000000000,2.000000000"),
    /// )]);
    /// assert_eq!(store.point_count(), 1);
    /// ```
    pub fn with_points(points: Vec<(RecordId, PointFields)>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockStoreInner {
                points: points.into_iter().collect(),
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use pointmap::store::mock::{FailOn, MockStore};
    /// use pointmap::store::StoreError;
    ///
    /// let store = MockStore::new().fail_on(FailOn::Create(StoreError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.set_fail_on(fail_on);
        self
    }

    /// Configure a failure on a shared handle.
    pub fn set_fail_on(&self, fail_on: FailOn) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = Some(fail_on);
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Count recorded mutations (create, update, delete).
    pub fn mutation_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    MockOperation::Create { .. }
                        | MockOperation::Update { .. }
                        | MockOperation::Delete { .. }
                )
            })
            .count()
    }

    /// Insert or replace a record without recording an operation.
    ///
    /// Simulates a change made by another client.
    pub fn put_remote(&self, id: RecordId, fields: PointFields) {
        let mut inner = self.inner.lock().unwrap();
        inner.points.insert(id, fields);
    }

    /// Remove a record without recording an operation.
    pub fn remove_remote(&self, id: &RecordId) {
        let mut inner = self.inner.lock().unwrap();
        inner.points.remove(id);
    }

    /// Get a record (for test verification).
    pub fn get_sync(&self, id: &RecordId) -> Option<PointFields> {
        let inner = self.inner.lock().unwrap();
        inner.points.get(id).cloned()
    }

    /// Get the count of records.
    pub fn point_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.points.len()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Option<StoreError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::List(e)) if expected == "list" => Some(e.clone()),
            Some(FailOn::Get(e)) if expected == "get" => Some(e.clone()),
            Some(FailOn::Create(e)) if expected == "create" => Some(e.clone()),
            Some(FailOn::Update(e)) if expected == "update" => Some(e.clone()),
            Some(FailOn::Delete(e)) if expected == "delete" => Some(e.clone()),
            _ => None,
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PointStore for MockStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<PointListing, StoreError> {
        self.record(MockOperation::List);

        if let Some(err) = self.check_fail("list") {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner.points.clone())
    }

    async fn get(&self, id: &RecordId) -> Result<PointFields, StoreError> {
        self.record(MockOperation::Get { id: id.clone() });

        if let Some(err) = self.check_fail("get") {
            return Err(err);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .points
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("point {}", id)))
    }

    async fn create(&self, fields: PointFields) -> Result<RecordId, StoreError> {
        self.record(MockOperation::Create {
            fields: fields.clone(),
        });

        if let Some(err) = self.check_fail("create") {
            return Err(err);
        }

        let id = RecordId::new(Uuid::new_v4().simple().to_string())
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        let mut inner = self.inner.lock().unwrap();
        inner.points.insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(&self, id: &RecordId, fields: PointFields) -> Result<(), StoreError> {
        self.record(MockOperation::Update {
            id: id.clone(),
            fields: fields.clone(),
        });

        if let Some(err) = self.check_fail("update") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .points
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("point {}", id)))?;
        *slot = fields;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        self.record(MockOperation::Delete { id: id.clone() });

        if let Some(err) = self.check_fail("delete") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.points.remove(id);
        Ok(())
    }
}
