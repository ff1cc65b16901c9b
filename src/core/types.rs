//! core::types
//!
//! Strong types for point records.
//!
//! # Types
//!
//! - [`RecordId`] - Opaque, store-assigned record identifier
//! - [`PointFields`] - The persisted `{name, coordinates}` pair
//! - [`PointRecord`] - A record whose coordinates have been decoded
//!
//! # Validation
//!
//! Records cross the store boundary as [`PointFields`] and become
//! [`PointRecord`]s only after their coordinate string decodes. Nothing is
//! ever displayed at a default location because its data was malformed.
//!
//! ```
//! use pointmap::core::types::{PointFields, PointRecord, RecordId};
//!
//! let id = RecordId::new("-NxQ1").unwrap();
//! let fields = PointFields::new("Tugu", "-7.782900000,110.367100000");
//! let record = PointRecord::from_fields(id, fields).unwrap();
//! assert_eq!(record.coordinate.lat(), -7.7829);
//!
//! assert!(RecordId::new("a/b").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coords::{self, Coordinate, DecodeError};

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}

/// An opaque record identifier assigned by the point store.
///
/// Identifiers must be usable as a single path segment of the backing key
/// space:
/// - Cannot be empty
/// - Cannot contain `.`, `#`, `$`, `[`, `]`, or `/`
/// - Cannot contain ASCII control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a new validated record id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRecordId` if the id is not a valid key segment.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        if id.is_empty() {
            return Err(TypeError::InvalidRecordId(
                "record id cannot be empty".into(),
            ));
        }

        const INVALID_CHARS: [char; 6] = ['.', '#', '$', '[', ']', '/'];
        for c in INVALID_CHARS {
            if id.contains(c) {
                return Err(TypeError::InvalidRecordId(format!(
                    "record id cannot contain '{c}'"
                )));
            }
        }

        if id.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidRecordId(
                "record id cannot contain control characters".into(),
            ));
        }

        Ok(())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The persisted body of a point record.
///
/// `coordinates` is kept as text here: this is the shape the store returns,
/// before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointFields {
    pub name: String,
    pub coordinates: String,
}

impl PointFields {
    pub fn new(name: impl Into<String>, coordinates: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: coordinates.into(),
        }
    }

    /// Decode the coordinate text.
    pub fn decode(&self) -> Result<Coordinate, DecodeError> {
        coords::decode(&self.coordinates)
    }
}

/// A point record that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub id: RecordId,
    pub name: String,
    pub coordinate: Coordinate,
}

impl PointRecord {
    /// Validate raw store fields into a record.
    ///
    /// # Errors
    ///
    /// Returns the `DecodeError` of the coordinate string.
    pub fn from_fields(id: RecordId, fields: PointFields) -> Result<Self, DecodeError> {
        let coordinate = fields.decode()?;
        Ok(Self {
            id,
            name: fields.name,
            coordinate,
        })
    }

    /// Convert back into the persisted shape, in canonical form.
    pub fn to_fields(&self) -> PointFields {
        PointFields::new(self.name.clone(), self.coordinate.encode())
    }
}
