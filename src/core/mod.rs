//! core
//!
//! Core domain types, schemas, and the coordinate codec.
//!
//! # Modules
//!
//! - [`coords`] - Coordinate validation and the `"lat,lng"` text codec
//! - [`types`] - Strong types: RecordId, PointFields, PointRecord
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Stored text is validated once, at the boundary

pub mod config;
pub mod coords;
pub mod types;
