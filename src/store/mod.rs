//! store
//!
//! Abstraction for the remote key-value point store.
//!
//! # Architecture
//!
//! The `PointStore` trait defines CRUD access to named point records keyed
//! by opaque identifiers. Commands use the [`create_store`] factory rather
//! than naming a concrete backend.
//!
//! # Modules
//!
//! - `traits`: Core `PointStore` trait and `StoreError`
//! - [`http`]: REST backend (Firebase Realtime Database layout)
//! - [`mock`]: In-memory backend for deterministic testing
//! - `factory`: Backend selection and creation

mod factory;
pub mod http;
pub mod mock;
mod traits;

pub use factory::{create_store, valid_backend_names, StoreBackend};
pub use traits::*;
