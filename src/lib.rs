//! pointmap - Named map points kept in sync with a remote store
//!
//! pointmap keeps a set of named geographic points in a key-value store and
//! shows them as markers on a map. Points can be created by dragging a
//! marker, renamed, moved, and deleted after confirmation.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, drives controllers)
//! - [`sync`] - Map-screen and editor-screen controllers
//! - [`map`] - Map view abstraction, headless view, marker registry
//! - [`store`] - Abstraction for the remote point store
//! - [`core`] - Domain types, coordinate codec, configuration
//! - [`ui`] - User interaction utilities
//!
//! # Invariants
//!
//! 1. Every marker the registry owns corresponds to exactly one stored record
//! 2. After a refresh, the markers mirror exactly one completed listing
//! 3. Coordinates are always written in canonical `"lat,lng"` form
//! 4. Nothing is removed from the map until the store confirms the delete

pub mod cli;
pub mod core;
pub mod map;
pub mod store;
pub mod sync;
pub mod ui;
