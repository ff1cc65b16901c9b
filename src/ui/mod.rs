//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Confirmations and dismissable alerts
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All output and prompts go through this module so that quiet and
//! non-interactive modes are handled in one place.

pub mod output;
pub mod prompts;
