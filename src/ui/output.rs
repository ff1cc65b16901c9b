//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Diagnostics go through `tracing`; this module is for what the user asked
//! to see.

use std::fmt::Display;

use crate::core::types::PointRecord;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a point as one tab-separated line: id, canonical coordinates, name.
pub fn format_point(record: &PointRecord) -> String {
    format!(
        "{}\t{}\t{}",
        record.id,
        record.coordinate.encode(),
        record.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PointFields, RecordId};

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn point_line() {
        let record = PointRecord::from_fields(
            RecordId::new("p1").unwrap(),
            PointFields::new("Tugu", "-7.7829,110.3671"),
        )
        .unwrap();
        assert_eq!(
            format_point(&record),
            "p1\t-7.782900000,110.367100000\tTugu"
        );
    }
}
