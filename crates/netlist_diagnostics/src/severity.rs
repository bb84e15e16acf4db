//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic message.
///
/// Fatal conditions (structural violations, multi-driver nets, unknown cell
/// types) are never represented here — they short-circuit the conversion as
/// a `Result::Err` instead. `Severity` only classifies the non-fatal
/// conditions the converter can recover from and keep going: undriven nets
/// (`Warning`) and the CLI's optional `--show-creator` banner (`Note`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// An informational note that doesn't indicate a problem.
    Note,
    /// A non-fatal issue — the affected net was dropped but conversion
    /// otherwise completed.
    Warning,
}

impl Severity {
    /// Returns `true` if this severity is [`Warning`](Severity::Warning).
    pub fn is_warning(self) -> bool {
        self == Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Severity::Note < Severity::Warning);
    }

    #[test]
    fn is_warning() {
        assert!(Severity::Warning.is_warning());
        assert!(!Severity::Note.is_warning());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Note), "note");
    }
}
