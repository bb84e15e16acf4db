//! Fatal conversion failures.

use thiserror::Error;

/// A fatal failure during module conversion.
///
/// Undriven nets are deliberately not a variant here — they are a warning
/// pushed to the caller's `DiagnosticSink`, not a `Result::Err`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// A cell's connection widths or port directions contradict its
    /// declared parameters.
    #[error("structural violation in cell '{cell_name}' of type '{cell_type}': {detail}")]
    StructuralViolation {
        /// The cell's type string.
        cell_type: String,
        /// The cell's instance name.
        cell_name: String,
        /// What specifically was violated.
        detail: String,
    },
    /// Two sources were wired to the same net.
    #[error("net '{net_name}' has more than one source")]
    MultiDriver {
        /// The net's display name (or a synthesized placeholder if unnamed).
        net_name: String,
    },
    /// A cell type has neither a bespoke wirer nor a matching user module.
    #[error("unknown cell type '{cell_type}' with no sub-circuit fallback")]
    UnknownCellType {
        /// The unrecognized type string.
        cell_type: String,
    },
    /// The module-instantiation graph contains a cycle.
    #[error("module instantiation graph contains a cycle")]
    InstantiationCycle,
}

/// Shorthand result alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
