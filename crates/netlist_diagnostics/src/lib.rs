//! Non-fatal diagnostic accumulation for the netlist-to-display converter.
//!
//! Fatal conditions (structural violations, multi-driver nets, unknown cell
//! types) are `Result::Err` values raised directly by `netlist_display`. This
//! crate covers the one recoverable condition the converter defines — an
//! undriven net, dropped with a warning — plus the [`SourcePos`] type used
//! to carry parsed `src` attributes from input cells/nets through to output
//! connectors and diagnostics alike.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod severity;
pub mod sink;
pub mod sourcepos;

pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
pub use sourcepos::{LineCol, SourcePos};
