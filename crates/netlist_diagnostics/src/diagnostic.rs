//! Structured, non-fatal diagnostic messages.

use crate::severity::Severity;
use crate::sourcepos::SourcePos;
use serde::{Deserialize, Serialize};

/// A single non-fatal diagnostic emitted during conversion.
///
/// The only diagnostic the core itself produces is the undriven-net warning,
/// but the type stays general so `netlist_cli` can also route its own
/// advisory notes (e.g. `--show-creator`) through one sink.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The human-readable message.
    pub message: String,
    /// The net's display name, if the diagnostic concerns a specific net.
    pub net_name: Option<String>,
    /// Source positions associated with the affected net, if any.
    pub source_positions: Vec<SourcePos>,
}

impl Diagnostic {
    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            net_name: None,
            source_positions: Vec::new(),
        }
    }

    /// Creates an informational note.
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            net_name: None,
            source_positions: Vec::new(),
        }
    }

    /// Attaches the display name of the net this diagnostic concerns.
    pub fn with_net_name(mut self, name: impl Into<String>) -> Self {
        self.net_name = Some(name.into());
        self
    }

    /// Attaches source positions to this diagnostic.
    pub fn with_source_positions(mut self, positions: Vec<SourcePos>) -> Self {
        self.source_positions = positions;
        self
    }
}
