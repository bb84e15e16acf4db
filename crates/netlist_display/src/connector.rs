//! Wires between devices in the output graph.

use netlist_diagnostics::SourcePos;
use serde::{Deserialize, Serialize};

/// One endpoint of a connector: a device id and the port name on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// The device's generated id (e.g. `dev3`).
    pub id: String,
    /// The port name on that device.
    pub port: String,
}

impl Endpoint {
    /// Creates an endpoint from a device id and port name.
    pub fn new(id: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            port: port.into(),
        }
    }
}

/// A single wire from one device's output port to another's input port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    /// The driving endpoint.
    pub from: Endpoint,
    /// The driven endpoint.
    pub to: Endpoint,
    /// The net's display name, if one was recovered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Source positions contributing to this net, if any were recovered.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub source_positions: Vec<SourcePos>,
}

impl Connector {
    /// Creates a bare connector with no name or source positions.
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self {
            from,
            to,
            name: None,
            source_positions: Vec::new(),
        }
    }

    /// Attaches a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches source positions.
    pub fn with_source_positions(mut self, positions: Vec<SourcePos>) -> Self {
        self.source_positions = positions;
        self
    }
}
