//! The converted output graph: one module's devices and connectors, and the
//! whole multi-module design with sub-circuits attached.

use crate::connector::Connector;
use crate::device::Device;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One converted module: its devices, keyed by generated id, and its
/// connectors, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputModule {
    /// Devices, keyed by generated id (`dev<N>`).
    pub devices: IndexMap<String, Device>,
    /// Connectors, in the order they were emitted.
    pub connectors: Vec<Connector>,
}

impl OutputModule {
    /// An empty module, ready to receive devices and connectors.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The whole converted design: the selected top module, with every other
/// module attached as a named sub-circuit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDesign {
    /// The top module's devices.
    pub devices: IndexMap<String, Device>,
    /// The top module's connectors.
    pub connectors: Vec<Connector>,
    /// Every other converted module, keyed by module name.
    pub subcircuits: IndexMap<String, OutputModule>,
}

impl OutputDesign {
    /// Builds a design from the top module's graph and its sub-circuits.
    pub fn new(top: OutputModule, subcircuits: IndexMap<String, OutputModule>) -> Self {
        Self {
            devices: top.devices,
            connectors: top.connectors,
            subcircuits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::Endpoint;

    #[test]
    fn empty_module_serializes_to_empty_collections() {
        let m = OutputModule::new();
        let json = serde_json::to_value(&m).unwrap();
        assert!(json["devices"].as_object().unwrap().is_empty());
        assert!(json["connectors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn design_moves_top_fields_to_root() {
        let mut top = OutputModule::new();
        top.devices.insert("dev1".into(), Device::And { bits: 1 });
        top.connectors.push(Connector::new(
            Endpoint::new("dev1", "out"),
            Endpoint::new("dev2", "in1"),
        ));
        let mut subs = IndexMap::new();
        subs.insert("sub".into(), OutputModule::new());

        let design = OutputDesign::new(top, subs);
        assert_eq!(design.devices.len(), 1);
        assert_eq!(design.connectors.len(), 1);
        assert!(design.subcircuits.contains_key("sub"));
    }
}
