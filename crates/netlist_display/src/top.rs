//! Assembles the whole converted design: picks the top module, converts
//! every module in dependency order, and attaches sub-circuits.

use crate::convert::ModuleConverter;
use crate::depsort::sort_modules;
use crate::errors::ConvertResult;
use crate::output::{OutputDesign, OutputModule};
use crate::portmap::build_port_map_table;
use indexmap::IndexMap;
use netlist_diagnostics::DiagnosticSink;
use netlist_ir::SynthNetlist;

/// Converts a whole parsed design into its output graph.
///
/// Picks the module the dependency sort places last (the only module
/// nothing else instantiates) as top. Every other module becomes a named
/// sub-circuit.
pub fn convert_design(
    netlist: &SynthNetlist,
    diagnostics: &DiagnosticSink,
) -> ConvertResult<OutputDesign> {
    let order = sort_modules(netlist)?;
    let port_maps = build_port_map_table(netlist);

    let mut subcircuits = IndexMap::new();
    for name in &order.subcircuits {
        if *name == order.top {
            continue;
        }
        let converted = convert_one(netlist, &port_maps, diagnostics, name)?;
        subcircuits.insert(name.clone(), converted);
    }

    let top_module = convert_one(netlist, &port_maps, diagnostics, &order.top)?;
    Ok(OutputDesign::new(top_module, subcircuits))
}

fn convert_one(
    netlist: &SynthNetlist,
    port_maps: &crate::portmap::PortMapTable,
    diagnostics: &DiagnosticSink,
    name: &str,
) -> ConvertResult<OutputModule> {
    let module = &netlist.modules[name];
    ModuleConverter::new(netlist, module, port_maps, diagnostics).convert()
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlist_diagnostics::DiagnosticSink;

    #[test]
    fn single_module_design_has_no_subcircuits() {
        let netlist: SynthNetlist = serde_json::from_str(
            r#"{"modules":{"top":{"ports":{},"cells":{}}}}"#,
        )
        .unwrap();
        let sink = DiagnosticSink::new();
        let design = convert_design(&netlist, &sink).unwrap();
        assert!(design.subcircuits.is_empty());
    }

    #[test]
    fn hierarchical_design_nests_subcircuits() {
        let netlist: SynthNetlist = serde_json::from_str(
            r#"{"modules":{
                "top": {"ports": {}, "cells": {"c1": {"type": "leaf", "connections": {}}}},
                "leaf": {"ports": {}, "cells": {}}
            }}"#,
        )
        .unwrap();
        let sink = DiagnosticSink::new();
        let design = convert_design(&netlist, &sink).unwrap();
        assert!(design.subcircuits.contains_key("leaf"));
        assert_eq!(design.devices.len(), 1);
    }
}
