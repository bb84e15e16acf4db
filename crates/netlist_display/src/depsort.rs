//! Orders user-defined modules so that every sub-module appears before
//! anything that instantiates it, with the (unique, never-instantiated) top
//! module appearing last.

use crate::errors::{ConvertError, ConvertResult};
use indexmap::IndexSet;
use netlist_ir::SynthNetlist;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

/// A dependency order over a design's modules, top-last.
#[derive(Debug)]
pub struct ModuleOrder {
    /// Every sub-circuit, earliest dependency first.
    pub subcircuits: Vec<String>,
    /// The module instantiated by nothing else.
    pub top: String,
}

/// Builds the module order: an edge `module -> sink` for every module (so
/// every node is ranked even if nothing instantiates it), and an edge
/// `sub_module -> module` for every cell instantiating `sub_module`. A
/// topological sort then yields the top module last; the caller pops the
/// synthetic sink first, then the top module.
pub fn sort_modules(netlist: &SynthNetlist) -> ConvertResult<ModuleOrder> {
    let mut graph = DiGraph::<String, ()>::new();
    let mut nodes: indexmap::IndexMap<String, NodeIndex> = indexmap::IndexMap::new();

    for name in netlist.modules.keys() {
        let idx = graph.add_node(name.clone());
        nodes.insert(name.clone(), idx);
    }
    let sink = graph.add_node("\u{1}sink".to_string());
    for idx in nodes.values() {
        graph.add_edge(*idx, sink, ());
    }

    for (module_name, module) in &netlist.modules {
        let module_idx = nodes[module_name];
        for cell in module.cells.values() {
            if let Some(&sub_idx) = nodes.get(&cell.cell_type) {
                graph.add_edge(sub_idx, module_idx, ());
            }
        }
    }

    let order = toposort(&graph, None).map_err(|_| ConvertError::InstantiationCycle)?;

    let mut names: Vec<String> = order
        .into_iter()
        .filter(|&idx| idx != sink)
        .map(|idx| graph[idx].clone())
        .collect();

    let top = names.pop().ok_or(ConvertError::InstantiationCycle)?;

    // Preserve declaration order among sub-circuits that have no relative
    // dependency, for deterministic output independent of petgraph's
    // internal node iteration order.
    let declared: IndexSet<&str> = netlist.modules.keys().map(String::as_str).collect();
    names.sort_by_key(|n| declared.get_index_of(n.as_str()).unwrap_or(usize::MAX));

    Ok(ModuleOrder {
        subcircuits: names,
        top,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_module_is_its_own_top() {
        let netlist: SynthNetlist = serde_json::from_str(r#"{"modules":{"top":{}}}"#).unwrap();
        let order = sort_modules(&netlist).unwrap();
        assert_eq!(order.top, "top");
        assert!(order.subcircuits.is_empty());
    }

    #[test]
    fn hierarchical_order_puts_leaf_first() {
        let netlist: SynthNetlist = serde_json::from_str(
            r#"{"modules":{
                "top": {"cells": {"c1": {"type": "sub", "connections": {}}}},
                "sub": {"cells": {"c2": {"type": "leaf", "connections": {}}}},
                "leaf": {}
            }}"#,
        )
        .unwrap();
        let order = sort_modules(&netlist).unwrap();
        assert_eq!(order.top, "top");
        let leaf_pos = order.subcircuits.iter().position(|n| n == "leaf").unwrap();
        let sub_pos = order.subcircuits.iter().position(|n| n == "sub").unwrap();
        assert!(leaf_pos < sub_pos);
    }

    #[test]
    fn cycle_is_an_error() {
        let netlist: SynthNetlist = serde_json::from_str(
            r#"{"modules":{
                "a": {"cells": {"c1": {"type": "b", "connections": {}}}},
                "b": {"cells": {"c2": {"type": "a", "connections": {}}}}
            }}"#,
        )
        .unwrap();
        assert_eq!(sort_modules(&netlist).unwrap_err(), ConvertError::InstantiationCycle);
    }
}
