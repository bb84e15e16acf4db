//! A single module: a collection of ports, cells and netnames.

use crate::cell::SynthCell;
use crate::port::SynthPort;
use crate::netname::SynthNetname;
use indexmap::IndexMap;
use netlist_common::ParamValue;
use serde::{Deserialize, Serialize};

/// One entry of a design's `modules` map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthModule {
    /// Free-form module-level attributes (e.g. `top` marking the design's
    /// root module).
    #[serde(default)]
    pub attributes: IndexMap<String, ParamValue>,
    /// Default values for this module's parameters, when it's used as a
    /// parametric sub-module type.
    #[serde(default)]
    pub parameter_default_values: IndexMap<String, ParamValue>,
    /// The module's top-level ports, in declaration order.
    #[serde(default)]
    pub ports: IndexMap<String, SynthPort>,
    /// The module's cell instances, in declaration order.
    #[serde(default)]
    pub cells: IndexMap<String, SynthCell>,
    /// Named bit-vector aliases used to recover net names and source
    /// positions.
    #[serde(default)]
    pub netnames: IndexMap<String, SynthNetname>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_module_with_top_attribute() {
        let json = r#"{
            "attributes": {"top": 1},
            "ports": {},
            "cells": {},
            "netnames": {}
        }"#;
        let module: SynthModule = serde_json::from_str(json).unwrap();
        assert_eq!(module.attributes.get("top").map(ParamValue::as_bool), Some(true));
    }

    #[test]
    fn missing_sections_default_empty() {
        let json = r#"{}"#;
        let module: SynthModule = serde_json::from_str(json).unwrap();
        assert!(module.attributes.is_empty());
        assert!(module.ports.is_empty());
        assert!(module.cells.is_empty());
    }

    #[test]
    fn preserves_declaration_order() {
        let json = r#"{
            "ports": {
                "clk": {"direction": "input", "bits": [2]},
                "rst": {"direction": "input", "bits": [3]},
                "q": {"direction": "output", "bits": [4]}
            }
        }"#;
        let module: SynthModule = serde_json::from_str(json).unwrap();
        let names: Vec<_> = module.ports.keys().cloned().collect();
        assert_eq!(names, vec!["clk", "rst", "q"]);
    }
}
