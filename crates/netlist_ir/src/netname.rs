//! A named alias for a set of bits, used to recover human-readable net
//! names and source positions that cell/port bit arrays alone don't carry.

use indexmap::IndexMap;
use netlist_common::{BitVector, ParamValue};
use netlist_diagnostics::SourcePos;
use serde::{Deserialize, Serialize};

/// One entry of a module's `netnames` map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthNetname {
    /// Nonzero if the synthesizer considers this an internal, auto-generated
    /// name rather than one taken from the source HDL.
    #[serde(default, rename = "hide_name")]
    pub hide_name: u8,
    /// The bits this name refers to, LSB first.
    pub bits: BitVector,
    /// Free-form attributes, including `src` (source position) and, for
    /// register outputs, `init` (the power-on value).
    #[serde(default)]
    pub attributes: IndexMap<String, ParamValue>,
}

impl SynthNetname {
    /// `true` if the synthesizer marked this name as internal rather than
    /// sourced from the original HDL.
    pub fn is_hidden(&self) -> bool {
        self.hide_name != 0
    }

    /// Parses the `src` attribute, if present, into structured positions.
    pub fn source_positions(&self) -> Vec<SourcePos> {
        self.attributes
            .get("src")
            .and_then(|v| v.as_str())
            .map(SourcePos::parse_all)
            .unwrap_or_default()
    }

    /// Parses the `init` attribute, if present, into a literal-only
    /// [`BitVector`]'s textual form (MSB-first `0`/`1`/`x` digits).
    pub fn init_value(&self) -> Option<String> {
        self.attributes.get("init").map(|v| v.to_binary_string(self.bits.width()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_basic_netname() {
        let json = r#"{"hide_name":0,"bits":[2,3],"attributes":{"src":"top.v:4.3-4.9"}}"#;
        let nn: SynthNetname = serde_json::from_str(json).unwrap();
        assert!(!nn.is_hidden());
        assert_eq!(nn.bits.width(), 2);
        assert_eq!(nn.source_positions().len(), 1);
    }

    #[test]
    fn hidden_flag() {
        let json = r#"{"hide_name":1,"bits":[5]}"#;
        let nn: SynthNetname = serde_json::from_str(json).unwrap();
        assert!(nn.is_hidden());
        assert!(nn.attributes.is_empty());
    }

    #[test]
    fn missing_attributes_defaults_empty() {
        let json = r#"{"hide_name":0,"bits":[1]}"#;
        let nn: SynthNetname = serde_json::from_str(json).unwrap();
        assert!(nn.source_positions().is_empty());
        assert!(nn.init_value().is_none());
    }

    #[test]
    fn init_value_is_read() {
        let json = r#"{"hide_name":0,"bits":[6,7],"attributes":{"init":3}}"#;
        let nn: SynthNetname = serde_json::from_str(json).unwrap();
        assert_eq!(nn.init_value().as_deref(), Some("11"));
    }
}
