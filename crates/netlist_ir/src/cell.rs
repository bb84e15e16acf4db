//! A cell instance: a primitive gate/register/arithmetic unit, or an
//! instance of another module in the same design.

use crate::direction::PortDirection;
use indexmap::IndexMap;
use netlist_common::{BitVector, ParamValue};
use netlist_diagnostics::SourcePos;
use serde::{Deserialize, Serialize};

/// One entry of a module's `cells` map.
///
/// `cell_type` is the synthesizer's internal name for the primitive (e.g.
/// `$and`, `$dff`, `$mem_v2`) or, for a hierarchical instance, the name of
/// another module in the same design. The converter tells the two apart by
/// whether `cell_type` names a key of the design's own `modules` map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthCell {
    /// Nonzero if the synthesizer considers this an internal, auto-generated
    /// instance name.
    #[serde(default, rename = "hide_name")]
    pub hide_name: u8,
    /// The primitive or module type this cell instantiates.
    #[serde(rename = "type")]
    pub cell_type: String,
    /// Cell parameters (bit widths, arithmetic signedness, memory geometry,
    /// FSM transition tables, ...), each either an integer or a binary
    /// string depending on what the synthesizer chose to emit.
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,
    /// Free-form attributes, including `src`.
    #[serde(default)]
    pub attributes: IndexMap<String, ParamValue>,
    /// The direction of each named port this cell connects to.
    #[serde(default)]
    pub port_directions: IndexMap<String, PortDirection>,
    /// The bits wired to each named port, LSB first.
    pub connections: IndexMap<String, BitVector>,
}

impl SynthCell {
    /// `true` if the synthesizer marked this instance name as internal.
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

    /// `true` if `cell_type` names a synthesizer-internal primitive (its
    /// name starts with `$`) rather than a user-defined module instance.
    pub fn is_primitive(&self) -> bool {
        self.cell_type.starts_with('$')
    }
}
