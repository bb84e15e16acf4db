//! Port and cell-connection direction.

use serde::{Deserialize, Serialize};

/// The direction of a module port or a cell's connection to one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PortDirection {
    /// Data flows into the module/cell.
    #[serde(rename = "input")]
    Input,
    /// Data flows out of the module/cell.
    #[serde(rename = "output")]
    Output,
    /// Data flows both ways (tri-state or bidirectional pads).
    #[serde(rename = "inout")]
    InOut,
}
