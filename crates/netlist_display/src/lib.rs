//! Converts a parsed synthesizer netlist into the device/connector graph a
//! schematic viewer renders and simulates.

#![warn(missing_docs)]

mod cells;
pub mod connector;
pub mod convert;
pub mod depsort;
pub mod device;
pub mod errors;
pub mod output;
pub mod portmap;
pub mod top;

pub use connector::{Connector, Endpoint};
pub use convert::ModuleConverter;
pub use depsort::{sort_modules, ModuleOrder};
pub use device::*;
pub use errors::{ConvertError, ConvertResult};
pub use output::{OutputDesign, OutputModule};
pub use portmap::{build_port_map_table, PortMap, PortMapTable};
pub use top::convert_design;
