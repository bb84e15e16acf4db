//! The synthesizer's netlist as parsed JSON — the converter's input IR.
//!
//! This mirrors the JSON schema a synthesizer such as Yosys emits with
//! `write_json`: a top-level map of named modules, each holding named ports,
//! cells and netnames. Field shapes follow the synthesizer's conventions
//! directly (bits arrays mixing literal digits and net ids, parameters that
//! arrive as either an integer or a binary string) rather than normalizing
//! them away — normalization is the converter's job, not the parser's.
//!
//! Every object-valued field uses [`indexmap::IndexMap`] instead of
//! `HashMap`: downstream device-id assignment is order-sensitive, and the
//! only way to preserve the synthesizer's declaration order through a JSON
//! round-trip is to keep insertion order in memory.

#![warn(missing_docs)]

pub mod cell;
pub mod direction;
pub mod module;
pub mod netlist;
pub mod netname;
pub mod port;

pub use cell::SynthCell;
pub use direction::PortDirection;
pub use module::SynthModule;
pub use netlist::SynthNetlist;
pub use netname::SynthNetname;
pub use port::SynthPort;
