//! Foundational types shared by every crate in the netlist-to-display
//! converter.
//!
//! This crate provides the bit-level value model (a literal logic value or
//! an opaque net id), ordered bit vectors keyed by value rather than
//! identity, and parameter normalization for the synthesizer's int-or-string
//! polymorphism.

#![warn(missing_docs)]

pub mod bit;
pub mod bitvector;
pub mod logic;
pub mod param;

pub use bit::Bit;
pub use bitvector::BitVector;
pub use logic::Logic;
pub use param::ParamValue;
