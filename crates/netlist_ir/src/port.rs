//! A module's top-level port declaration.

use crate::direction::PortDirection;
use netlist_common::BitVector;
use serde::{Deserialize, Serialize};

/// A single port on a module, as declared (not as instantiated by a cell).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthPort {
    /// Whether this port is driven by, drives, or does both with its
    /// module's interior.
    pub direction: PortDirection,
    /// The bits this port carries, LSB first.
    pub bits: BitVector,
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlist_common::{Bit, Logic};

    #[test]
    fn deserializes_input_port() {
        let json = r#"{"direction":"input","bits":[2,3]}"#;
        let port: SynthPort = serde_json::from_str(json).unwrap();
        assert_eq!(port.direction, PortDirection::Input);
        assert_eq!(port.bits.width(), 2);
        assert_eq!(port.bits.get(0), Some(Bit::Net(2)));
    }

    #[test]
    fn deserializes_port_with_constant_bit() {
        let json = r#"{"direction":"output","bits":["0","1",4]}"#;
        let port: SynthPort = serde_json::from_str(json).unwrap();
        assert_eq!(port.bits.get(0), Some(Bit::Literal(Logic::Zero)));
        assert_eq!(port.bits.get(2), Some(Bit::Net(4)));
    }
}
