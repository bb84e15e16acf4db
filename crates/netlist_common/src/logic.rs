//! Four-state logic literals, the non-net half of a netlist [`Bit`](crate::Bit).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single literal logic value carried by a bit position that is not wired
/// to a net: `0`, `1`, `x` (unknown/don't-care) or `z` (high-impedance).
///
/// Unlike a simulator's four-state value, `Logic` here is purely
/// representational — the converter never evaluates truth tables over it,
/// it only classifies runs of bits and renders constant payloads.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Logic low (`0`).
    #[serde(rename = "0")]
    Zero = 0,
    /// Logic high (`1`).
    #[serde(rename = "1")]
    One = 1,
    /// Unknown or don't-care (`x`).
    #[serde(rename = "x")]
    X = 2,
    /// High-impedance (`z`).
    #[serde(rename = "z")]
    Z = 3,
}

impl Logic {
    /// Converts a character to a [`Logic`] value.
    ///
    /// Accepts `'0'`, `'1'`, `'x'`/`'X'`, `'z'`/`'Z'`, and also `'-'` (the
    /// don't-care marker used in FSM transition tables), which maps to `X`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'x' | 'X' | '-' => Some(Logic::X),
            'z' | 'Z' => Some(Logic::Z),
            _ => None,
        }
    }

    /// Returns `true` for `Zero`.
    pub fn is_zero(self) -> bool {
        matches!(self, Logic::Zero)
    }

    /// Returns `true` for `One`.
    pub fn is_one(self) -> bool {
        matches!(self, Logic::One)
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Zero => write!(f, "0"),
            Logic::One => write!(f, "1"),
            Logic::X => write!(f, "x"),
            Logic::Z => write!(f, "z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Logic::*;

    #[test]
    fn from_char_valid() {
        use super::Logic;
        assert_eq!(Logic::from_char('0'), Some(Zero));
        assert_eq!(Logic::from_char('1'), Some(One));
        assert_eq!(Logic::from_char('x'), Some(X));
        assert_eq!(Logic::from_char('X'), Some(X));
        assert_eq!(Logic::from_char('-'), Some(X));
        assert_eq!(Logic::from_char('z'), Some(Z));
        assert_eq!(Logic::from_char('Z'), Some(Z));
    }

    #[test]
    fn from_char_invalid() {
        use super::Logic;
        assert_eq!(Logic::from_char('a'), None);
        assert_eq!(Logic::from_char('2'), None);
    }

    #[test]
    fn display_lowercase() {
        assert_eq!(format!("{Zero}"), "0");
        assert_eq!(format!("{One}"), "1");
        assert_eq!(format!("{X}"), "x");
        assert_eq!(format!("{Z}"), "z");
    }

    #[test]
    fn predicates() {
        assert!(Zero.is_zero());
        assert!(!Zero.is_one());
        assert!(One.is_one());
        assert!(!X.is_zero());
    }

    #[test]
    fn serde_uses_single_char_strings() {
        assert_eq!(serde_json::to_string(&Zero).unwrap(), "\"0\"");
        assert_eq!(serde_json::to_string(&One).unwrap(), "\"1\"");
        assert_eq!(serde_json::to_string(&X).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&Z).unwrap(), "\"z\"");
        let back: super::Logic = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(back, X);
    }
}
