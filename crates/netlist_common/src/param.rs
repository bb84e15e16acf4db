//! Normalizes synthesizer parameters, which may arrive as either an integer
//! or a binary string (the latter preserves `x`/`z` values an integer can't
//! hold).

use serde::{Deserialize, Serialize};

use crate::logic::Logic;

/// A single parameter value as read from the synthesizer's JSON.
///
/// Parameters are polymorphic on the wire: Yosys emits small, fully-defined
/// values as JSON integers and anything wider or containing `x`/`z` as an
/// MSB-first binary string. Both shapes decode into this one type.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A parameter that arrived as a JSON integer.
    Int(i64),
    /// A parameter that arrived as a binary (or plain) string.
    Str(String),
}

impl ParamValue {
    /// Normalizes this parameter to a non-negative integer.
    ///
    /// Binary strings of `0`/`1` are parsed radix-2, MSB first. Strings
    /// containing `x`/`z` have no integer value and yield `None`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParamValue::Int(n) => u64::try_from(*n).ok(),
            ParamValue::Str(s) => {
                if s.is_empty() {
                    return Some(0);
                }
                u64::try_from(i128::from_str_radix(s, 2).ok()?).ok()
            }
        }
    }

    /// Normalizes this parameter to a boolean (any nonzero integer value,
    /// or a string containing at least one `1`, is `true`).
    pub fn as_bool(&self) -> bool {
        self.as_u64().unwrap_or(0) != 0
    }

    /// Normalizes this parameter to an MSB-first binary string of exactly
    /// `width` characters, padding with `0` (zero-extension) if shorter, and
    /// truncating the most-significant end if longer.
    pub fn to_binary_string(&self, width: usize) -> String {
        let raw = match self {
            ParamValue::Int(n) => format!("{:b}", (*n).max(0)),
            ParamValue::Str(s) => {
                if s.is_empty() {
                    "0".to_string()
                } else {
                    s.clone()
                }
            }
        };
        pad_or_truncate_msb_first(&raw, width)
    }

    /// Interprets this parameter as a plain (non-bit-pattern) string
    /// attribute, e.g. a memory's `src` or a cell's human label.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s.as_str()),
            ParamValue::Int(_) => None,
        }
    }
}

/// Pads `s` on the left (MSB end) with `'0'` to reach `width`, or drops
/// leading characters if `s` is already wider than `width`.
fn pad_or_truncate_msb_first(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len == width {
        s.to_string()
    } else if len < width {
        let mut out = "0".repeat(width - len);
        out.push_str(s);
        out
    } else {
        s.chars().skip(len - width).collect()
    }
}

/// Validates that a decoded binary string contains only recognized logic
/// characters, returning the parsed [`Logic`] values MSB first.
pub fn parse_binary_literals(s: &str) -> Option<Vec<Logic>> {
    s.chars().map(Logic::from_char).collect()
}
