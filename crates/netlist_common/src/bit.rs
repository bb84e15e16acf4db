//! A single bit of a synthesizer connection: either a logic literal or an
//! opaque net identifier.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One position of a bit-vector as the synthesizer's JSON represents it.
///
/// Two connections carrying the same `Net(id)` value in the same module are
/// electrically the same wire — `id` is opaque, it is never a width or an
/// index, just a name for an equivalence class.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bit {
    /// A literal `0`/`1`/`x`/`z` value.
    Literal(Logic),
    /// An opaque net identifier (an integer `>= 2` in the source JSON).
    Net(u32),
}

impl Bit {
    /// Parses a single bit from its JSON textual/numeric form.
    ///
    /// `"0"`, `"1"`, `"x"`, `"z"` parse to [`Bit::Literal`]; any other
    /// non-negative integer parses to [`Bit::Net`].
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == 1 {
            if let Some(lit) = Logic::from_char(raw.chars().next().unwrap()) {
                return Some(Bit::Literal(lit));
            }
        }
        raw.parse::<u32>().ok().map(Bit::Net)
    }

    /// Returns `true` if this bit is a literal constant.
    pub fn is_const(self) -> bool {
        matches!(self, Bit::Literal(_))
    }

    /// Returns the underlying net id, if this bit names a net.
    pub fn as_net(self) -> Option<u32> {
        match self {
            Bit::Net(id) => Some(id),
            Bit::Literal(_) => None,
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::Literal(l) => write!(f, "{l}"),
            Bit::Net(id) => write!(f, "{id}"),
        }
    }
}
