//! The whole parsed design: every module the synthesizer emitted.

use crate::module::SynthModule;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The top-level document a synthesizer writes: a creator banner plus every
/// module in the design, keyed by name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthNetlist {
    /// The synthesizer's self-identification string (tool name and
    /// version), carried through unchanged for diagnostics.
    #[serde(default)]
    pub creator: String,
    /// Every module in the design, in declaration order.
    pub modules: IndexMap<String, SynthModule>,
}
