//! TOML-backed CLI configuration, merged over built-in defaults.

use serde::Deserialize;
use std::path::Path;

/// User-facing configuration, loadable from a `netlist2display.toml` file
/// and overridable by CLI flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run the I/O UI mapper post-pass after conversion.
    pub ui_mapper: bool,
    /// Emit pretty-printed JSON instead of compact.
    pub pretty: bool,
    /// Treat any emitted diagnostic (currently: undriven nets) as fatal.
    pub warnings_as_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui_mapper: true,
            pretty: true,
            warnings_as_errors: false,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file, falling back to defaults for
    /// any field the file doesn't set.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
