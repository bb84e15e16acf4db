//! The full convert pipeline: read synthesizer JSON, convert, optionally
//! run the UI mapper, serialize, and render diagnostics.

use std::error::Error;
use std::path::Path;

use netlist_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use netlist_display::{convert_design, OutputDesign};
use netlist_ir::SynthNetlist;

use crate::config::Config;

/// Reads, converts, and (optionally) UI-maps one synthesizer netlist file.
///
/// Returns the converted design, the diagnostics emitted along the way, and
/// the synthesizer's `creator` banner. Does not serialize or print anything
/// — callers decide output format.
pub fn run_pipeline(
    input_path: &Path,
    config: &Config,
) -> Result<(OutputDesign, Vec<Diagnostic>, String), Box<dyn Error>> {
    let text = std::fs::read_to_string(input_path)?;
    let netlist: SynthNetlist = serde_json::from_str(&text)?;
    let creator = netlist.creator.clone();

    let sink = DiagnosticSink::new();
    let mut design = convert_design(&netlist, &sink)?;

    if config.ui_mapper {
        netlist_ui::map_design(&mut design);
    }

    let diagnostics = sink.take_all();
    if config.warnings_as_errors && diagnostics.iter().any(|d| d.severity.is_warning()) {
        return Err(format!(
            "{} warning(s) treated as errors",
            diagnostics.iter().filter(|d| d.severity.is_warning()).count()
        )
        .into());
    }

    Ok((design, diagnostics, creator))
}

/// Serializes a converted design per the configured JSON style.
pub fn serialize_design(design: &OutputDesign, config: &Config) -> serde_json::Result<String> {
    if config.pretty {
        serde_json::to_string_pretty(design)
    } else {
        serde_json::to_string(design)
    }
}

/// Prints each diagnostic to stderr as `<severity>: <message> [<net>]`.
///
/// Sorted by `(net name, message)` and deduplicated before printing, so
/// runs over the same design always report warnings in the same order
/// regardless of the synthesizer's own net-iteration order.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) {
    let mut ordered: Vec<&Diagnostic> = diagnostics.iter().collect();
    ordered.sort_by(|a, b| {
        (a.net_name.as_deref().unwrap_or(""), a.message.as_str())
            .cmp(&(b.net_name.as_deref().unwrap_or(""), b.message.as_str()))
    });
    ordered.dedup_by(|a, b| a.net_name == b.net_name && a.message == b.message);

    for diag in ordered {
        let suffix = diag
            .net_name
            .as_deref()
            .map(|n| format!(" (net '{n}')"))
            .unwrap_or_default();
        let marker = match diag.severity {
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        eprintln!("{marker}: {}{suffix}", diag.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn pipeline_converts_a_minimal_design() {
        let json = r#"{"modules":{"top":{
            "ports": {"a": {"direction":"input","bits":[2]}},
            "cells": {},
            "netnames": {}
        }}}"#;
        let file = write_fixture(json);
        let config = Config::default();
        let (design, diagnostics, _creator) = run_pipeline(file.path(), &config).unwrap();
        assert_eq!(design.devices.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn undriven_net_is_a_warning_not_an_error() {
        let json = r#"{"modules":{"top":{
            "ports": {"y": {"direction":"output","bits":[5]}},
            "cells": {},
            "netnames": {}
        }}}"#;
        let file = write_fixture(json);
        let config = Config::default();
        let (_design, diagnostics, _creator) = run_pipeline(file.path(), &config).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity.is_warning());
    }

    #[test]
    fn warnings_as_errors_fails_the_pipeline() {
        let json = r#"{"modules":{"top":{
            "ports": {"y": {"direction":"output","bits":[5]}},
            "cells": {},
            "netnames": {}
        }}}"#;
        let file = write_fixture(json);
        let mut config = Config::default();
        config.warnings_as_errors = true;
        assert!(run_pipeline(file.path(), &config).is_err());
    }

    #[test]
    fn ui_mapper_rewrites_clock_inputs() {
        let json = r#"{"modules":{"top":{
            "ports": {"clk": {"direction":"input","bits":[2]}},
            "cells": {},
            "netnames": {}
        }}}"#;
        let file = write_fixture(json);
        let config = Config::default();
        let (design, _, _creator) = run_pipeline(file.path(), &config).unwrap();
        let dev = design.devices.values().next().unwrap();
        assert!(matches!(dev, netlist_display::Device::Clock { .. }));
    }

    #[test]
    fn disabling_ui_mapper_keeps_generic_input() {
        let json = r#"{"modules":{"top":{
            "ports": {"clk": {"direction":"input","bits":[2]}},
            "cells": {},
            "netnames": {}
        }}}"#;
        let file = write_fixture(json);
        let mut config = Config::default();
        config.ui_mapper = false;
        let (design, _, _creator) = run_pipeline(file.path(), &config).unwrap();
        let dev = design.devices.values().next().unwrap();
        assert!(matches!(dev, netlist_display::Device::Input { .. }));
    }
}
