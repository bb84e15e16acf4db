//! `netlist2display` — converts a synthesizer's JSON netlist into the
//! device/connector graph an interactive schematic viewer renders.

#![warn(missing_docs)]

mod config;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use config::Config;
use netlist_diagnostics::Diagnostic;

/// Converts a synthesizer netlist (e.g. Yosys `write_json` output) into a
/// display netlist.
#[derive(Parser, Debug)]
#[command(name = "netlist2display", version, about)]
struct Cli {
    /// Path to the synthesizer's JSON netlist.
    input: PathBuf,

    /// Where to write the converted JSON. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to a `netlist2display.toml` configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the I/O UI mapper post-pass (emit generic Input/Output only).
    #[arg(long)]
    no_ui_mapper: bool,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Treat any emitted warning (e.g. an undriven net) as a fatal error.
    #[arg(long)]
    deny_warnings: bool,

    /// Enable verbose (debug-level) tracing output.
    #[arg(short, long)]
    verbose: bool,

    /// Print the synthesizer's `creator` banner as a diagnostic note.
    #[arg(long)]
    show_creator: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.no_ui_mapper {
        config.ui_mapper = false;
    }
    if cli.compact {
        config.pretty = false;
    }
    if cli.deny_warnings {
        config.warnings_as_errors = true;
    }

    tracing::debug!(input = %cli.input.display(), "starting conversion");

    let (design, mut diagnostics, creator) = pipeline::run_pipeline(&cli.input, &config)?;
    if cli.show_creator {
        diagnostics.push(Diagnostic::note(format!("synthesized by {creator}")));
    }
    pipeline::render_diagnostics(&diagnostics);

    let json = pipeline::serialize_design(&design, &config)?;
    match &cli.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::parse_from(["netlist2display", "design.json"]);
        assert_eq!(cli.input, PathBuf::from("design.json"));
        assert!(cli.output.is_none());
        assert!(!cli.no_ui_mapper);
        assert!(!cli.compact);
        assert!(!cli.show_creator);
    }

    #[test]
    fn parses_full_flags() {
        let cli = Cli::parse_from([
            "netlist2display",
            "design.json",
            "--output",
            "out.json",
            "--no-ui-mapper",
            "--compact",
            "--deny-warnings",
            "--show-creator",
        ]);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.no_ui_mapper);
        assert!(cli.compact);
        assert!(cli.deny_warnings);
        assert!(cli.show_creator);
    }
}
