//! End-to-end test against the compiled binary: a real synthesizer JSON
//! fixture in, a converted design out.

use std::process::Command;

#[test]
fn and_gate_fixture_converts_cleanly() {
    let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/and_gate.json");
    let output = Command::new(env!("CARGO_BIN_EXE_netlist2display"))
        .arg(fixture)
        .arg("--compact")
        .output()
        .expect("failed to run netlist2display");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let design: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    let devices = design["devices"].as_object().unwrap();
    let types: Vec<&str> = devices.values().map(|d| d["type"].as_str().unwrap()).collect();
    assert!(types.contains(&"And"));
    assert!(types.contains(&"Button") || types.contains(&"NumEntry"));
    assert!(types.contains(&"Lamp") || types.contains(&"NumDisplay"));
}
