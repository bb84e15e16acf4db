//! Optional post-pass that rewrites generic `Input`/`Output` devices into
//! concrete UI widgets, based on width and net-name heuristics. Runs after
//! conversion and has no effect on simulation semantics — a design is valid
//! with or without it.

#![warn(missing_docs)]

use netlist_display::{Device, OutputDesign, OutputModule};

const CLOCK_DELAY: u32 = 100;

fn is_clock_label(label: &str) -> bool {
    matches!(label.to_ascii_lowercase().as_str(), "clk" | "clock")
}

fn is_display7_label(label: &str) -> bool {
    let lower = label.to_ascii_lowercase();
    lower == "display7" || lower.starts_with("display7_")
}

fn map_device(device: Device) -> Device {
    match device {
        Device::Input { net, order, bits } if bits == 1 && is_clock_label(&net) => Device::Clock {
            net,
            order,
            bits,
            delay: CLOCK_DELAY,
        },
        Device::Input { net, order, bits } if bits == 1 => Device::Button { net, order, bits },
        Device::Input { net, order, bits } => Device::NumEntry { net, order, bits },
        Device::Output { net, order, bits } if bits == 1 => Device::Lamp { net, order, bits },
        Device::Output { net, order, bits } if bits == 8 && is_display7_label(&net) => {
            Device::Display7 { net, order, bits }
        }
        Device::Output { net, order, bits } => Device::NumDisplay { net, order, bits },
        other => other,
    }
}

/// Rewrites every `Input`/`Output` device in one module, leaving every other
/// device and all connectors untouched.
pub fn map_module(module: &mut OutputModule) {
    for device in module.devices.values_mut() {
        let old = std::mem::replace(device, Device::Constant { constant: String::new() });
        *device = map_device(old);
    }
}

/// Rewrites every `Input`/`Output` device across a whole design, including
/// every sub-circuit.
pub fn map_design(design: &mut OutputDesign) {
    for device in design.devices.values_mut() {
        let old = std::mem::replace(device, Device::Constant { constant: String::new() });
        *device = map_device(old);
    }
    for module in design.subcircuits.values_mut() {
        map_module(module);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bit_clk_input_becomes_clock() {
        let dev = map_device(Device::Input {
            net: "clk".into(),
            order: 0,
            bits: 1,
        });
        assert_eq!(
            dev,
            Device::Clock {
                net: "clk".into(),
                order: 0,
                bits: 1,
                delay: CLOCK_DELAY,
            }
        );
    }

    #[test]
    fn clock_label_is_case_insensitive() {
        let dev = map_device(Device::Input {
            net: "CLOCK".into(),
            order: 0,
            bits: 1,
        });
        assert!(matches!(dev, Device::Clock { .. }));
    }

    #[test]
    fn one_bit_non_clock_input_becomes_button() {
        let dev = map_device(Device::Input {
            net: "reset".into(),
            order: 1,
            bits: 1,
        });
        assert!(matches!(dev, Device::Button { .. }));
    }

    #[test]
    fn wide_input_becomes_num_entry() {
        let dev = map_device(Device::Input {
            net: "data".into(),
            order: 2,
            bits: 8,
        });
        assert!(matches!(dev, Device::NumEntry { .. }));
    }

    #[test]
    fn one_bit_output_becomes_lamp() {
        let dev = map_device(Device::Output {
            net: "done".into(),
            order: 0,
            bits: 1,
        });
        assert!(matches!(dev, Device::Lamp { .. }));
    }

    #[test]
    fn eight_bit_display7_output_becomes_display7() {
        let dev = map_device(Device::Output {
            net: "display7_a".into(),
            order: 0,
            bits: 8,
        });
        assert!(matches!(dev, Device::Display7 { .. }));
    }

    #[test]
    fn eight_bit_non_display7_output_becomes_num_display() {
        let dev = map_device(Device::Output {
            net: "sum".into(),
            order: 0,
            bits: 8,
        });
        assert!(matches!(dev, Device::NumDisplay { .. }));
    }

    #[test]
    fn map_module_leaves_non_io_devices_alone() {
        let mut module = OutputModule::new();
        module.devices.insert("dev0".into(), Device::And { bits: 1 });
        map_module(&mut module);
        assert_eq!(module.devices["dev0"], Device::And { bits: 1 });
    }

    #[test]
    fn map_design_rewrites_subcircuits_too() {
        let mut sub = OutputModule::new();
        sub.devices.insert(
            "dev0".into(),
            Device::Input {
                net: "clk".into(),
                order: 0,
                bits: 1,
            },
        );
        let mut subs = indexmap::IndexMap::new();
        subs.insert("leaf".into(), sub);
        let mut design = OutputDesign::new(OutputModule::new(), subs);
        map_design(&mut design);
        assert!(matches!(
            design.subcircuits["leaf"].devices["dev0"],
            Device::Clock { .. }
        ));
    }
}
