//! The module converter: transforms one synthesizer module into one output
//! device/connector graph.

use crate::connector::{Connector, Endpoint};
use crate::device::*;
use crate::errors::{ConvertError, ConvertResult};
use crate::output::OutputModule;
use crate::portmap::PortMapTable;
use indexmap::IndexMap;
use netlist_common::{Bit, BitVector, Logic};
use netlist_diagnostics::{Diagnostic, DiagnosticSink, SourcePos};
use netlist_ir::{PortDirection, SynthCell, SynthModule, SynthNetlist};
use std::collections::HashMap;

#[derive(Default, Clone)]
struct NetRecord {
    source: Option<Endpoint>,
    targets: Vec<Endpoint>,
    name: Option<String>,
    source_positions: Vec<SourcePos>,
}

/// Builds one module's output graph from its parsed synthesizer form.
pub struct ModuleConverter<'a> {
    netlist: &'a SynthNetlist,
    module: &'a SynthModule,
    port_maps: &'a PortMapTable,
    diagnostics: &'a DiagnosticSink,
    devices: IndexMap<String, Device>,
    nets: IndexMap<BitVector, NetRecord>,
    provenance: HashMap<Bit, (String, String, usize)>,
    port_vectors: HashMap<(String, String), BitVector>,
    next_id: usize,
    next_synthetic_bit: u32,
}

impl<'a> ModuleConverter<'a> {
    /// Creates a converter for one module of a design.
    pub fn new(
        netlist: &'a SynthNetlist,
        module: &'a SynthModule,
        port_maps: &'a PortMapTable,
        diagnostics: &'a DiagnosticSink,
    ) -> Self {
        Self {
            netlist,
            module,
            port_maps,
            diagnostics,
            devices: IndexMap::new(),
            nets: IndexMap::new(),
            provenance: HashMap::new(),
            port_vectors: HashMap::new(),
            next_id: 0,
            next_synthetic_bit: u32::MAX,
        }
    }

    /// Runs the full sub-phase sequence and returns the converted module.
    pub fn convert(mut self) -> ConvertResult<OutputModule> {
        tracing::debug!("harvest: collecting netname provenance");
        self.harvest();
        tracing::debug!("materialize_io: building port devices");
        self.materialize_io()?;
        tracing::debug!(cells = self.module.cells.len(), "lower_cells: lowering primitives and subcircuits");
        self.lower_cells()?;
        tracing::debug!("group_extend_slice: inferring bus groups and extensions");
        self.group_extend_slice();
        tracing::debug!("resolve_leaves: resolving constants and bus slices");
        self.resolve_leaves();
        tracing::trace!(devices = self.devices.len(), "emit: assembling output module");
        Ok(self.emit())
    }

    pub(crate) fn fresh_id(&mut self) -> String {
        let id = format!("dev{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocates a single-bit net id outside the synthesizer's own id space,
    /// for wiring glue the converter inserts itself (e.g. a logical-AND's
    /// reduced 1-bit operand).
    pub(crate) fn fresh_bit(&mut self) -> Bit {
        let bit = Bit::Net(self.next_synthetic_bit);
        self.next_synthetic_bit -= 1;
        bit
    }

    /// Looks up the `init` attribute of any netname sharing `bits`' value,
    /// for a register's power-on state.
    pub(crate) fn lookup_init(&self, bits: &BitVector) -> Option<String> {
        self.module
            .netnames
            .values()
            .find(|nn| nn.bits == *bits)
            .and_then(|nn| nn.init_value())
    }

    pub(crate) fn net_mut(&mut self, bits: &BitVector) -> &mut NetRecord {
        self.nets.entry(bits.clone()).or_default()
    }

    pub(crate) fn set_source(&mut self, bits: &BitVector, ep: Endpoint) -> ConvertResult<()> {
        let name = self.nets.get(bits).and_then(|n| n.name.clone());
        let rec = self.net_mut(bits);
        if rec.source.is_some() {
            return Err(ConvertError::MultiDriver {
                net_name: name.unwrap_or_else(|| format!("{bits:?}")),
            });
        }
        rec.source = Some(ep);
        Ok(())
    }

    pub(crate) fn add_target(&mut self, bits: &BitVector, ep: Endpoint) {
        self.net_mut(bits).targets.push(ep);
    }

    /// Registers a device's output port as the *primary* source of `bits`:
    /// sets the net's source and populates per-bit provenance.
    pub(crate) fn register_primary_output(
        &mut self,
        bits: &BitVector,
        device_id: &str,
        port: &str,
    ) -> ConvertResult<()> {
        self.set_source(bits, Endpoint::new(device_id, port))?;
        for (idx, bit) in bits.iter().enumerate() {
            if bit.as_net().is_some() {
                self.provenance
                    .insert(bit, (device_id.to_string(), port.to_string(), idx));
            }
        }
        self.port_vectors
            .insert((device_id.to_string(), port.to_string()), bits.clone());
        Ok(())
    }

    // --- (a) harvest ---------------------------------------------------

    fn harvest(&mut self) {
        for (name, netname) in &self.module.netnames {
            if netname.is_hidden() {
                continue;
            }
            let positions = netname.source_positions();
            let rec = self.nets.entry(netname.bits.clone()).or_default();
            if rec.name.is_none() {
                rec.name = Some(name.clone());
            }
            rec.source_positions.extend(positions);
        }
    }

    // --- (b) I/O devices -------------------------------------------------

    fn materialize_io(&mut self) -> ConvertResult<()> {
        for (order, (name, port)) in self.module.ports.iter().enumerate() {
            let device_id = self.fresh_id();
            let width = port.bits.width();
            match port.direction {
                PortDirection::Output | PortDirection::InOut => {
                    self.devices.insert(
                        device_id.clone(),
                        Device::Output {
                            net: name.clone(),
                            order,
                            bits: width,
                        },
                    );
                    self.add_target(&port.bits, Endpoint::new(&device_id, "in"));
                }
                PortDirection::Input => {
                    self.devices.insert(
                        device_id.clone(),
                        Device::Input {
                            net: name.clone(),
                            order,
                            bits: width,
                        },
                    );
                    self.register_primary_output(&port.bits, &device_id, "out")?;
                }
            }
        }
        Ok(())
    }

    // --- (c) lower cells -------------------------------------------------

    fn lower_cells(&mut self) -> ConvertResult<()> {
        let cells: Vec<(String, SynthCell)> = self
            .module
            .cells
            .iter()
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect();
        for (cell_name, cell) in &cells {
            self.lower_cell(cell_name, cell)?;
        }
        Ok(())
    }

    fn lower_cell(&mut self, cell_name: &str, cell: &SynthCell) -> ConvertResult<()> {
        let device_id = self.fresh_id();
        let src_positions = cell.source_positions();

        if !cell.is_primitive() {
            if self.netlist.modules.contains_key(&cell.cell_type) {
                self.wire_mapped(&device_id, cell)?;
                self.devices.insert(
                    device_id,
                    Device::Subcircuit {
                        celltype: cell.cell_type.clone(),
                    },
                );
                if !src_positions.is_empty() {
                    for bits in cell.connections.values() {
                        self.net_mut(bits).source_positions.extend(src_positions.clone());
                    }
                }
                return Ok(());
            }
            return Err(ConvertError::UnknownCellType {
                cell_type: cell.cell_type.clone(),
            });
        }

        crate::cells::lower_primitive(self, &device_id, cell_name, cell)
    }

    /// Generic wiring for any cell type with a fixed port-map entry: input
    /// ports (and inout) become net targets, output ports become primary
    /// sources.
    pub(crate) fn wire_mapped(&mut self, device_id: &str, cell: &SynthCell) -> ConvertResult<()> {
        let map = self.port_maps.get(&cell.cell_type).cloned();
        let connections: Vec<(String, BitVector)> = cell
            .connections
            .iter()
            .map(|(p, b)| (p.clone(), b.clone()))
            .collect();
        for (synth_port, bits) in &connections {
            let display_port = map
                .as_ref()
                .and_then(|m| m.get(synth_port))
                .cloned()
                .unwrap_or_else(|| synth_port.clone());
            match cell.port_directions.get(synth_port) {
                Some(PortDirection::Output) => {
                    self.register_primary_output(bits, device_id, &display_port)?
                }
                _ => self.add_target(bits, Endpoint::new(device_id, &display_port)),
            }
        }
        Ok(())
    }

    pub(crate) fn insert_device(&mut self, id: String, device: Device) {
        self.devices.insert(id, device);
    }

    pub(crate) fn diagnostics(&self) -> &DiagnosticSink {
        self.diagnostics
    }

    /// Builds a zero-padded version of `narrow`, MSB end filled with
    /// literal zero bits, to `width` bits.
    pub(crate) fn zero_extend_bits(narrow: &BitVector, width: usize) -> BitVector {
        let mut bits: Vec<Bit> = narrow.iter().collect();
        while bits.len() < width {
            bits.push(Bit::Literal(Logic::Zero));
        }
        BitVector::new(bits)
    }

    /// Builds a sign-extended version of `narrow`: the MSB is replicated
    /// (by value, not by a fresh net id) to fill out to `width` bits.
    pub(crate) fn sign_extend_bits(narrow: &BitVector, width: usize) -> BitVector {
        let mut bits: Vec<Bit> = narrow.iter().collect();
        let sign = narrow.get(narrow.width().saturating_sub(1)).unwrap_or(Bit::Literal(Logic::Zero));
        while bits.len() < width {
            bits.push(sign);
        }
        BitVector::new(bits)
    }

    /// Pads `narrow` to `width`, inserting a Zero/SignExtend device if
    /// padding is actually needed, and returns the (possibly unchanged)
    /// padded vector to use as the consuming device's operand.
    pub(crate) fn pad_input(
        &mut self,
        narrow: &BitVector,
        width: usize,
        signed: bool,
    ) -> BitVector {
        if narrow.width() >= width {
            return narrow.clone();
        }
        let padded = if signed {
            Self::sign_extend_bits(narrow, width)
        } else {
            Self::zero_extend_bits(narrow, width)
        };
        let ext_id = self.fresh_id();
        self.insert_device(
            ext_id.clone(),
            if signed {
                Device::SignExtend {
                    extend: ExtendBits {
                        input: narrow.width(),
                        output: width,
                    },
                }
            } else {
                Device::ZeroExtend {
                    extend: ExtendBits {
                        input: narrow.width(),
                        output: width,
                    },
                }
            },
        );
        // The extension device's own source/target wiring is resolved
        // generically: its output *is* `padded`, and it consumes `narrow`.
        let _ = self.set_source(&padded, Endpoint::new(&ext_id, "out"));
        self.add_target(narrow, Endpoint::new(&ext_id, "in"));
        padded
    }

    // --- (d) group, extend, slice ----------------------------------------

    fn group_extend_slice(&mut self) {
        let keys: Vec<BitVector> = self.nets.keys().cloned().collect();
        for vec in keys {
            self.resolve_structure(&vec);
        }
    }

    fn resolve_structure(&mut self, vec: &BitVector) {
        if self.nets.get(vec).map(|n| n.source.is_some()).unwrap_or(false) {
            return;
        }
        if vec.is_empty() {
            return;
        }
        let runs = self.classify_runs(vec);
        if runs.len() <= 1 {
            return;
        }

        let last = runs.last().unwrap();
        if last.is_all_zero_literal(vec) {
            let l = vec.width() - last.len;
            let prefix = vec.slice(0, l);
            let ext_id = self.fresh_id();
            self.insert_device(
                ext_id.clone(),
                Device::ZeroExtend {
                    extend: ExtendBits {
                        input: l,
                        output: vec.width(),
                    },
                },
            );
            let _ = self.set_source(vec, Endpoint::new(&ext_id, "out"));
            self.add_target(&prefix, Endpoint::new(&ext_id, "in"));
            if runs.len() - 1 > 1 {
                self.resolve_structure(&prefix);
            }
            return;
        }

        let bg_id = self.fresh_id();
        let groups: Vec<usize> = runs.iter().map(|r| r.len).collect();
        self.insert_device(bg_id.clone(), Device::BusGroup { groups });
        let _ = self.set_source(vec, Endpoint::new(&bg_id, "out"));
        let mut offset = 0;
        for (k, run) in runs.iter().enumerate() {
            let sub = vec.slice(offset, run.len);
            self.add_target(&sub, Endpoint::new(&bg_id, format!("in{k}")));
            offset += run.len;
        }
    }

    fn classify_runs(&self, vec: &BitVector) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for bit in vec.iter() {
            let class = self.classify_bit(bit);
            match runs.last_mut() {
                Some(last) if last.class.continues(&class) => {
                    last.len += 1;
                    last.class = class;
                }
                _ => runs.push(Run { class, len: 1 }),
            }
        }
        runs
    }

    fn classify_bit(&self, bit: Bit) -> RunClass {
        match bit {
            Bit::Literal(l) => RunClass::Const(l),
            Bit::Net(_) => match self.provenance.get(&bit) {
                Some((dev, port, idx)) => RunClass::Provenance {
                    device: dev.clone(),
                    port: port.clone(),
                    last_seen_index: *idx,
                },
                None => RunClass::Unknown(bit),
            },
        }
    }

    // --- (e) constants and slices -----------------------------------------

    fn resolve_leaves(&mut self) {
        let keys: Vec<BitVector> = self.nets.keys().cloned().collect();
        for vec in keys {
            if self.nets.get(&vec).map(|n| n.source.is_some()).unwrap_or(true) {
                continue;
            }
            if vec.is_empty() {
                continue;
            }
            if let Some(text) = vec.to_const_string() {
                let id = self.fresh_id();
                self.insert_device(id.clone(), Device::Constant { constant: text });
                let _ = self.set_source(&vec, Endpoint::new(&id, "out"));
                continue;
            }

            if let Some((device, port, first)) = self.contiguous_provenance(&vec) {
                let parent = self.port_vectors.get(&(device.clone(), port.clone())).cloned();
                if let Some(parent) = parent {
                    if first == 0 && vec.width() == parent.width() {
                        let _ = self.set_source(&vec, Endpoint::new(&device, &port));
                    } else {
                        let id = self.fresh_id();
                        self.insert_device(
                            id.clone(),
                            Device::BusSlice {
                                slice: Slice {
                                    first,
                                    count: vec.width(),
                                    total: parent.width(),
                                },
                            },
                        );
                        let _ = self.set_source(&vec, Endpoint::new(&id, "out"));
                        self.add_target(&parent, Endpoint::new(&id, "in"));
                    }
                    continue;
                }
            }

            let name = self.nets.get(&vec).and_then(|n| n.name.clone());
            let positions = self
                .nets
                .get(&vec)
                .map(|n| n.source_positions.clone())
                .unwrap_or_default();
            let mut diag = Diagnostic::warning("undriven net dropped");
            if let Some(n) = name {
                diag = diag.with_net_name(n);
            }
            if !positions.is_empty() {
                diag = diag.with_source_positions(positions);
            }
            self.diagnostics.emit(diag);
        }
    }

    /// If every bit of `vec` is a primary-output bit of the same
    /// device+port at strictly consecutive indices, returns that
    /// `(device, port, first_index)`.
    fn contiguous_provenance(&self, vec: &BitVector) -> Option<(String, String, usize)> {
        let mut iter = vec.iter();
        let first_bit = iter.next()?;
        let (device, port, first_idx) = self.provenance.get(&first_bit)?.clone();
        let mut expected = first_idx + 1;
        for bit in iter {
            let (d, p, idx) = self.provenance.get(&bit)?;
            if *d != device || *p != port || *idx != expected {
                return None;
            }
            expected += 1;
        }
        Some((device, port, first_idx))
    }

    // --- (f) emit ----------------------------------------------------------

    fn emit(mut self) -> OutputModule {
        let mut out = OutputModule::new();
        out.devices = self.devices.clone();

        let nets: Vec<(BitVector, NetRecord)> =
            self.nets.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let mut used_constants: std::collections::HashSet<String> = std::collections::HashSet::new();

        for (_vec, net) in &nets {
            let Some(source) = &net.source else { continue };
            for target in &net.targets {
                let mut from = source.clone();
                let is_constant = matches!(self.devices.get(&from.id), Some(Device::Constant { .. }));
                if is_constant {
                    if used_constants.contains(&from.id) {
                        let payload = match self.devices.get(&from.id) {
                            Some(Device::Constant { constant }) => constant.clone(),
                            _ => unreachable!(),
                        };
                        let new_id = self.fresh_id();
                        self.devices
                            .insert(new_id.clone(), Device::Constant { constant: payload });
                        from = Endpoint::new(&new_id, "out");
                        used_constants.insert(new_id);
                    } else {
                        used_constants.insert(from.id.clone());
                    }
                }
                let mut connector = Connector::new(from, target.clone());
                if let Some(name) = &net.name {
                    connector = connector.with_name(name.clone());
                }
                if !net.source_positions.is_empty() {
                    connector = connector.with_source_positions(net.source_positions.clone());
                }
                out.connectors.push(connector);
            }
        }

        out.devices = self.devices;
        out
    }
}

struct Run {
    class: RunClass,
    len: usize,
}

impl Run {
    fn is_all_zero_literal(&self, _vec: &BitVector) -> bool {
        matches!(self.class, RunClass::Const(Logic::Zero))
    }
}

#[derive(Clone, PartialEq)]
enum RunClass {
    Const(Logic),
    Provenance {
        device: String,
        port: String,
        last_seen_index: usize,
    },
    Unknown(Bit),
}

impl RunClass {
    fn continues(&self, next: &RunClass) -> bool {
        match (self, next) {
            (RunClass::Const(a), RunClass::Const(b)) => a == b,
            (
                RunClass::Provenance {
                    device: d1,
                    port: p1,
                    last_seen_index: idx1,
                    ..
                },
                RunClass::Provenance {
                    device: d2,
                    port: p2,
                    last_seen_index: idx2,
                    ..
                },
            ) => d1 == d2 && p1 == p2 && *idx2 == idx1 + 1,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portmap::build_port_map_table;

    fn convert(json: &str) -> (OutputModule, Vec<netlist_diagnostics::Diagnostic>) {
        let netlist: SynthNetlist = serde_json::from_str(json).unwrap();
        let module = &netlist.modules["top"];
        let port_maps = build_port_map_table(&netlist);
        let sink = DiagnosticSink::new();
        let out = ModuleConverter::new(&netlist, module, &port_maps, &sink)
            .convert()
            .unwrap();
        (out, sink.take_all())
    }

    #[test]
    fn and_gate_wires_directly() {
        let json = r#"{"modules":{"top":{
            "ports": {
                "a": {"direction":"input","bits":[2]},
                "b": {"direction":"input","bits":[3]},
                "y": {"direction":"output","bits":[4]}
            },
            "cells": {
                "g1": {
                    "type": "$and",
                    "parameters": {"A_WIDTH":1,"B_WIDTH":1,"Y_WIDTH":1,"A_SIGNED":0,"B_SIGNED":0},
                    "port_directions": {"A":"input","B":"input","Y":"output"},
                    "connections": {"A":[2],"B":[3],"Y":[4]}
                }
            },
            "netnames": {}
        }}}"#;
        let (out, diags) = convert(json);
        assert!(diags.is_empty());
        let and_count = out.devices.values().filter(|d| matches!(d, Device::And { .. })).count();
        assert_eq!(and_count, 1);
        assert_eq!(out.connectors.len(), 3);
    }

    #[test]
    fn zero_extension_is_inferred_for_a_literal_padded_output() {
        let json = r#"{"modules":{"top":{
            "ports": {
                "a": {"direction":"input","bits":[2,3,4]},
                "y": {"direction":"output","bits":[2,3,4,"0"]}
            },
            "cells": {},
            "netnames": {}
        }}}"#;
        let (out, _diags) = convert(json);
        let has_zero_extend = out
            .devices
            .values()
            .any(|d| matches!(d, Device::ZeroExtend { .. }));
        assert!(has_zero_extend);
    }

    #[test]
    fn constant_referenced_twice_is_replicated() {
        let json = r#"{"modules":{"top":{
            "ports": {
                "y1": {"direction":"output","bits":["1"]},
                "y2": {"direction":"output","bits":["1"]}
            },
            "cells": {},
            "netnames": {}
        }}}"#;
        let (out, _diags) = convert(json);
        let constants = out
            .devices
            .values()
            .filter(|d| matches!(d, Device::Constant { .. }))
            .count();
        assert_eq!(constants, 2);
    }

    #[test]
    fn undriven_net_emits_a_warning_and_is_dropped() {
        let json = r#"{"modules":{"top":{
            "ports": {
                "y": {"direction":"output","bits":[9]}
            },
            "cells": {},
            "netnames": {}
        }}}"#;
        let (out, diags) = convert(json);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].severity.is_warning());
        assert!(out.connectors.is_empty());
    }

    #[test]
    fn bus_slice_is_inferred_for_a_partial_reference() {
        let json = r#"{"modules":{"top":{
            "ports": {
                "a": {"direction":"input","bits":[2,3,4,5]},
                "y": {"direction":"output","bits":[3,4]}
            },
            "cells": {},
            "netnames": {}
        }}}"#;
        let (out, diags) = convert(json);
        assert!(diags.is_empty());
        assert!(out.devices.values().any(|d| matches!(d, Device::BusSlice { .. })));
    }

    #[test]
    fn register_with_clk_and_init_lowers_to_dff() {
        let json = r#"{"modules":{"top":{
            "ports": {
                "clk": {"direction":"input","bits":[2]},
                "d": {"direction":"input","bits":[3]},
                "q": {"direction":"output","bits":[4]}
            },
            "cells": {
                "r1": {
                    "type": "$dff",
                    "parameters": {"WIDTH":1,"CLK_POLARITY":1},
                    "port_directions": {"CLK":"input","D":"input","Q":"output"},
                    "connections": {"CLK":[2],"D":[3],"Q":[4]}
                }
            },
            "netnames": {
                "q": {"hide_name":0,"bits":[4],"attributes":{"init":1}}
            }
        }}}"#;
        let (out, _diags) = convert(json);
        let dff = out.devices.values().find_map(|d| match d {
            Device::Dff { initial, polarity, .. } => Some((initial.clone(), polarity.clone())),
            _ => None,
        });
        let (initial, polarity) = dff.expect("expected a Dff device");
        assert_eq!(initial.as_deref(), Some("1"));
        assert_eq!(polarity.clock, Some(true));
    }
}
