//! Per-cell-class lowering: turns one synthesizer cell into one display
//! device plus its wiring, following the parameter-to-attribute rules for
//! each primitive family.

use crate::connector::Endpoint;
use crate::convert::ModuleConverter;
use crate::device::*;
use crate::errors::{ConvertError, ConvertResult};
use netlist_common::{BitVector, ParamValue};
use netlist_ir::SynthCell;

fn conn(cell: &SynthCell, name: &str) -> BitVector {
    cell.connections.get(name).cloned().unwrap_or_default()
}

fn p_u(cell: &SynthCell, key: &str) -> usize {
    cell.parameters.get(key).and_then(|v| v.as_u64()).unwrap_or(0) as usize
}

fn p_bool(cell: &SynthCell, key: &str) -> bool {
    cell.parameters.get(key).map(|v| v.as_bool()).unwrap_or(false)
}

/// Reads bit `index` (port index, LSB = port 0) out of a bit-packed
/// per-port polarity/flag parameter, if the cell declares it.
fn bit_of(cell: &SynthCell, key: &str, index: usize) -> Option<bool> {
    let v = cell.parameters.get(key)?;
    let s = v.to_binary_string(index + 1);
    let ch = s.chars().rev().nth(index)?;
    Some(ch == '1')
}

/// Reads the `width`-bit word at `index` (LSB = port 0) out of a bit-packed
/// per-port value parameter (e.g. `RD_ARST_VALUE`), if the cell declares it.
fn word_of(cell: &SynthCell, key: &str, width: usize, index: usize) -> Option<String> {
    let v = cell.parameters.get(key)?;
    let s = v.to_binary_string((index + 1) * width);
    let start = s.len() - width;
    Some(s[start..].to_string())
}

/// Builds a `StructuralViolation` for the cell currently being lowered.
fn violation(cell_name: &str, cell_type: &str, detail: impl Into<String>) -> ConvertError {
    ConvertError::StructuralViolation {
        cell_type: cell_type.to_string(),
        cell_name: cell_name.to_string(),
        detail: detail.into(),
    }
}

/// Extends a device's narrow logical output (e.g. a 1-bit comparison or
/// reduction result) to the cell's declared output width, inserting a
/// `ZeroExtend` device only when padding is actually required.
fn extend_output(
    conv: &mut ModuleConverter,
    narrow: &BitVector,
    full: &BitVector,
    device_id: &str,
    port: &str,
) -> ConvertResult<()> {
    conv.register_primary_output(narrow, device_id, port)?;
    if full.width() > narrow.width() {
        let ext_id = conv.fresh_id();
        conv.insert_device(
            ext_id.clone(),
            Device::ZeroExtend {
                extend: ExtendBits {
                    input: narrow.width(),
                    output: full.width(),
                },
            },
        );
        conv.set_source(full, Endpoint::new(&ext_id, "out"))?;
        conv.add_target(narrow, Endpoint::new(&ext_id, "in"));
    }
    Ok(())
}

fn reduce_to_1bit(conv: &mut ModuleConverter, v: &BitVector) -> ConvertResult<BitVector> {
    if v.width() <= 1 {
        return Ok(v.clone());
    }
    let id = conv.fresh_id();
    conv.insert_device(id.clone(), Device::OrReduce { bits: v.width() });
    conv.add_target(v, Endpoint::new(&id, "in"));
    let out_vec = BitVector::new(vec![conv.fresh_bit()]);
    conv.register_primary_output(&out_vec, &id, "out")?;
    Ok(out_vec)
}

/// Dispatches one primitive cell to its lowering routine.
pub(crate) fn lower_primitive(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
) -> ConvertResult<()> {
    match cell.cell_type.as_str() {
        "$not" => lower_not(conv, device_id, cell_name, cell),
        "$pos" => lower_unary_arith(conv, device_id, cell_name, cell, false),
        "$neg" => lower_unary_arith(conv, device_id, cell_name, cell, true),
        "$reduce_and" => lower_reduce(conv, device_id, cell_name, cell, ReduceKind::And),
        "$reduce_or" => lower_reduce(conv, device_id, cell_name, cell, ReduceKind::Or),
        "$reduce_xor" => lower_reduce(conv, device_id, cell_name, cell, ReduceKind::Xor),
        "$reduce_xnor" => lower_reduce(conv, device_id, cell_name, cell, ReduceKind::Xnor),
        "$reduce_bool" => lower_reduce(conv, device_id, cell_name, cell, ReduceKind::Bool),
        "$logic_not" => lower_reduce(conv, device_id, cell_name, cell, ReduceKind::LogicNot),
        "$and" => lower_bitwise_binary(conv, device_id, cell_name, cell, |b| Device::And { bits: b }),
        "$or" => lower_bitwise_binary(conv, device_id, cell_name, cell, |b| Device::Or { bits: b }),
        "$xor" => lower_bitwise_binary(conv, device_id, cell_name, cell, |b| Device::Xor { bits: b }),
        "$xnor" => lower_bitwise_binary(conv, device_id, cell_name, cell, |b| Device::Xnor { bits: b }),
        "$add" => lower_binary_arith(conv, device_id, cell_name, cell, |bits, signed| Device::Addition { bits, signed }),
        "$sub" => lower_binary_arith(conv, device_id, cell_name, cell, |bits, signed| Device::Subtraction { bits, signed }),
        "$mul" => lower_binary_arith(conv, device_id, cell_name, cell, |bits, signed| Device::Multiplication { bits, signed }),
        "$div" => lower_binary_arith(conv, device_id, cell_name, cell, |bits, signed| Device::Division { bits, signed }),
        "$mod" => lower_binary_arith(conv, device_id, cell_name, cell, |bits, signed| Device::Modulo { bits, signed }),
        "$pow" => lower_binary_arith(conv, device_id, cell_name, cell, |bits, signed| Device::Power { bits, signed }),
        "$eq" | "$eqx" => lower_compare(conv, device_id, cell_name, cell, |bits, signed| Device::Eq { bits, signed }),
        "$ne" | "$nex" => lower_compare(conv, device_id, cell_name, cell, |bits, signed| Device::Ne { bits, signed }),
        "$lt" => lower_compare(conv, device_id, cell_name, cell, |bits, signed| Device::Lt { bits, signed }),
        "$le" => lower_compare(conv, device_id, cell_name, cell, |bits, signed| Device::Le { bits, signed }),
        "$gt" => lower_compare(conv, device_id, cell_name, cell, |bits, signed| Device::Gt { bits, signed }),
        "$ge" => lower_compare(conv, device_id, cell_name, cell, |bits, signed| Device::Ge { bits, signed }),
        "$shl" | "$shr" | "$sshl" | "$sshr" | "$shift" | "$shiftx" => {
            lower_shift(conv, device_id, cell_name, cell, cell.cell_type.as_str())
        }
        "$logic_and" => lower_logic_and_or(conv, device_id, cell_name, cell, true),
        "$logic_or" => lower_logic_and_or(conv, device_id, cell_name, cell, false),
        "$mux" => lower_mux(conv, device_id, cell_name, cell),
        "$pmux" => lower_pmux(conv, device_id, cell_name, cell),
        "$dff" | "$dffe" | "$adff" | "$adffe" | "$sdff" | "$sdffe" | "$sdffce" | "$dlatch"
        | "$adlatch" | "$dffsr" | "$dffsre" | "$aldff" | "$aldffe" | "$sr" => {
            lower_register(conv, device_id, cell_name, cell, cell.cell_type.as_str())
        }
        "$mem" | "$mem_v2" => lower_memory(conv, device_id, cell_name, cell),
        "$lut" => lower_lut(conv, device_id, cell_name, cell),
        "$fsm" => lower_fsm(conv, device_id, cell_name, cell),
        other => Err(ConvertError::UnknownCellType {
            cell_type: other.to_string(),
        }),
    }
}

fn lower_unary_arith(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    negate: bool,
) -> ConvertResult<()> {
    let signed = p_bool(cell, "A_SIGNED");
    let a = conn(cell, "A");
    let y = conn(cell, "Y");
    if y.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "Y has zero width"));
    }
    let bits = ArithBits {
        input: a.width(),
        out: y.width(),
    };
    let device = if negate {
        Device::Negation { bits, signed }
    } else {
        Device::UnaryPlus { bits, signed }
    };
    conv.insert_device(device_id.to_string(), device);
    conv.add_target(&a, Endpoint::new(device_id, "in"));
    conv.register_primary_output(&y, device_id, "out")
}

fn lower_not(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
) -> ConvertResult<()> {
    let signed = p_bool(cell, "A_SIGNED");
    let a = conn(cell, "A");
    let y = conn(cell, "Y");
    if y.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "Y has zero width"));
    }
    let padded = conv.pad_input(&a, y.width(), signed);
    conv.insert_device(device_id.to_string(), Device::Not { bits: y.width() });
    conv.add_target(&padded, Endpoint::new(device_id, "in"));
    conv.register_primary_output(&y, device_id, "out")
}

enum ReduceKind {
    And,
    Or,
    Xor,
    Xnor,
    Bool,
    LogicNot,
}

fn lower_reduce(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    kind: ReduceKind,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let y = conn(cell, "Y");
    if y.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "Y has zero width"));
    }
    let width = a.width().max(1);
    let device = if width == 1 {
        match kind {
            ReduceKind::Xnor | ReduceKind::LogicNot => Device::Not { bits: 1 },
            _ => Device::Repeater { bits: 1 },
        }
    } else {
        match kind {
            ReduceKind::And => Device::AndReduce { bits: width },
            ReduceKind::Or | ReduceKind::Bool => Device::OrReduce { bits: width },
            ReduceKind::Xor => Device::XorReduce { bits: width },
            ReduceKind::Xnor => Device::XnorReduce { bits: width },
            ReduceKind::LogicNot => Device::NorReduce { bits: width },
        }
    };
    conv.insert_device(device_id.to_string(), device);
    conv.add_target(&a, Endpoint::new(device_id, "in"));
    let y1 = y.slice(0, 1.min(y.width()));
    extend_output(conv, &y1, &y, device_id, "out")
}

fn lower_bitwise_binary(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    make: impl FnOnce(usize) -> Device,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let b = conn(cell, "B");
    let y = conn(cell, "Y");
    if y.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "Y has zero width"));
    }
    let pa = conv.pad_input(&a, y.width(), p_bool(cell, "A_SIGNED"));
    let pb = conv.pad_input(&b, y.width(), p_bool(cell, "B_SIGNED"));
    conv.insert_device(device_id.to_string(), make(y.width()));
    conv.add_target(&pa, Endpoint::new(device_id, "in1"));
    conv.add_target(&pb, Endpoint::new(device_id, "in2"));
    conv.register_primary_output(&y, device_id, "out")
}

fn lower_binary_arith(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    make: impl FnOnce(BinArithBits, SignedPair) -> Device,
) -> ConvertResult<()> {
    let in1 = conn(cell, "A");
    let in2 = conn(cell, "B");
    let out = conn(cell, "Y");
    if out.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "Y has zero width"));
    }
    let signed = SignedPair {
        in1: p_bool(cell, "A_SIGNED"),
        in2: p_bool(cell, "B_SIGNED"),
    };
    let bits = BinArithBits {
        in1: in1.width(),
        in2: in2.width(),
        out: out.width(),
    };
    conv.insert_device(device_id.to_string(), make(bits, signed));
    conv.add_target(&in1, Endpoint::new(device_id, "in1"));
    conv.add_target(&in2, Endpoint::new(device_id, "in2"));
    conv.register_primary_output(&out, device_id, "out")
}

fn lower_compare(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    make: impl FnOnce(CompareBits, SignedPair) -> Device,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let b = conn(cell, "B");
    let y = conn(cell, "Y");
    if a.width() == 0 || b.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "A/B must not be zero width"));
    }
    let signed = SignedPair {
        in1: p_bool(cell, "A_SIGNED"),
        in2: p_bool(cell, "B_SIGNED"),
    };
    let bits = CompareBits {
        in1: a.width(),
        in2: b.width(),
    };
    conv.insert_device(device_id.to_string(), make(bits, signed));
    conv.add_target(&a, Endpoint::new(device_id, "in1"));
    conv.add_target(&b, Endpoint::new(device_id, "in2"));
    let y1 = y.slice(0, 1.min(y.width()));
    extend_output(conv, &y1, &y, device_id, "out")
}

fn lower_shift(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    cell_type: &str,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let b = conn(cell, "B");
    let y = conn(cell, "Y");
    if y.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "Y has zero width"));
    }
    let a_signed = p_bool(cell, "A_SIGNED");

    let is_left = matches!(cell_type, "$shl" | "$sshl");
    let in2_signed = matches!(cell_type, "$shift" | "$shiftx");
    let fillx = cell_type == "$shiftx";
    let out_signed = matches!(cell_type, "$sshl" | "$sshr") && a_signed;

    let bits = BinArithBits {
        in1: a.width(),
        in2: b.width(),
        out: y.width(),
    };
    let signed = ShiftSigned {
        in2: in2_signed,
        out: out_signed,
    };
    let device = if is_left {
        Device::ShiftLeft { bits, signed, fillx }
    } else {
        Device::ShiftRight { bits, signed, fillx }
    };
    conv.insert_device(device_id.to_string(), device);
    conv.add_target(&a, Endpoint::new(device_id, "in1"));
    conv.add_target(&b, Endpoint::new(device_id, "in2"));
    conv.register_primary_output(&y, device_id, "out")
}

fn lower_logic_and_or(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    is_and: bool,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let b = conn(cell, "B");
    let y = conn(cell, "Y");
    if a.width() == 0 || b.width() == 0 {
        return Err(violation(cell_name, &cell.cell_type, "A/B must not be zero width"));
    }
    let a1 = reduce_to_1bit(conv, &a)?;
    let b1 = reduce_to_1bit(conv, &b)?;
    conv.insert_device(
        device_id.to_string(),
        if is_and {
            Device::And { bits: 1 }
        } else {
            Device::Or { bits: 1 }
        },
    );
    conv.add_target(&a1, Endpoint::new(device_id, "in1"));
    conv.add_target(&b1, Endpoint::new(device_id, "in2"));
    let y1 = y.slice(0, 1.min(y.width()));
    extend_output(conv, &y1, &y, device_id, "out")
}

fn lower_mux(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let b = conn(cell, "B");
    let s = conn(cell, "S");
    let y = conn(cell, "Y");
    if s.width() != 1 {
        return Err(violation(cell_name, &cell.cell_type, format!("S width must be 1, got {}", s.width())));
    }
    if a.width() != b.width() || a.width() != y.width() {
        return Err(violation(
            cell_name,
            &cell.cell_type,
            format!("A/B/Y widths must match: A={} B={} Y={}", a.width(), b.width(), y.width()),
        ));
    }
    conv.insert_device(
        device_id.to_string(),
        Device::Mux {
            bits: MuxBits {
                input: a.width(),
                sel: s.width(),
            },
        },
    );
    conv.wire_mapped(device_id, cell)
}

fn lower_pmux(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let b = conn(cell, "B");
    let s = conn(cell, "S");
    let y = conn(cell, "Y");
    let w = a.width();

    if y.width() != w {
        return Err(ConvertError::StructuralViolation {
            cell_type: "$pmux".to_string(),
            cell_name: cell_name.to_string(),
            detail: format!("A width {w} does not match Y width {}", y.width()),
        });
    }
    if w == 0 || b.width() % w != 0 {
        return Err(ConvertError::StructuralViolation {
            cell_type: "$pmux".to_string(),
            cell_name: cell_name.to_string(),
            detail: format!("B width {} is not a multiple of A width {w}", b.width()),
        });
    }

    conv.insert_device(
        device_id.to_string(),
        Device::Mux1Hot {
            bits: MuxBits {
                input: w,
                sel: s.width(),
            },
        },
    );
    conv.add_target(&a, Endpoint::new(device_id, "in0"));
    let reversed_sel: BitVector = s.iter().rev().collect();
    conv.add_target(&reversed_sel, Endpoint::new(device_id, "sel"));

    let chunks = b.chunks(w);
    for (k, chunk) in chunks.iter().rev().enumerate() {
        conv.add_target(chunk, Endpoint::new(device_id, format!("in{}", k + 1)));
    }
    conv.register_primary_output(&y, device_id, "out")
}

fn lower_register(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
    cell_type: &str,
) -> ConvertResult<()> {
    let q = conn(cell, "Q");
    let d = conn(cell, "D");
    let width = q.width().max(p_u(cell, "WIDTH"));
    if d.width() != 0 && d.width() != width {
        return Err(violation(
            cell_name,
            &cell.cell_type,
            format!("D width {} does not match Q width {width}", d.width()),
        ));
    }

    let present = |key: &str| cell.connections.contains_key(key);
    for ctrl in ["CLK", "EN", "ARST", "SRST", "SET", "CLR", "ALOAD"] {
        if present(ctrl) && conn(cell, ctrl).width() != 1 {
            return Err(violation(
                cell_name,
                &cell.cell_type,
                format!("{ctrl} must be a single control bit"),
            ));
        }
    }
    let polarity = DffPolarity {
        clock: present("CLK").then(|| p_bool(cell, "CLK_POLARITY")),
        enable: present("EN").then(|| p_bool(cell, "EN_POLARITY")),
        arst: present("ARST").then(|| p_bool(cell, "ARST_POLARITY")),
        srst: present("SRST").then(|| p_bool(cell, "SRST_POLARITY")),
        set: present("SET").then(|| p_bool(cell, "SET_POLARITY")),
        clr: present("CLR").then(|| p_bool(cell, "CLR_POLARITY")),
        aload: present("ALOAD").then(|| p_bool(cell, "ALOAD_POLARITY")),
    };

    let arst_value = polarity
        .arst
        .and(cell.parameters.get("ARST_VALUE"))
        .map(|v| v.to_binary_string(width));
    let srst_value = polarity
        .srst
        .and(cell.parameters.get("SRST_VALUE"))
        .map(|v| v.to_binary_string(width));

    let initial = conv.lookup_init(&q);

    let device = Device::Dff {
        bits: width,
        polarity,
        initial,
        arst_value,
        srst_value,
        enable_srst: cell_type == "$sdffce",
        no_data: cell_type == "$sr",
    };
    conv.insert_device(device_id.to_string(), device);
    conv.wire_mapped(device_id, cell)
}

/// Slices the raw `INIT` parameter into `words` chunks of `width` bits each,
/// reversing every word for MSB-first output and padding any word past the
/// end of the raw string with its trailing `0`/`x` character.
fn decode_mem_init(cell: &SynthCell, words: usize, width: usize) -> Option<String> {
    let v = cell.parameters.get("INIT")?;
    let raw = match v {
        ParamValue::Str(s) => s.clone(),
        ParamValue::Int(n) => format!("{:b}", (*n).max(0)),
    };
    if raw.is_empty() {
        return None;
    }
    let pad_char = raw.chars().next_back().unwrap_or('0');
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(words * width);
    for w in 0..words {
        let start = w * width;
        let mut word: Vec<char> = (0..width)
            .map(|i| chars.get(start + i).copied().unwrap_or(pad_char))
            .collect();
        word.reverse();
        out.extend(word);
    }
    Some(out)
}

fn lower_memory(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
) -> ConvertResult<()> {
    let width = p_u(cell, "WIDTH");
    let abits = p_u(cell, "ABITS");
    let words = p_u(cell, "SIZE");
    let offset = p_u(cell, "OFFSET");
    let rd_ports = p_u(cell, "RD_PORTS");
    let wr_ports = p_u(cell, "WR_PORTS");
    if width == 0 || abits == 0 {
        return Err(violation(cell_name, &cell.cell_type, "WIDTH and ABITS must be nonzero"));
    }
    let memdata = decode_mem_init(cell, words, width);

    let rd_addr = conn(cell, "RD_ADDR");
    let rd_data = conn(cell, "RD_DATA");
    let rd_clk = conn(cell, "RD_CLK");
    let rd_en = conn(cell, "RD_EN");
    let rd_arst = conn(cell, "RD_ARST");
    let rd_srst = conn(cell, "RD_SRST");

    let mut rdports = Vec::new();
    for k in 0..rd_ports {
        if rd_addr.width() >= (k + 1) * abits {
            let addr = rd_addr.slice(k * abits, abits);
            conv.add_target(&addr, Endpoint::new(device_id, format!("rd{k}addr")));
        }
        if rd_data.width() >= (k + 1) * width {
            let data = rd_data.slice(k * width, width);
            conv.register_primary_output(&data, device_id, &format!("rd{k}data"))?;
        }
        let mut port = MemReadPort::default();
        if rd_clk.width() > k {
            let bit = rd_clk.slice(k, 1);
            conv.add_target(&bit, Endpoint::new(device_id, format!("rd{k}clk")));
            port.clock_polarity = bit_of(cell, "RD_CLK_POLARITY", k);
        }
        if rd_en.width() > k {
            let bit = rd_en.slice(k, 1);
            conv.add_target(&bit, Endpoint::new(device_id, format!("rd{k}en")));
            port.enable_polarity = bit_of(cell, "RD_EN_POLARITY", k);
        }
        if rd_arst.width() > k {
            let bit = rd_arst.slice(k, 1);
            conv.add_target(&bit, Endpoint::new(device_id, format!("rd{k}arst")));
            port.arst_polarity = bit_of(cell, "RD_ARST_POLARITY", k);
        }
        if rd_srst.width() > k {
            let bit = rd_srst.slice(k, 1);
            conv.add_target(&bit, Endpoint::new(device_id, format!("rd{k}srst")));
            port.srst_polarity = bit_of(cell, "RD_SRST_POLARITY", k);
        }
        port.transparent = bit_of(cell, "RD_TRANSPARENT", k);
        port.init_value = word_of(cell, "RD_INIT_VALUE", width, k);
        port.arst_value = word_of(cell, "RD_ARST_VALUE", width, k);
        port.srst_value = word_of(cell, "RD_SRST_VALUE", width, k);
        rdports.push(port);
    }

    let wr_addr = conn(cell, "WR_ADDR");
    let wr_data = conn(cell, "WR_DATA");
    let wr_clk = conn(cell, "WR_CLK");
    let wr_en = conn(cell, "WR_EN");

    let mut wrports = Vec::new();
    for k in 0..wr_ports {
        if wr_addr.width() >= (k + 1) * abits {
            let addr = wr_addr.slice(k * abits, abits);
            conv.add_target(&addr, Endpoint::new(device_id, format!("wr{k}addr")));
        }
        if wr_data.width() >= (k + 1) * width {
            let data = wr_data.slice(k * width, width);
            conv.add_target(&data, Endpoint::new(device_id, format!("wr{k}data")));
        }
        let mut port = MemWritePort::default();
        if wr_clk.width() > k {
            let bit = wr_clk.slice(k, 1);
            conv.add_target(&bit, Endpoint::new(device_id, format!("wr{k}clk")));
            port.clock_polarity = bit_of(cell, "WR_CLK_POLARITY", k);
        }
        if wr_en.width() > k * width {
            let bit = wr_en.slice(k * width, 1);
            conv.add_target(&bit, Endpoint::new(device_id, format!("wr{k}en")));
            port.enable_polarity = bit_of(cell, "WR_EN_POLARITY", k);
        }
        port.transparent = bit_of(cell, "WR_TRANSPARENT", k);
        port.collision = bit_of(cell, "WR_COLLISION", k);
        wrports.push(port);
    }

    conv.insert_device(
        device_id.to_string(),
        Device::Memory {
            bits: width,
            abits,
            words,
            offset,
            memdata,
            rdports,
            wrports,
        },
    );
    Ok(())
}

fn lower_lut(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
) -> ConvertResult<()> {
    let a = conn(cell, "A");
    let y = conn(cell, "Y");
    if y.width() != 1 {
        return Err(violation(cell_name, &cell.cell_type, format!("Y width must be 1, got {}", y.width())));
    }
    let abits = a.width();
    let words = 1usize << abits.min(20);
    let memdata = cell.parameters.get("LUT").map(|v| {
        let raw = v.to_binary_string(words);
        raw.chars().rev().collect::<String>()
    });
    conv.insert_device(
        device_id.to_string(),
        Device::Memory {
            bits: 1,
            abits,
            words,
            offset: 0,
            memdata,
            rdports: vec![MemReadPort::default()],
            wrports: Vec::new(),
        },
    );
    conv.add_target(&a, Endpoint::new(device_id, "rd0addr"));
    conv.register_primary_output(&y, device_id, "rd0data")
}

fn lower_fsm(
    conv: &mut ModuleConverter,
    device_id: &str,
    cell_name: &str,
    cell: &SynthCell,
) -> ConvertResult<()> {
    let ctrl_in = conn(cell, "CTRL_IN");
    let ctrl_out = conn(cell, "CTRL_OUT");
    let ctrl_in_width = p_u(cell, "CTRL_IN_WIDTH");
    let ctrl_out_width = p_u(cell, "CTRL_OUT_WIDTH");
    if ctrl_in_width != 0 && ctrl_in.width() != ctrl_in_width {
        return Err(violation(
            cell_name,
            &cell.cell_type,
            format!("CTRL_IN_WIDTH {ctrl_in_width} does not match CTRL_IN connection width {}", ctrl_in.width()),
        ));
    }
    if ctrl_out_width != 0 && ctrl_out.width() != ctrl_out_width {
        return Err(violation(
            cell_name,
            &cell.cell_type,
            format!("CTRL_OUT_WIDTH {ctrl_out_width} does not match CTRL_OUT connection width {}", ctrl_out.width()),
        ));
    }
    let wirename = cell
        .parameters
        .get("NAME")
        .and_then(|v| match v {
            ParamValue::Str(s) => Some(s.clone()),
            ParamValue::Int(_) => None,
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| cell_name.to_string());
    let state_num = p_u(cell, "STATE_NUM");
    let state_bits = p_u(cell, "STATE_NUM_LOG2").max(1);
    let trans_num = p_u(cell, "TRANS_NUM");
    let init_state = p_u(cell, "STATE_RST");
    let clock_polarity = p_bool(cell, "CLK_POLARITY");
    let arst_present = cell.connections.contains_key("ARST");
    let arst_polarity = p_bool(cell, "ARST_POLARITY");

    let row_width = 2 * state_bits + ctrl_in.width() + ctrl_out.width();
    let raw = cell
        .parameters
        .get("TRANS_TABLE")
        .map(|v| v.to_binary_string(row_width * trans_num))
        .unwrap_or_default();

    let mut trans_table = Vec::with_capacity(trans_num);
    for i in 0..trans_num {
        let start = i * row_width;
        let Some(row) = raw.get(start..start + row_width) else {
            break;
        };
        let (state_in_s, rest) = row.split_at(state_bits);
        let (ctrl_in_s, rest2) = rest.split_at(ctrl_in.width());
        let (state_out_s, ctrl_out_s) = rest2.split_at(state_bits);
        trans_table.push(FsmTransition {
            state_in: u64::from_str_radix(state_in_s, 2).unwrap_or(0),
            ctrl_in: ctrl_in_s.replace('-', "x"),
            state_out: u64::from_str_radix(state_out_s, 2).unwrap_or(0),
            ctrl_out: ctrl_out_s.to_string(),
        });
    }

    conv.insert_device(
        device_id.to_string(),
        Device::FSM {
            wirename,
            bits: FsmBits {
                input: ctrl_in.width(),
                out: ctrl_out.width(),
            },
            polarity: FsmPolarity {
                clock: clock_polarity,
                arst: arst_present && arst_polarity,
            },
            states: state_num,
            init_state,
            trans_table,
        },
    );
    conv.wire_mapped(device_id, cell)
}
