//! The output IR's device vocabulary — a closed set of display-level node
//! types, each carrying the attributes a schematic viewer needs to render
//! and simulate it.

use serde::{Deserialize, Serialize};

/// A single device in an output module graph.
///
/// Serializes with an internal `type` tag matching the device's name, so a
/// device value *is* its own wire representation — there is no separate
/// envelope struct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Device {
    /// A module input port, exposed for external driving.
    Input {
        /// The port's display name.
        net: String,
        /// This port's position among the module's ports, in declaration
        /// order.
        order: usize,
        /// Width in bits.
        bits: usize,
    },
    /// A module output port.
    Output {
        /// The port's display name.
        net: String,
        /// Declaration-order index.
        order: usize,
        /// Width in bits.
        bits: usize,
    },
    /// A clocked input, for simulation stepping (UI mapper output).
    Clock {
        /// The port's display name.
        net: String,
        /// Declaration-order index.
        order: usize,
        /// Always 1 for a clock.
        bits: usize,
        /// Propagation delay in simulation time units.
        delay: u32,
    },
    /// A clickable 1-bit input (UI mapper output).
    Button {
        /// The port's display name.
        net: String,
        /// Declaration-order index.
        order: usize,
        /// Always 1.
        bits: usize,
    },
    /// A 1-bit output lamp (UI mapper output).
    Lamp {
        /// The port's display name.
        net: String,
        /// Declaration-order index.
        order: usize,
        /// Always 1.
        bits: usize,
    },
    /// A numeric entry widget (UI mapper output).
    NumEntry {
        /// The port's display name.
        net: String,
        /// Declaration-order index.
        order: usize,
        /// Width in bits.
        bits: usize,
    },
    /// A numeric display widget (UI mapper output).
    NumDisplay {
        /// The port's display name.
        net: String,
        /// Declaration-order index.
        order: usize,
        /// Width in bits.
        bits: usize,
    },
    /// A seven-segment display widget (UI mapper output).
    Display7 {
        /// The port's display name.
        net: String,
        /// Declaration-order index.
        order: usize,
        /// Always 8.
        bits: usize,
    },
    /// A literal constant source.
    Constant {
        /// MSB-first digit string.
        constant: String,
    },
    /// Bitwise NOT.
    Not {
        /// Shared input/output width.
        bits: usize,
    },
    /// Pass-through (degenerate single-bit reduction).
    Repeater {
        /// Shared input/output width.
        bits: usize,
    },
    /// Bitwise AND of two equal-width operands.
    And {
        /// Shared width of in1/in2/out.
        bits: usize,
    },
    /// Bitwise NAND.
    Nand {
        /// Shared width.
        bits: usize,
    },
    /// Bitwise OR.
    Or {
        /// Shared width.
        bits: usize,
    },
    /// Bitwise NOR.
    Nor {
        /// Shared width.
        bits: usize,
    },
    /// Bitwise XOR.
    Xor {
        /// Shared width.
        bits: usize,
    },
    /// Bitwise XNOR.
    Xnor {
        /// Shared width.
        bits: usize,
    },
    /// Reduction AND (one output bit).
    AndReduce {
        /// Input width; output is always 1 bit.
        bits: usize,
    },
    /// Reduction NAND.
    NandReduce {
        /// Input width.
        bits: usize,
    },
    /// Reduction OR.
    OrReduce {
        /// Input width.
        bits: usize,
    },
    /// Reduction NOR.
    NorReduce {
        /// Input width.
        bits: usize,
    },
    /// Reduction XOR.
    XorReduce {
        /// Input width.
        bits: usize,
    },
    /// Reduction XNOR.
    XnorReduce {
        /// Input width.
        bits: usize,
    },
    /// Arithmetic negation.
    Negation {
        /// Input/output widths.
        bits: ArithBits,
        /// Whether the operand is two's-complement signed.
        signed: bool,
    },
    /// Unary plus (identity, sign-aware width change only).
    UnaryPlus {
        /// Input/output widths.
        bits: ArithBits,
        /// Whether the operand is two's-complement signed.
        signed: bool,
    },
    /// Two-operand addition.
    Addition {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Two-operand subtraction.
    Subtraction {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Two-operand multiplication.
    Multiplication {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Two-operand division.
    Division {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Two-operand modulo.
    Modulo {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Two-operand exponentiation.
    Power {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Logical left shift.
    ShiftLeft {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: ShiftSigned,
        /// Whether out-of-range shifts fill with `x`.
        fillx: bool,
    },
    /// Logical/arithmetic right shift.
    ShiftRight {
        /// Operand and result widths.
        bits: BinArithBits,
        /// Per-operand signedness.
        signed: ShiftSigned,
        /// Whether out-of-range shifts fill with `x`.
        fillx: bool,
    },
    /// Less-than comparison.
    Lt {
        /// Operand widths.
        bits: CompareBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Less-or-equal comparison.
    Le {
        /// Operand widths.
        bits: CompareBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Equality comparison.
    Eq {
        /// Operand widths.
        bits: CompareBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Inequality comparison.
    Ne {
        /// Operand widths.
        bits: CompareBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Greater-than comparison.
    Gt {
        /// Operand widths.
        bits: CompareBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Greater-or-equal comparison.
    Ge {
        /// Operand widths.
        bits: CompareBits,
        /// Per-operand signedness.
        signed: SignedPair,
    },
    /// Binary select multiplexer.
    Mux {
        /// Data and select widths.
        bits: MuxBits,
    },
    /// One-hot priority multiplexer.
    Mux1Hot {
        /// Data and select widths.
        bits: MuxBits,
    },
    /// Unified flip-flop/latch/set-reset device.
    Dff {
        /// Data width.
        bits: usize,
        /// Which control inputs are present, and their active polarity.
        polarity: DffPolarity,
        /// Power-on value, if known.
        #[serde(skip_serializing_if = "Option::is_none")]
        initial: Option<String>,
        /// Async-reset value, if the device has an async reset.
        #[serde(skip_serializing_if = "Option::is_none")]
        arst_value: Option<String>,
        /// Sync-reset value, if the device has a sync reset.
        #[serde(skip_serializing_if = "Option::is_none")]
        srst_value: Option<String>,
        /// `sdffce`'s enable-gates-sync-reset behavior.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        enable_srst: bool,
        /// `sr`'s absence of a data input.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        no_data: bool,
    },
    /// A memory with one or more read/write ports.
    Memory {
        /// Data width per word.
        bits: usize,
        /// Address width.
        abits: usize,
        /// Word count.
        words: usize,
        /// Address of the first word.
        offset: usize,
        /// Decoded initial contents, MSB-first per word, if `INIT` was set.
        #[serde(skip_serializing_if = "Option::is_none")]
        memdata: Option<String>,
        /// Read ports, in declaration order.
        rdports: Vec<MemReadPort>,
        /// Write ports, in declaration order.
        wrports: Vec<MemWritePort>,
    },
    /// A finite-state machine with an explicit transition table.
    FSM {
        /// The FSM's original name (from its `NAME` parameter, or its cell
        /// instance name if absent).
        wirename: String,
        /// Control input/output widths.
        bits: FsmBits,
        /// Which control inputs are present and their polarity.
        polarity: FsmPolarity,
        /// Number of states.
        states: usize,
        /// Initial state index.
        init_state: usize,
        /// The transition table.
        trans_table: Vec<FsmTransition>,
    },
    /// Groups several independent signals into one wider bus.
    BusGroup {
        /// Width of each constituent group, in order.
        groups: Vec<usize>,
    },
    /// The inverse of `BusGroup`: splits a bus back into named groups.
    BusUngroup {
        /// Width of each constituent group, in order.
        groups: Vec<usize>,
    },
    /// A contiguous sub-range of a wider bus.
    BusSlice {
        /// The slice bounds.
        slice: Slice,
    },
    /// Pads the unsigned MSB end of a bus with zero bits.
    ZeroExtend {
        /// Input and output widths.
        extend: ExtendBits,
    },
    /// Pads the MSB end of a bus by replicating the sign bit.
    SignExtend {
        /// Input and output widths.
        extend: ExtendBits,
    },
    /// A reference to a user-defined sub-module instance.
    Subcircuit {
        /// The instantiated module's name.
        celltype: String,
    },
}

/// Input/output width pair for a unary arithmetic device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithBits {
    /// Input width.
    #[serde(rename = "in")]
    pub input: usize,
    /// Output width.
    pub out: usize,
}

/// Operand/result widths for a two-operand device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinArithBits {
    /// First operand's width.
    pub in1: usize,
    /// Second operand's width.
    pub in2: usize,
    /// Result width.
    pub out: usize,
}

/// Per-operand signedness for a two-operand device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignedPair {
    /// Whether the first operand is two's-complement signed.
    pub in1: bool,
    /// Whether the second operand is two's-complement signed.
    pub in2: bool,
}

/// Signedness flags specific to shift devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftSigned {
    /// Whether the shift amount is itself signed (`shift`/`shiftx` only).
    pub in2: bool,
    /// Whether the result is sign-extended (`sshl`/`sshr` with a signed
    /// operand only).
    pub out: bool,
}

/// Operand widths for a comparison device (no result width — always 1 bit
/// before zero-extension).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareBits {
    /// First operand's width.
    pub in1: usize,
    /// Second operand's width.
    pub in2: usize,
}

/// Data and select widths for a multiplexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuxBits {
    /// Data input/output width.
    #[serde(rename = "in")]
    pub input: usize,
    /// Select input width.
    pub sel: usize,
}

/// Which control inputs a `Dff` exposes, and their active-level polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DffPolarity {
    /// Clock edge polarity, if the device has a clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<bool>,
    /// Enable active level, if the device has a clock-enable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    /// Async-reset active level, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arst: Option<bool>,
    /// Sync-reset active level, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srst: Option<bool>,
    /// Async-set active level, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<bool>,
    /// Async-clear active level, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clr: Option<bool>,
    /// Async-load active level, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aload: Option<bool>,
}

/// A single memory read port's timing behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemReadPort {
    /// Clock active edge, if the port is clocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_polarity: Option<bool>,
    /// Enable active level, if the port has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_polarity: Option<bool>,
    /// Async-reset active level, if present (`mem_v2` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arst_polarity: Option<bool>,
    /// Sync-reset active level, if present (`mem_v2` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srst_polarity: Option<bool>,
    /// Power-on output value, if present (`mem_v2`'s `RD_INIT_VALUE`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_value: Option<String>,
    /// Output value on async reset, if present (`mem_v2`'s `RD_ARST_VALUE`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arst_value: Option<String>,
    /// Output value on sync reset, if present (`mem_v2`'s `RD_SRST_VALUE`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srst_value: Option<String>,
    /// Whether this read port observes same-cycle writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
}

/// A single memory write port's timing behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemWritePort {
    /// Clock active edge, if the port is clocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_polarity: Option<bool>,
    /// Enable active level, if the port has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_polarity: Option<bool>,
    /// Whether same-cycle reads observe this port's writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    /// Whether this port's writes collide (write wins) with other write
    /// ports targeting the same address in the same cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision: Option<bool>,
}

/// Control input/output widths for a finite-state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsmBits {
    /// Control-input width.
    #[serde(rename = "in")]
    pub input: usize,
    /// Control-output width.
    pub out: usize,
}

/// Which control inputs an `FSM` exposes, and their active level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FsmPolarity {
    /// Clock edge polarity.
    pub clock: bool,
    /// Async-reset active level, if present.
    pub arst: bool,
}

/// One row of an `FSM`'s transition table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsmTransition {
    /// Originating state index.
    pub state_in: u64,
    /// Required control-input pattern (`x` is a don't-care).
    pub ctrl_in: String,
    /// Resulting state index.
    pub state_out: u64,
    /// Emitted control-output pattern.
    pub ctrl_out: String,
}

/// A contiguous sub-range of a wider parent bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// LSB-relative offset of the slice's first bit.
    pub first: usize,
    /// Number of bits in the slice.
    pub count: usize,
    /// Width of the parent bus the slice is taken from.
    pub total: usize,
}

/// Input/output widths for a bus-extension device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendBits {
    /// Input (narrower) width.
    pub input: usize,
    /// Output (wider) width.
    pub output: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_gate_roundtrip() {
        let dev = Device::And { bits: 1 };
        let json = serde_json::to_value(&dev).unwrap();
        assert_eq!(json["type"], "And");
        assert_eq!(json["bits"], 1);
        let back: Device = serde_json::from_value(json).unwrap();
        assert_eq!(dev, back);
    }

    #[test]
    fn dff_omits_absent_optional_fields() {
        let dev = Device::Dff {
            bits: 4,
            polarity: DffPolarity {
                clock: Some(true),
                arst: Some(true),
                ..Default::default()
            },
            initial: None,
            arst_value: Some("0000".into()),
            srst_value: None,
            enable_srst: false,
            no_data: false,
        };
        let json = serde_json::to_value(&dev).unwrap();
        assert!(json.get("initial").is_none());
        assert!(json.get("srst_value").is_none());
        assert!(json.get("enable_srst").is_none());
        assert_eq!(json["arst_value"], "0000");
    }

    #[test]
    fn subcircuit_carries_celltype() {
        let dev = Device::Subcircuit { celltype: "sub".into() };
        let json = serde_json::to_value(&dev).unwrap();
        assert_eq!(json["type"], "Subcircuit");
        assert_eq!(json["celltype"], "sub");
    }
}
