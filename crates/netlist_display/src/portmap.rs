//! Builds, for every known cell type and every user-defined module, a
//! mapping from the synthesizer's port names to display-level port names.

use indexmap::IndexMap;
use netlist_ir::SynthNetlist;

/// Maps a cell type's synthesizer port names to display port names.
pub type PortMap = IndexMap<String, String>;

/// `cell type -> port map`, for every primitive the core recognizes and
/// every user-defined module in the design.
pub type PortMapTable = IndexMap<String, PortMap>;

fn map_of(pairs: &[(&str, &str)]) -> PortMap {
    pairs.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
}

const UNARY: &[&str] = &[
    "$not", "$pos", "$neg", "$reduce_and", "$reduce_or", "$reduce_xor", "$reduce_xnor",
    "$reduce_bool", "$logic_not",
];

const BINARY: &[&str] = &[
    "$and", "$or", "$xor", "$xnor", "$add", "$sub", "$mul", "$div", "$mod", "$pow", "$shl",
    "$shr", "$sshl", "$sshr", "$shift", "$shiftx", "$lt", "$le", "$eq", "$ne", "$gt", "$ge",
    "$eqx", "$nex", "$logic_and", "$logic_or",
];

const REGISTERS: &[&str] = &[
    "$dff", "$dffe", "$adff", "$adffe", "$sdff", "$sdffe", "$sdffce", "$dlatch", "$adlatch",
    "$dffsr", "$dffsre", "$aldff", "$aldffe", "$sr",
];

/// Builds the full port-map table for a design: the fixed table for every
/// primitive cell type the core recognizes, plus an identity mapping for
/// every user-defined module.
pub fn build_port_map_table(netlist: &SynthNetlist) -> PortMapTable {
    let mut table = PortMapTable::new();

    for ty in UNARY {
        table.insert(ty.to_string(), map_of(&[("A", "in"), ("Y", "out")]));
    }
    for ty in BINARY {
        table.insert(
            ty.to_string(),
            map_of(&[("A", "in1"), ("B", "in2"), ("Y", "out")]),
        );
    }
    table.insert(
        "$mux".to_string(),
        map_of(&[("A", "in0"), ("B", "in1"), ("S", "sel"), ("Y", "out")]),
    );
    for ty in REGISTERS {
        table.insert(
            ty.to_string(),
            map_of(&[
                ("CLK", "clk"),
                ("D", "in"),
                ("Q", "out"),
                ("EN", "en"),
                ("ARST", "arst"),
                ("SRST", "srst"),
                ("SET", "set"),
                ("CLR", "clr"),
                ("ALOAD", "aload"),
                ("AD", "ain"),
            ]),
        );
    }
    table.insert(
        "$fsm".to_string(),
        map_of(&[
            ("ARST", "arst"),
            ("CLK", "clk"),
            ("CTRL_IN", "in"),
            ("CTRL_OUT", "out"),
        ]),
    );

    for (name, module) in &netlist.modules {
        let identity: PortMap = module.ports.keys().map(|p| (p.clone(), p.clone())).collect();
        table.insert(name.clone(), identity);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlist_ir::SynthNetlist;

    fn empty_netlist() -> SynthNetlist {
        serde_json::from_str(r#"{"modules":{}}"#).unwrap()
    }

    #[test]
    fn unary_cells_map_a_to_in() {
        let table = build_port_map_table(&empty_netlist());
        assert_eq!(table["$not"]["A"], "in");
        assert_eq!(table["$not"]["Y"], "out");
    }

    #[test]
    fn binary_cells_map_both_operands() {
        let table = build_port_map_table(&empty_netlist());
        assert_eq!(table["$and"]["A"], "in1");
        assert_eq!(table["$and"]["B"], "in2");
    }

    #[test]
    fn register_cells_include_optional_controls() {
        let table = build_port_map_table(&empty_netlist());
        assert_eq!(table["$adff"]["CLK"], "clk");
        assert_eq!(table["$adff"]["ARST"], "arst");
        assert_eq!(table["$adff"]["D"], "in");
    }

    #[test]
    fn user_module_gets_identity_mapping() {
        let netlist: SynthNetlist = serde_json::from_str(
            r#"{"modules":{"sub":{"ports":{"a":{"direction":"input","bits":[2]}}}}}"#,
        )
        .unwrap();
        let table = build_port_map_table(&netlist);
        assert_eq!(table["sub"]["a"], "a");
    }

    #[test]
    fn memory_and_pmux_are_not_listed() {
        let table = build_port_map_table(&empty_netlist());
        assert!(!table.contains_key("$mem"));
        assert!(!table.contains_key("$mem_v2"));
        assert!(!table.contains_key("$pmux"));
        assert!(!table.contains_key("$lut"));
    }
}
