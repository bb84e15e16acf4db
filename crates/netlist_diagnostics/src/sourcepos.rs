//! Human-readable source positions recovered from a cell's or net's `src`
//! attribute.
//!
//! The synthesizer encodes where a cell or net came from in the original
//! HDL as one or more `<file>:<line>.<col>-<line>.<col>` fragments joined by
//! `|` (one fragment per source statement that contributed to the entity
//! after optimization merged them). This module parses that format into
//! structured positions for the output connector's `source_positions` list.

use serde::{Deserialize, Serialize};

/// A single resolved source location: a file path plus a start/end
/// line-and-column range.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SourcePos {
    /// The source file path as written in the `src` attribute.
    pub name: String,
    /// The starting line/column (1-indexed, as the synthesizer emits it).
    pub from: LineCol,
    /// The ending line/column (1-indexed).
    pub to: LineCol,
}

/// A 1-indexed line/column pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LineCol {
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

impl SourcePos {
    /// Parses a `|`-joined `src` attribute string into one [`SourcePos`] per
    /// fragment. Fragments that don't match the expected shape are skipped
    /// rather than treated as fatal — missing or malformed source positions
    /// are silently tolerated.
    pub fn parse_all(raw: &str) -> Vec<SourcePos> {
        raw.split('|').filter_map(Self::parse_one).collect()
    }

    fn parse_one(fragment: &str) -> Option<SourcePos> {
        let (name, range) = fragment.rsplit_once(':')?;
        let (from_str, to_str) = range.split_once('-')?;
        let from = parse_line_col(from_str)?;
        let to = parse_line_col(to_str)?;
        Some(SourcePos {
            name: name.to_string(),
            from,
            to,
        })
    }
}

fn parse_line_col(s: &str) -> Option<LineCol> {
    let (line_str, col_str) = s.split_once('.')?;
    Some(LineCol {
        line: line_str.parse().ok()?,
        column: col_str.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_fragment() {
        let got = SourcePos::parse_all("top.v:10.12-10.17");
        assert_eq!(
            got,
            vec![SourcePos {
                name: "top.v".to_string(),
                from: LineCol { line: 10, column: 12 },
                to: LineCol { line: 10, column: 17 },
            }]
        );
    }

    #[test]
    fn parse_joined_fragments() {
        let got = SourcePos::parse_all("a.v:1.1-1.2|b.v:2.3-2.4");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].name, "a.v");
        assert_eq!(got[1].name, "b.v");
    }

    #[test]
    fn parse_path_with_colons() {
        // Windows-style or drive-letter paths still split on the last ':'.
        let got = SourcePos::parse_all("c:/src/top.v:3.1-3.9");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "c:/src/top.v");
    }

    #[test]
    fn malformed_fragment_is_skipped() {
        let got = SourcePos::parse_all("not-a-position");
        assert!(got.is_empty());
    }

    #[test]
    fn empty_string_yields_no_positions() {
        assert!(SourcePos::parse_all("").is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let pos = SourcePos {
            name: "top.v".to_string(),
            from: LineCol { line: 1, column: 1 },
            to: LineCol { line: 1, column: 5 },
        };
        let json = serde_json::to_string(&pos).unwrap();
        let back: SourcePos = serde_json::from_str(&json).unwrap();
        assert_eq!(pos, back);
    }
}
