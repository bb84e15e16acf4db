//! Ordered sequences of [`Bit`]s — the unit the converter keys nets on.

use crate::bit::Bit;
use crate::logic::Logic;
use serde::{Deserialize, Serialize};

/// An ordered sequence of bits, LSB at index 0, exactly as the synthesizer's
/// `bits`/`connections` arrays are ordered.
///
/// `BitVector` is used as a hash map key throughout the converter: two
/// vectors are the same net iff they are element-wise equal, regardless of
/// which cell or port produced them. Reference identity is never used.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitVector(Vec<Bit>);

impl BitVector {
    /// Creates a bit vector from its bits, LSB first.
    pub fn new(bits: Vec<Bit>) -> Self {
        Self(bits)
    }

    /// Number of bits in the vector.
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector has no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bit at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Bit> {
        self.0.get(index).copied()
    }

    /// Iterates the bits LSB first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Bit> + '_ {
        self.0.iter().copied()
    }

    /// Slices out `count` bits starting at LSB offset `first`.
    ///
    /// # Panics
    ///
    /// Panics if the requested range exceeds the vector's width.
    pub fn slice(&self, first: usize, count: usize) -> BitVector {
        BitVector(self.0[first..first + count].to_vec())
    }

    /// Splits the vector into `chunk_width`-bit chunks, LSB-first chunk
    /// ordering (chunk 0 holds bits `0..chunk_width`).
    ///
    /// # Panics
    ///
    /// Panics if the width is not an exact multiple of `chunk_width`.
    pub fn chunks(&self, chunk_width: usize) -> Vec<BitVector> {
        assert_eq!(
            self.0.len() % chunk_width,
            0,
            "bit vector width {} is not a multiple of chunk width {chunk_width}",
            self.0.len()
        );
        self.0
            .chunks(chunk_width)
            .map(|c| BitVector(c.to_vec()))
            .collect()
    }

    /// Concatenates `other` after `self` (LSB-first append — `other`
    /// occupies the higher bit positions).
    pub fn concat(mut self, other: &BitVector) -> BitVector {
        self.0.extend_from_slice(&other.0);
        self
    }

    /// Returns `true` if every bit is a literal constant.
    pub fn is_all_const(&self) -> bool {
        self.0.iter().all(|b| b.is_const())
    }

    /// Returns `true` if every bit is the literal `0`.
    pub fn is_all_zero_literal(&self) -> bool {
        self.0
            .iter()
            .all(|b| matches!(b, Bit::Literal(Logic::Zero)))
    }

    /// If every bit is a literal, renders the vector MSB-first as a string
    /// of `0`/`1`/`x`/`z` characters (the wire-format payload for a
    /// `Constant` device or a register initial value).
    pub fn to_const_string(&self) -> Option<String> {
        if !self.is_all_const() {
            return None;
        }
        Some(self.0.iter().rev().map(|b| b.to_string()).collect())
    }

    /// The length of the trailing run (from the MSB end) of literal `0`
    /// bits, used by zero-extension inference.
    pub fn trailing_zero_run(&self) -> usize {
        self.0
            .iter()
            .rev()
            .take_while(|b| matches!(b, Bit::Literal(Logic::Zero)))
            .count()
    }
}

impl FromIterator<Bit> for BitVector {
    fn from_iter<T: IntoIterator<Item = Bit>>(iter: T) -> Self {
        BitVector(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(bits: &[Bit]) -> BitVector {
        BitVector::new(bits.to_vec())
    }

    #[test]
    fn width_and_get() {
        let bv = v(&[Bit::Net(1), Bit::Literal(Logic::Zero)]);
        assert_eq!(bv.width(), 2);
        assert_eq!(bv.get(0), Some(Bit::Net(1)));
        assert_eq!(bv.get(5), None);
    }

    #[test]
    fn slice_and_chunks() {
        let bv = v(&[
            Bit::Net(1),
            Bit::Net(2),
            Bit::Net(3),
            Bit::Net(4),
        ]);
        assert_eq!(bv.slice(1, 2), v(&[Bit::Net(2), Bit::Net(3)]));
        let chunks = bv.chunks(2);
        assert_eq!(chunks, vec![v(&[Bit::Net(1), Bit::Net(2)]), v(&[Bit::Net(3), Bit::Net(4)])]);
    }

    #[test]
    fn concat_appends_at_high_end() {
        let a = v(&[Bit::Net(1)]);
        let b = v(&[Bit::Net(2)]);
        assert_eq!(a.concat(&b), v(&[Bit::Net(1), Bit::Net(2)]));
    }

    #[test]
    fn is_all_const() {
        let bv = v(&[Bit::Literal(Logic::Zero), Bit::Literal(Logic::One)]);
        assert!(bv.is_all_const());
        let mixed = v(&[Bit::Literal(Logic::Zero), Bit::Net(9)]);
        assert!(!mixed.is_all_const());
    }

    #[test]
    fn to_const_string_is_msb_first() {
        let bv = v(&[Bit::Literal(Logic::One), Bit::Literal(Logic::Zero), Bit::Literal(Logic::X)]);
        assert_eq!(bv.to_const_string().as_deref(), Some("x01"));
    }

    #[test]
    fn to_const_string_none_if_not_all_const() {
        let bv = v(&[Bit::Net(4)]);
        assert_eq!(bv.to_const_string(), None);
    }

    #[test]
    fn trailing_zero_run() {
        let bv = v(&[
            Bit::Net(1),
            Bit::Literal(Logic::Zero),
            Bit::Literal(Logic::Zero),
        ]);
        assert_eq!(bv.trailing_zero_run(), 2);
        let none = v(&[Bit::Net(1), Bit::Net(2)]);
        assert_eq!(none.trailing_zero_run(), 0);
        let all = v(&[Bit::Literal(Logic::Zero); 3]);
        assert_eq!(all.trailing_zero_run(), 3);
    }

    #[test]
    fn serde_roundtrip() {
        let bv = v(&[Bit::Net(3), Bit::Literal(Logic::X)]);
        let json = serde_json::to_string(&bv).unwrap();
        let back: BitVector = serde_json::from_str(&json).unwrap();
        assert_eq!(bv, back);
    }
}
