// RnaSeq: an encoded nucleotide sequence.
//
// Each base is stored in two bits, with a NULL slot for ambiguous bases (N).
// T is read as U so DNA input can be used as is.
//
// # Example
//
// ```rust
// use helixblock::sequence::RnaSeq;
// let seq = RnaSeq::new(b"ACGUN").unwrap();
// assert!(seq.are_complementary_with(&seq, 0, 3));
// ```
use crate::error::{HelixError, Result};

pub const ADENINE: u8 = 0b00;
pub const CYTOSINE: u8 = 0b01;
pub const GUANINE: u8 = 0b10;
pub const URACIL: u8 = 0b11;
pub const NULL: u8 = 0b100;
// Marks bytes that are not nucleotides at all.
const INVALID: u8 = 0xFF;

const fn lookup_table() -> [u8; 256] {
    let mut slots = [INVALID; 256];
    slots[b'A' as usize] = ADENINE;
    slots[b'a' as usize] = ADENINE;
    slots[b'C' as usize] = CYTOSINE;
    slots[b'c' as usize] = CYTOSINE;
    slots[b'G' as usize] = GUANINE;
    slots[b'g' as usize] = GUANINE;
    slots[b'U' as usize] = URACIL;
    slots[b'u' as usize] = URACIL;
    slots[b'T' as usize] = URACIL;
    slots[b't' as usize] = URACIL;
    slots[b'N' as usize] = NULL;
    slots[b'n' as usize] = NULL;
    slots
}
const LOOKUP_TABLE: [u8; 256] = lookup_table();

// PAIRING[x << 3 | y] is 1 for Watson-Crick pairs, 2 for wobble pairs.
const fn pairing_table() -> [u8; 64] {
    let mut slots = [0; 64];
    slots[((ADENINE << 3) | URACIL) as usize] = 1;
    slots[((URACIL << 3) | ADENINE) as usize] = 1;
    slots[((CYTOSINE << 3) | GUANINE) as usize] = 1;
    slots[((GUANINE << 3) | CYTOSINE) as usize] = 1;
    slots[((GUANINE << 3) | URACIL) as usize] = 2;
    slots[((URACIL << 3) | GUANINE) as usize] = 2;
    slots
}
const PAIRING: [u8; 64] = pairing_table();

/// Convert an ASCII base into its code. Unknown bytes yield `None`.
pub const fn encode(base: u8) -> Option<u8> {
    match LOOKUP_TABLE[base as usize] {
        INVALID => None,
        code => Some(code),
    }
}

pub fn decode(code: u8) -> u8 {
    match code {
        ADENINE => b'A',
        CYTOSINE => b'C',
        GUANINE => b'G',
        URACIL => b'U',
        _ => b'N',
    }
}

/// True if the two codes can form a base pair (including GU).
pub fn complementary(x: u8, y: u8) -> bool {
    x < NULL && y < NULL && PAIRING[((x << 3) | y) as usize] != 0
}

/// True if the two codes form a GU wobble pair.
pub fn wobble(x: u8, y: u8) -> bool {
    x < NULL && y < NULL && PAIRING[((x << 3) | y) as usize] == 2
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RnaSeq(Vec<u8>);

impl RnaSeq {
    pub fn new<T: std::borrow::Borrow<[u8]>>(xs: T) -> Result<Self> {
        xs.borrow()
            .iter()
            .map(|&b| encode(b).ok_or(HelixError::UnknownNucleotide(b as char)))
            .collect::<Result<Vec<_>>>()
            .map(RnaSeq)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Code at the given position. Out-of-bound positions are NULL.
    pub fn get(&self, index: usize) -> u8 {
        self.0.get(index).copied().unwrap_or(NULL)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.0.iter()
    }
    pub fn reversed(&self) -> Self {
        RnaSeq(self.0.iter().rev().copied().collect())
    }
    pub fn are_complementary_with(&self, other: &Self, i: usize, j: usize) -> bool {
        complementary(self.get(i), other.get(j))
    }
    pub fn is_gu_with(&self, other: &Self, i: usize, j: usize) -> bool {
        wobble(self.get(i), other.get(j))
    }
}

impl std::convert::AsRef<[u8]> for RnaSeq {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for RnaSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let seq: Vec<_> = self.0.iter().map(|&x| decode(x)).collect();
        write!(f, "{}", String::from_utf8_lossy(&seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn encode_test() {
        let seq = RnaSeq::new(&b"ACGUTNacgu"[..]).unwrap();
        assert_eq!(
            seq.as_ref(),
            &[0, 1, 2, 3, 3, NULL, 0, 1, 2, 3][..],
            "{}",
            seq
        );
        assert_eq!(format!("{}", seq), "ACGUUNACGU");
        assert_eq!(
            RnaSeq::new(&b"ACX"[..]),
            Err(HelixError::UnknownNucleotide('X'))
        );
    }
    #[test]
    fn pairing_test() {
        let seq = RnaSeq::new(&b"ACGUN"[..]).unwrap();
        let pairs: Vec<_> = (0..5)
            .flat_map(|i| (0..5).map(move |j| (i, j)))
            .filter(|&(i, j)| seq.are_complementary_with(&seq, i, j))
            .collect();
        assert_eq!(pairs, vec![(0, 3), (1, 2), (2, 1), (2, 3), (3, 0), (3, 2)]);
        assert!(seq.is_gu_with(&seq, 2, 3));
        assert!(seq.is_gu_with(&seq, 3, 2));
        assert!(!seq.is_gu_with(&seq, 0, 3));
        // Out of range reads as NULL.
        assert!(!seq.are_complementary_with(&seq, 10, 0));
    }
}
