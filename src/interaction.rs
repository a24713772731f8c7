//! Interactions, base pairs, and index ranges.
use crate::energy::{Energy, InteractionEnergy, E_INF};
use crate::error::{HelixError, Result};
use serde::{Deserialize, Serialize};

/// An index pair `(i1, i2)`. Inside the engines `i2` runs over the reversed second sequence.
pub type BasePair = (usize, usize);

/// Closed index interval [from, to].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub from: usize,
    pub to: usize,
}

impl IndexRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
    pub fn is_ascending(&self) -> bool {
        self.from <= self.to
    }
    pub fn len(&self) -> usize {
        if self.is_ascending() {
            self.to - self.from + 1
        } else {
            0
        }
    }
    pub fn is_empty(&self) -> bool {
        !self.is_ascending()
    }
    pub fn covers(&self, i: usize) -> bool {
        self.from <= i && i <= self.to
    }
    pub fn overlaps(&self, other: &Self) -> bool {
        self.from <= other.to && other.from <= self.to
    }
}

impl std::fmt::Display for IndexRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl std::str::FromStr for IndexRange {
    type Err = HelixError;
    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.trim().splitn(2, '-');
        let mut parse = || -> Option<usize> { fields.next()?.trim().parse().ok() };
        match (parse(), parse()) {
            (Some(from), Some(to)) if from <= to => Ok(Self { from, to }),
            _ => Err(HelixError::Config(format!("malformed index range: {}", s))),
        }
    }
}

/// A list of ranges, kept sorted by their start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRangeList(Vec<IndexRange>);

impl IndexRangeList {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn push(&mut self, range: IndexRange) {
        let idx = self
            .0
            .iter()
            .position(|r| r.from > range.from)
            .unwrap_or(self.0.len());
        self.0.insert(idx, range);
    }
    pub fn covers(&self, i: usize) -> bool {
        self.0.iter().any(|r| r.covers(i))
    }
    pub fn overlaps(&self, range: &IndexRange) -> bool {
        self.0.iter().any(|r| r.overlaps(range))
    }
    pub fn iter(&self) -> std::slice::Iter<'_, IndexRange> {
        self.0.iter()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
    /// Ranges moved down by `offset` and clipped to [0, max]. Ranges left of the offset are dropped.
    pub fn shifted(&self, offset: usize, max: usize) -> Self {
        self.0
            .iter()
            .filter(|r| offset <= r.to && r.from <= offset + max)
            .map(|r| IndexRange::new(r.from.saturating_sub(offset), (r.to - offset).min(max)))
            .collect()
    }
}

impl std::iter::FromIterator<IndexRange> for IndexRangeList {
    fn from_iter<I: IntoIterator<Item = IndexRange>>(iter: I) -> Self {
        let mut list = Self::new();
        for range in iter {
            list.push(range);
        }
        list
    }
}

impl std::str::FromStr for IndexRangeList {
    type Err = HelixError;
    // "3-10,20-25"
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .filter(|x| !x.trim().is_empty())
            .map(|x| x.parse::<IndexRange>())
            .collect()
    }
}

/// The seed contained in an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedInfo {
    pub left: BasePair,
    pub right: BasePair,
    pub energy: Energy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub base_pairs: Vec<BasePair>,
    pub energy: Energy,
    pub seed: Option<SeedInfo>,
}

impl std::default::Default for Interaction {
    fn default() -> Self {
        Self {
            base_pairs: vec![],
            energy: E_INF,
            seed: None,
        }
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }
    /// Interaction given by its boundary pairs only.
    pub fn from_boundary(left: BasePair, right: BasePair, energy: Energy) -> Self {
        let base_pairs = if left == right {
            vec![left]
        } else {
            vec![left, right]
        };
        Self {
            base_pairs,
            energy,
            seed: None,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.base_pairs.is_empty()
    }
    pub fn len(&self) -> usize {
        self.base_pairs.len()
    }
    pub fn sort(&mut self) {
        self.base_pairs.sort_unstable();
    }
    /// True if both strands strictly increase along the base pairs.
    pub fn is_valid(&self) -> bool {
        !self.base_pairs.is_empty()
            && self
                .base_pairs
                .windows(2)
                .all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1)
    }
    pub fn range1(&self) -> Option<IndexRange> {
        let first = self.base_pairs.first()?;
        let last = self.base_pairs.last()?;
        Some(IndexRange::new(first.0, last.0))
    }
    pub fn range2(&self) -> Option<IndexRange> {
        let first = self.base_pairs.first()?;
        let last = self.base_pairs.last()?;
        Some(IndexRange::new(first.1, last.1))
    }
    /// Base pairs as positions on the input sequences.
    pub fn positions(&self, energy: &dyn InteractionEnergy) -> Vec<BasePair> {
        self.base_pairs
            .iter()
            .map(|&(i1, i2)| energy.base_pair(i1, i2))
            .collect()
    }
    /// Dot-bar notation `start1&start2:bars1&bars2` on the input sequences, 1-based.
    /// `|` marks a paired position, `.` an unpaired one.
    pub fn dot_bar(&self, energy: &dyn InteractionEnergy) -> String {
        let positions = self.positions(energy);
        let (from1, to1) = match (positions.first(), positions.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => return String::new(),
        };
        // The second strand runs backwards along the interaction.
        let (from2, to2) = (positions[positions.len() - 1].1, positions[0].1);
        let bars = |from: usize, to: usize, paired: &dyn Fn(usize) -> bool| -> String {
            (from..=to)
                .map(|p| if paired(p) { '|' } else { '.' })
                .collect()
        };
        let bars1 = bars(from1, to1, &|p| positions.iter().any(|bp| bp.0 == p));
        let bars2 = bars(from2, to2, &|p| positions.iter().any(|bp| bp.1 == p));
        format!("{}&{}:{}&{}", from1 + 1, from2 + 1, bars1, bars2)
    }
    // Move the pairs from `start` on into a frame shifted by (-offset1, -offset2).
    pub(crate) fn shift_from(&mut self, start: usize, offset1: usize, offset2: usize) {
        for bp in self.base_pairs.iter_mut().skip(start) {
            bp.0 -= offset1;
            bp.1 -= offset2;
        }
    }
    pub(crate) fn shift_up(&mut self, offset1: usize, offset2: usize) {
        for bp in self.base_pairs.iter_mut() {
            bp.0 += offset1;
            bp.1 += offset2;
        }
        if let Some(seed) = self.seed.as_mut() {
            seed.left = (seed.left.0 + offset1, seed.left.1 + offset2);
            seed.right = (seed.right.0 + offset1, seed.right.1 + offset2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn ranges() {
        let r = IndexRange::new(3, 7);
        assert!(r.covers(3) && r.covers(7) && !r.covers(8));
        assert!(r.overlaps(&IndexRange::new(7, 9)));
        assert!(!r.overlaps(&IndexRange::new(8, 9)));
        assert_eq!(r.len(), 5);
        let list: IndexRangeList = "20-25, 3-10".parse().unwrap();
        assert_eq!(list.iter().next(), Some(&IndexRange::new(3, 10)));
        assert!(list.covers(22) && !list.covers(15));
        assert!(list.overlaps(&IndexRange::new(9, 12)));
        assert!("10-5".parse::<IndexRange>().is_err());
        assert!("x".parse::<IndexRangeList>().is_err());
        assert!("".parse::<IndexRangeList>().unwrap().is_empty());
        let shifted = list.shifted(5, 16);
        let ranges: Vec<_> = shifted.iter().copied().collect();
        assert_eq!(ranges, vec![IndexRange::new(0, 5), IndexRange::new(15, 16)]);
        assert!(list.shifted(30, 10).is_empty());
    }
    #[test]
    fn interaction_shape() {
        let mut interaction = Interaction::from_boundary((0, 0), (4, 5), -2.);
        interaction.base_pairs.push((2, 3));
        interaction.sort();
        assert!(interaction.is_valid());
        assert_eq!(interaction.range1(), Some(IndexRange::new(0, 4)));
        assert_eq!(interaction.range2(), Some(IndexRange::new(0, 5)));
        interaction.base_pairs.push((3, 3));
        interaction.sort();
        assert!(!interaction.is_valid());
        interaction.shift_up(1, 2);
        assert_eq!(interaction.base_pairs[0], (1, 2));
        interaction.shift_from(1, 1, 2);
        assert_eq!(interaction.base_pairs[1], (2, 3));
        assert_eq!(Interaction::from_boundary((1, 1), (1, 1), 0.).len(), 1);
    }
    #[test]
    fn dot_bar() {
        let energy = crate::energy::BasePairEnergy::new(b"GGAGG", b"CCCC").unwrap();
        let mut interaction = Interaction::from_boundary((0, 0), (3, 2), -3.);
        interaction.base_pairs.insert(1, (1, 1));
        assert_eq!(interaction.positions(&energy), vec![(0, 3), (1, 2), (3, 1)]);
        assert_eq!(interaction.dot_bar(&energy), "1&2:||.|&|||");
        assert_eq!(Interaction::new().dot_bar(&energy), "");
    }
}
