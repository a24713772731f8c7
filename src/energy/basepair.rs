//! A base-pair counting energy model.
//!
//! Every valid loop closing two base pairs scores the same energy, and so does
//! the initiation of a duplex. Accessibility penalties are additive per
//! position and default to zero.
use super::{Energy, InteractionEnergy, E_INF};
use crate::error::{HelixError, Result};
use crate::sequence::RnaSeq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasePairEnergyConfig {
    /// Energy per loop and of the initiation.
    pub bp_energy: Energy,
    pub max_internal_loop_size1: usize,
    pub max_internal_loop_size2: usize,
}

impl std::default::Default for BasePairEnergyConfig {
    fn default() -> Self {
        Self {
            bp_energy: -1.,
            max_internal_loop_size1: 16,
            max_internal_loop_size2: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasePairEnergy {
    seq1: RnaSeq,
    // Reversed.
    seq2: RnaSeq,
    config: BasePairEnergyConfig,
    // Prefix sums of the per-position penalties, length = len + 1.
    ed1: Vec<Energy>,
    ed2: Vec<Energy>,
    blocked1: Vec<bool>,
    blocked2: Vec<bool>,
    max_length1: usize,
    max_length2: usize,
}

fn prefix_sum(penalties: &[Energy]) -> Vec<Energy> {
    std::iter::once(0.)
        .chain(penalties.iter().scan(0., |acc, &x| {
            *acc += x;
            Some(*acc)
        }))
        .collect()
}

fn range_sum(prefix: &[Energy], i: usize, j: usize) -> Energy {
    if j < i {
        0.
    } else if j + 1 < prefix.len() {
        prefix[j + 1] - prefix[i]
    } else {
        E_INF
    }
}

impl BasePairEnergy {
    /// `seq2` is given 5' to 3'; it is indexed reversed internally.
    pub fn new(seq1: &[u8], seq2: &[u8]) -> Result<Self> {
        Self::with_config(seq1, seq2, &BasePairEnergyConfig::default())
    }
    pub fn with_config(seq1: &[u8], seq2: &[u8], config: &BasePairEnergyConfig) -> Result<Self> {
        let seq1 = RnaSeq::new(seq1)?;
        let seq2 = RnaSeq::new(seq2)?.reversed();
        if seq1.is_empty() || seq2.is_empty() {
            return Err(HelixError::EmptySequence);
        }
        let (len1, len2) = (seq1.len(), seq2.len());
        Ok(Self {
            seq1,
            seq2,
            config: *config,
            ed1: vec![0.; len1 + 1],
            ed2: vec![0.; len2 + 1],
            blocked1: vec![false; len1],
            blocked2: vec![false; len2],
            max_length1: len1,
            max_length2: len2,
        })
    }
    pub fn with_max_internal_loop_size(mut self, il1: usize, il2: usize) -> Self {
        self.config.max_internal_loop_size1 = il1;
        self.config.max_internal_loop_size2 = il2;
        self
    }
    pub fn with_bp_energy(mut self, bp_energy: Energy) -> Self {
        self.config.bp_energy = bp_energy;
        self
    }
    /// Per-position unpairing penalties of the first sequence.
    pub fn with_ed1(mut self, penalties: &[Energy]) -> Result<Self> {
        if penalties.len() != self.seq1.len() {
            return Err(HelixError::Config(format!(
                "{} penalties for a sequence of length {}",
                penalties.len(),
                self.seq1.len()
            )));
        }
        self.ed1 = prefix_sum(penalties);
        Ok(self)
    }
    /// Per-position unpairing penalties of the second sequence, in reversed index space.
    pub fn with_ed2(mut self, penalties: &[Energy]) -> Result<Self> {
        if penalties.len() != self.seq2.len() {
            return Err(HelixError::Config(format!(
                "{} penalties for a sequence of length {}",
                penalties.len(),
                self.seq2.len()
            )));
        }
        self.ed2 = prefix_sum(penalties);
        Ok(self)
    }
    /// Mark positions of the first sequence as not accessible.
    pub fn with_blocked1(mut self, positions: &[usize]) -> Self {
        let len = self.blocked1.len();
        for &i in positions.iter().filter(|&&i| i < len) {
            self.blocked1[i] = true;
        }
        self
    }
    pub fn with_blocked2(mut self, positions: &[usize]) -> Self {
        let len = self.blocked2.len();
        for &i in positions.iter().filter(|&&i| i < len) {
            self.blocked2[i] = true;
        }
        self
    }
    pub fn with_max_length(mut self, max_length1: usize, max_length2: usize) -> Self {
        self.max_length1 = max_length1;
        self.max_length2 = max_length2;
        self
    }
    pub fn seq1(&self) -> &RnaSeq {
        &self.seq1
    }
    /// The second sequence in reversed order.
    pub fn seq2(&self) -> &RnaSeq {
        &self.seq2
    }
}

impl InteractionEnergy for BasePairEnergy {
    fn size1(&self) -> usize {
        self.seq1.len()
    }
    fn size2(&self) -> usize {
        self.seq2.len()
    }
    fn is_accessible1(&self, i1: usize) -> bool {
        self.blocked1.get(i1).map(|&b| !b).unwrap_or(false)
    }
    fn is_accessible2(&self, i2: usize) -> bool {
        self.blocked2.get(i2).map(|&b| !b).unwrap_or(false)
    }
    fn are_complementary(&self, i1: usize, i2: usize) -> bool {
        self.seq1.are_complementary_with(&self.seq2, i1, i2)
    }
    fn is_gu(&self, i1: usize, i2: usize) -> bool {
        self.seq1.is_gu_with(&self.seq2, i1, i2)
    }
    fn ed1(&self, i1: usize, j1: usize) -> Energy {
        range_sum(&self.ed1, i1, j1)
    }
    fn ed2(&self, i2: usize, j2: usize) -> Energy {
        range_sum(&self.ed2, i2, j2)
    }
    fn max_internal_loop_size1(&self) -> usize {
        self.config.max_internal_loop_size1
    }
    fn max_internal_loop_size2(&self) -> usize {
        self.config.max_internal_loop_size2
    }
    fn e_init(&self) -> Energy {
        self.config.bp_energy
    }
    fn e_inter_left(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> Energy {
        if self.is_valid_internal_loop(i1, j1, i2, j2) {
            self.config.bp_energy
        } else {
            E_INF
        }
    }
    fn max_length1(&self) -> usize {
        self.max_length1
    }
    fn max_length2(&self) -> usize {
        self.max_length2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::is_inf;
    #[test]
    fn reversed_second_sequence() {
        let energy = BasePairEnergy::new(b"GGAU", b"AUCC").unwrap();
        // AUCC reversed is CCUA.
        assert_eq!(format!("{}", energy.seq2()), "CCUA");
        assert!(energy.are_complementary(0, 0));
        assert!(!energy.are_complementary(2, 3));
        assert!(energy.are_complementary(2, 2));
        assert!(energy.are_complementary(3, 3));
        assert_eq!(energy.base_pair(0, 0), (0, 3));
        assert_eq!(energy.base_pair(3, 3), (3, 0));
    }
    #[test]
    fn loop_energies() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC")
            .unwrap()
            .with_max_internal_loop_size(1, 0);
        assert_eq!(energy.e_inter_left(0, 1, 0, 1), -1.);
        assert_eq!(energy.e_inter_left(0, 2, 0, 1), -1.);
        assert!(is_inf(energy.e_inter_left(0, 3, 0, 1)));
        assert!(is_inf(energy.e_inter_left(0, 1, 0, 2)));
        assert!(is_inf(energy.e_inter_left(1, 1, 0, 1)));
        assert_eq!(energy.e_init(), -1.);
        assert_eq!(energy.get_e(0, 4, 0, 4, -3.), -3.);
        assert!(is_inf(energy.get_e(0, 4, 0, 4, E_INF)));
    }
    #[test]
    fn penalties() {
        let energy = BasePairEnergy::new(b"GGGG", b"CCCC")
            .unwrap()
            .with_ed1(&[0.5, 0.5, 1., 1.])
            .unwrap()
            .with_blocked2(&[1]);
        assert_eq!(energy.ed1(0, 0), 0.5);
        assert_eq!(energy.ed1(1, 3), 2.5);
        assert_eq!(energy.ed2(0, 3), 0.);
        assert!(is_inf(energy.ed1(0, 4)));
        assert!(energy.is_accessible2(0));
        assert!(!energy.is_accessible2(1));
        assert!(!energy.is_accessible1(4));
        assert!(BasePairEnergy::new(b"GG", b"CC")
            .unwrap()
            .with_ed2(&[1.])
            .is_err());
        assert_eq!(
            BasePairEnergy::new(b"", b"CC").unwrap_err(),
            HelixError::EmptySequence
        );
    }
}
