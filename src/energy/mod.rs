//! Interaction energy model as seen by the helix and seed engines.
//!
//! All indices are 0-based. Indices on the second sequence run over the
//! *reversed* sequence, so that both strands are read left to right while
//! forming a duplex. [`InteractionEnergy::base_pair`] converts an index pair
//! back to positions on the input sequences.
mod basepair;
mod offset;
pub use basepair::BasePairEnergy;
pub use basepair::BasePairEnergyConfig;
pub use offset::EnergyIdxOffset;

use crate::interaction::BasePair;

pub type Energy = f64;
/// Energy of an infeasible structure.
pub const E_INF: Energy = std::f64::INFINITY;
/// Two energies closer than this are the same energy.
pub const E_EPSILON: Energy = 1e-6;

pub fn is_inf(e: Energy) -> bool {
    !e.is_finite()
}

pub fn e_equal(e1: Energy, e2: Energy) -> bool {
    (e1 - e2).abs() < E_EPSILON
}

/// Query interface of an energy model.
pub trait InteractionEnergy: Send + Sync {
    fn size1(&self) -> usize;
    fn size2(&self) -> usize;
    fn is_accessible1(&self, i1: usize) -> bool;
    fn is_accessible2(&self, i2: usize) -> bool;
    fn are_complementary(&self, i1: usize, i2: usize) -> bool;
    fn is_gu(&self, i1: usize, i2: usize) -> bool;
    /// Accessibility penalty of [i1,j1] in the first sequence.
    fn ed1(&self, i1: usize, j1: usize) -> Energy;
    /// Accessibility penalty of [i2,j2] in the (reversed) second sequence.
    fn ed2(&self, i2: usize, j2: usize) -> Energy;
    fn max_internal_loop_size1(&self) -> usize;
    fn max_internal_loop_size2(&self) -> usize;
    /// Duplex initiation energy.
    fn e_init(&self) -> Energy;
    /// Energy of the loop closed by (i1,i2) and (j1,j2), E_INF if it is not a valid loop.
    fn e_inter_left(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> Energy;
    fn e_dangling_left(&self, _i1: usize, _i2: usize) -> Energy {
        0.
    }
    fn e_dangling_right(&self, _j1: usize, _j2: usize) -> Energy {
        0.
    }
    fn e_end_left(&self, _i1: usize, _i2: usize) -> Energy {
        0.
    }
    fn e_end_right(&self, _j1: usize, _j2: usize) -> Energy {
        0.
    }
    /// Maximal interaction length in the first sequence.
    fn max_length1(&self) -> usize {
        self.size1()
    }
    fn max_length2(&self) -> usize {
        self.size2()
    }
    /// Overall energy of an interaction spanning [i1,j1]x[i2,j2] with the given hybridization energy.
    fn get_e(&self, i1: usize, j1: usize, i2: usize, j2: usize, hybrid_e: Energy) -> Energy {
        if is_inf(hybrid_e) {
            return E_INF;
        }
        hybrid_e
            + self.ed1(i1, j1)
            + self.ed2(i2, j2)
            + self.e_dangling_left(i1, i2)
            + self.e_dangling_right(j1, j2)
            + self.e_end_left(i1, i2)
            + self.e_end_right(j1, j2)
    }
    fn is_valid_internal_loop(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> bool {
        i1 < j1
            && i2 < j2
            && j1 < self.size1()
            && j2 < self.size2()
            && self.are_complementary(i1, i2)
            && self.are_complementary(j1, j2)
            && j1 - i1 <= 1 + self.max_internal_loop_size1()
            && j2 - i2 <= 1 + self.max_internal_loop_size2()
    }
    /// Positions of an index pair on the two input sequences.
    fn base_pair(&self, i1: usize, i2: usize) -> BasePair {
        (i1, self.size2() - 1 - i2)
    }
}
