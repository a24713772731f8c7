use super::{Energy, InteractionEnergy};
use crate::error::{HelixError, Result};
use crate::interaction::BasePair;

/// Window view of an energy model: index `i` of the view is `i + offset` of the original.
#[derive(Clone, Copy)]
pub struct EnergyIdxOffset<'a> {
    original: &'a dyn InteractionEnergy,
    offset1: usize,
    offset2: usize,
}

impl<'a> std::fmt::Debug for EnergyIdxOffset<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EnergyIdxOffset({},{})", self.offset1, self.offset2)
    }
}

impl<'a> EnergyIdxOffset<'a> {
    pub fn new(original: &'a dyn InteractionEnergy, offset1: usize, offset2: usize) -> Result<Self> {
        if offset1 >= original.size1() {
            return Err(HelixError::OffsetOutOfRange {
                seq: 1,
                offset: offset1,
                len: original.size1(),
            });
        }
        if offset2 >= original.size2() {
            return Err(HelixError::OffsetOutOfRange {
                seq: 2,
                offset: offset2,
                len: original.size2(),
            });
        }
        Ok(Self {
            original,
            offset1,
            offset2,
        })
    }
    pub fn original(&self) -> &'a dyn InteractionEnergy {
        self.original
    }
    pub fn offset1(&self) -> usize {
        self.offset1
    }
    pub fn offset2(&self) -> usize {
        self.offset2
    }
}

impl<'a> InteractionEnergy for EnergyIdxOffset<'a> {
    fn size1(&self) -> usize {
        self.original.size1() - self.offset1
    }
    fn size2(&self) -> usize {
        self.original.size2() - self.offset2
    }
    fn is_accessible1(&self, i1: usize) -> bool {
        self.original.is_accessible1(i1 + self.offset1)
    }
    fn is_accessible2(&self, i2: usize) -> bool {
        self.original.is_accessible2(i2 + self.offset2)
    }
    fn are_complementary(&self, i1: usize, i2: usize) -> bool {
        self.original
            .are_complementary(i1 + self.offset1, i2 + self.offset2)
    }
    fn is_gu(&self, i1: usize, i2: usize) -> bool {
        self.original.is_gu(i1 + self.offset1, i2 + self.offset2)
    }
    fn ed1(&self, i1: usize, j1: usize) -> Energy {
        self.original.ed1(i1 + self.offset1, j1 + self.offset1)
    }
    fn ed2(&self, i2: usize, j2: usize) -> Energy {
        self.original.ed2(i2 + self.offset2, j2 + self.offset2)
    }
    fn max_internal_loop_size1(&self) -> usize {
        self.original.max_internal_loop_size1()
    }
    fn max_internal_loop_size2(&self) -> usize {
        self.original.max_internal_loop_size2()
    }
    fn e_init(&self) -> Energy {
        self.original.e_init()
    }
    fn e_inter_left(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> Energy {
        let (o1, o2) = (self.offset1, self.offset2);
        self.original.e_inter_left(i1 + o1, j1 + o1, i2 + o2, j2 + o2)
    }
    fn e_dangling_left(&self, i1: usize, i2: usize) -> Energy {
        self.original
            .e_dangling_left(i1 + self.offset1, i2 + self.offset2)
    }
    fn e_dangling_right(&self, j1: usize, j2: usize) -> Energy {
        self.original
            .e_dangling_right(j1 + self.offset1, j2 + self.offset2)
    }
    fn e_end_left(&self, i1: usize, i2: usize) -> Energy {
        self.original.e_end_left(i1 + self.offset1, i2 + self.offset2)
    }
    fn e_end_right(&self, j1: usize, j2: usize) -> Energy {
        self.original
            .e_end_right(j1 + self.offset1, j2 + self.offset2)
    }
    fn max_length1(&self) -> usize {
        self.original.max_length1()
    }
    fn max_length2(&self) -> usize {
        self.original.max_length2()
    }
    fn is_valid_internal_loop(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> bool {
        let (o1, o2) = (self.offset1, self.offset2);
        self.original
            .is_valid_internal_loop(i1 + o1, j1 + o1, i2 + o2, j2 + o2)
    }
    // Positions on the original sequences.
    fn base_pair(&self, i1: usize, i2: usize) -> BasePair {
        self.original.base_pair(i1 + self.offset1, i2 + self.offset2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::BasePairEnergy;
    #[test]
    fn shifted_queries() {
        let energy = BasePairEnergy::new(b"AAGGG", b"CCCUU").unwrap();
        let view = EnergyIdxOffset::new(&energy, 2, 0).unwrap();
        assert_eq!(view.size1(), 3);
        assert_eq!(view.size2(), 5);
        for i1 in 0..view.size1() {
            for i2 in 0..view.size2() {
                assert_eq!(
                    view.are_complementary(i1, i2),
                    energy.are_complementary(i1 + 2, i2)
                );
                assert_eq!(view.base_pair(i1, i2), energy.base_pair(i1 + 2, i2));
            }
        }
        assert_eq!(
            view.e_inter_left(0, 1, 0, 1),
            energy.e_inter_left(2, 3, 0, 1)
        );
    }
    #[test]
    fn offset_bounds() {
        let energy = BasePairEnergy::new(b"AAGGG", b"CCCUU").unwrap();
        assert!(EnergyIdxOffset::new(&energy, 4, 4).is_ok());
        assert_eq!(
            EnergyIdxOffset::new(&energy, 5, 0).unwrap_err(),
            HelixError::OffsetOutOfRange {
                seq: 1,
                offset: 5,
                len: 5
            }
        );
        assert!(EnergyIdxOffset::new(&energy, 0, 7).is_err());
    }
}
