use super::SeedHandler;
use crate::constraint::SeedConstraint;
use crate::energy::{Energy, InteractionEnergy};
use crate::error::{HelixError, Result};
use crate::interaction::Interaction;

/// Seed handler whose indices are shifted by (offset1, offset2) against the wrapped one.
pub struct SeedHandlerIdxOffset<'a> {
    inner: Box<dyn SeedHandler<'a> + 'a>,
    // Constraint with the ranges moved into the shifted index space.
    constraint: SeedConstraint,
    offset1: usize,
    offset2: usize,
}

impl<'a> std::fmt::Debug for SeedHandlerIdxOffset<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SeedHandlerIdxOffset({},{}) of {}",
            self.offset1, self.offset2, self.constraint
        )
    }
}

impl<'a> SeedHandlerIdxOffset<'a> {
    pub fn new(inner: Box<dyn SeedHandler<'a> + 'a>) -> Self {
        let constraint = inner.constraint().clone();
        Self {
            inner,
            constraint,
            offset1: 0,
            offset2: 0,
        }
    }
    pub fn original(&self) -> &(dyn SeedHandler<'a> + 'a) {
        self.inner.as_ref()
    }
    pub fn original_mut(&mut self) -> &mut (dyn SeedHandler<'a> + 'a) {
        self.inner.as_mut()
    }
    pub fn offset1(&self) -> usize {
        self.offset1
    }
    pub fn offset2(&self) -> usize {
        self.offset2
    }
    pub fn set_offset1(&mut self, offset: usize) -> Result<()> {
        let len = self.inner.energy().size1();
        if len <= offset {
            return Err(HelixError::OffsetOutOfRange { seq: 1, offset, len });
        }
        self.offset1 = offset;
        let ranges1 = self.inner.constraint().ranges1().shifted(offset, len - 1 - offset);
        let ranges2 = self.constraint.ranges2().clone();
        self.constraint = self.constraint.clone().with_ranges(ranges1, ranges2);
        Ok(())
    }
    pub fn set_offset2(&mut self, offset: usize) -> Result<()> {
        let len = self.inner.energy().size2();
        if len <= offset {
            return Err(HelixError::OffsetOutOfRange { seq: 2, offset, len });
        }
        self.offset2 = offset;
        let ranges1 = self.constraint.ranges1().clone();
        let ranges2 = self.inner.constraint().ranges2().shifted(offset, len - 1 - offset);
        self.constraint = self.constraint.clone().with_ranges(ranges1, ranges2);
        Ok(())
    }
}

impl<'a> SeedHandler<'a> for SeedHandlerIdxOffset<'a> {
    fn constraint(&self) -> &SeedConstraint {
        &self.constraint
    }
    /// The unshifted energy model of the wrapped handler.
    fn energy(&self) -> &'a dyn InteractionEnergy {
        self.inner.energy()
    }
    fn fill_seed(&mut self, i1min: usize, i1max: usize, i2min: usize, i2max: usize) -> usize {
        let (o1, o2) = (self.offset1, self.offset2);
        self.inner
            .fill_seed(i1min + o1, i1max + o1, i2min + o2, i2max + o2)
    }
    fn trace_back_seed(&self, interaction: &mut Interaction, i1: usize, i2: usize) {
        let start = interaction.len();
        self.inner
            .trace_back_seed(interaction, i1 + self.offset1, i2 + self.offset2);
        interaction.shift_from(start, self.offset1, self.offset2);
    }
    fn seed_e(&self, i1: usize, i2: usize) -> Energy {
        self.inner.seed_e(i1 + self.offset1, i2 + self.offset2)
    }
    fn seed_length1(&self, i1: usize, i2: usize) -> usize {
        self.inner.seed_length1(i1 + self.offset1, i2 + self.offset2)
    }
    fn seed_length2(&self, i1: usize, i2: usize) -> usize {
        self.inner.seed_length2(i1 + self.offset1, i2 + self.offset2)
    }
    fn is_feasible_seed_base_pair(&self, i1: usize, i2: usize, at_end: bool) -> bool {
        self.inner
            .is_feasible_seed_base_pair(i1 + self.offset1, i2 + self.offset2, at_end)
    }
    fn update_to_next_seed(
        &self,
        i1: &mut usize,
        i2: &mut usize,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> bool {
        let (o1, o2) = (self.offset1, self.offset2);
        let (mut x1, mut x2) = (i1.saturating_add(o1), i2.saturating_add(o2));
        let found = self.inner.update_to_next_seed(
            &mut x1,
            &mut x2,
            i1min + o1,
            i1max.saturating_add(o1),
            i2min + o2,
            i2max.saturating_add(o2),
        );
        if found {
            *i1 = x1 - o1;
            *i2 = x2 - o2;
        }
        found
    }
    fn add_seeds(&self, interaction: &mut Interaction) {
        let (o1, o2) = (self.offset1, self.offset2);
        interaction.shift_up(o1, o2);
        self.inner.add_seeds(interaction);
        interaction.shift_from(0, o1, o2);
        if let Some(seed) = interaction.seed.as_mut() {
            seed.left = (seed.left.0 - o1, seed.left.1 - o2);
            seed.right = (seed.right.0 - o1, seed.right.1 - o2);
        }
    }
    fn as_idx_offset(&self) -> Option<&SeedHandlerIdxOffset<'a>> {
        Some(self)
    }
    fn into_idx_offset(
        self: Box<Self>,
    ) -> std::result::Result<SeedHandlerIdxOffset<'a>, Box<dyn SeedHandler<'a> + 'a>> {
        Ok(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::BasePairEnergy;
    use crate::helix::tests::random_seq;
    use crate::interaction::SeedInfo;
    use crate::seed::SeedHandlerMfe;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;
    const SEED: u64 = 1293890;
    #[test]
    fn shifted_seeds() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 30);
            let seq2 = random_seq(&mut rng, 25);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = SeedConstraint::new(4, 2).unwrap();
            let mut direct = SeedHandlerMfe::new(&energy, constraint.clone());
            direct.fill_seed(0, 29, 0, 24);
            let mut shifted =
                SeedHandlerIdxOffset::new(Box::new(SeedHandlerMfe::new(&energy, constraint)));
            let (o1, o2) = (rng.gen_range(0..10), rng.gen_range(0..10));
            shifted.set_offset1(o1).unwrap();
            shifted.set_offset2(o2).unwrap();
            let count = shifted.fill_seed(0, 29 - o1, 0, 24 - o2);
            let mut expected = 0;
            for i1 in 0..30 - o1 {
                for i2 in 0..25 - o2 {
                    let e = shifted.seed_e(i1, i2);
                    let d = direct.seed_e(i1 + o1, i2 + o2);
                    assert!(e == d || (e.is_infinite() && d.is_infinite()));
                    if shifted.is_seed_bound(i1, i2) {
                        expected += 1;
                        assert_eq!(
                            shifted.seed_length1(i1, i2),
                            direct.seed_length1(i1 + o1, i2 + o2)
                        );
                        let mut x = Interaction::new();
                        let mut y = Interaction::new();
                        shifted.trace_back_seed(&mut x, i1, i2);
                        direct.trace_back_seed(&mut y, i1 + o1, i2 + o2);
                        y.shift_from(0, o1, o2);
                        assert_eq!(x, y);
                    }
                }
            }
            assert_eq!(count, expected);
        }
    }
    #[test]
    fn offset_bounds() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCC").unwrap();
        let constraint = SeedConstraint::new(2, 0).unwrap();
        let mut shifted =
            SeedHandlerIdxOffset::new(Box::new(SeedHandlerMfe::new(&energy, constraint)));
        assert!(shifted.set_offset1(4).is_ok());
        assert!(shifted.set_offset2(3).is_err());
        assert_eq!(shifted.offset2(), 0);
        shifted.fill_seed(0, 0, 0, 2);
        // One position left in the first sequence: no two-pair seed.
        assert!(!shifted.is_seed_bound(0, 0));
        shifted.set_offset1(2).unwrap();
        assert_eq!(shifted.fill_seed(0, 2, 0, 2), 4);
        let (mut i1, mut i2) = (0, 0);
        assert!(shifted.update_to_next_seed(&mut i1, &mut i2, 0, 2, 0, 2));
        assert_eq!((i1, i2), (1, 0));
        assert!(shifted.update_to_next_seed(&mut i1, &mut i2, 0, 2, 0, 2));
        assert_eq!((i1, i2), (0, 1));
    }
    #[test]
    fn annotation_kept_without_match() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let constraint = SeedConstraint::new(3, 0).unwrap();
        let mut shifted =
            SeedHandlerIdxOffset::new(Box::new(SeedHandlerMfe::new(&energy, constraint)));
        shifted.set_offset1(1).unwrap();
        shifted.set_offset2(2).unwrap();
        shifted.fill_seed(0, 3, 0, 2);
        let kept = SeedInfo {
            left: (0, 0),
            right: (2, 2),
            energy: -3.,
        };
        // A lone pair holds no seed, so the annotation must come back as it was.
        let mut interaction = Interaction::from_boundary((0, 0), (0, 0), -1.);
        interaction.seed = Some(kept);
        shifted.add_seeds(&mut interaction);
        assert_eq!(interaction.seed, Some(kept));
        assert_eq!(interaction.base_pairs[0], (0, 0));
        // Three stacked pairs do, and the seed lands in the shifted index space.
        let mut interaction = Interaction::from_boundary((0, 0), (2, 2), -3.);
        interaction.base_pairs = vec![(0, 0), (1, 1), (2, 2)];
        shifted.add_seeds(&mut interaction);
        let seed = interaction.seed.unwrap();
        assert_eq!((seed.left, seed.right), ((0, 0), (2, 2)));
        assert_eq!(interaction.base_pairs, vec![(0, 0), (1, 1), (2, 2)]);
    }
}
