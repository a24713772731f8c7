//! Seeds: short helices of an exact number of base pairs, used as anchors.
mod mfe;
mod offset;
pub use mfe::SeedHandlerMfe;
pub use offset::SeedHandlerIdxOffset;

use crate::constraint::SeedConstraint;
use crate::energy::{is_inf, Energy, InteractionEnergy};
use crate::interaction::{Interaction, SeedInfo};

pub trait SeedHandler<'a> {
    fn constraint(&self) -> &SeedConstraint;
    /// The energy model the handler was built on.
    fn energy(&self) -> &'a dyn InteractionEnergy;
    /// Compute the mfe seed of every left-most base pair in the window.
    /// Returns the number of feasible seeds.
    fn fill_seed(&mut self, i1min: usize, i1max: usize, i2min: usize, i2max: usize) -> usize;
    /// Push the base pairs of the seed at (i1,i2), except its left-most and right-most ones.
    fn trace_back_seed(&self, interaction: &mut Interaction, i1: usize, i2: usize);
    /// Hybridization loop energy of the mfe seed at (i1,i2), or E_INF.
    fn seed_e(&self, i1: usize, i2: usize) -> Energy;
    fn seed_length1(&self, i1: usize, i2: usize) -> usize;
    fn seed_length2(&self, i1: usize, i2: usize) -> usize;
    fn is_seed_bound(&self, i1: usize, i2: usize) -> bool {
        !is_inf(self.seed_e(i1, i2))
    }
    fn is_feasible_seed_base_pair(&self, i1: usize, i2: usize, at_end: bool) -> bool {
        let energy = self.energy();
        let c = self.constraint();
        i1 < energy.size1()
            && i2 < energy.size2()
            && energy.is_accessible1(i1)
            && energy.is_accessible2(i2)
            && energy.are_complementary(i1, i2)
            && energy.ed1(i1, i1) <= c.max_ed()
            && energy.ed2(i2, i2) <= c.max_ed()
            && (c.is_gu_allowed() || !energy.is_gu(i1, i2))
            && (!at_end || c.is_gu_end_allowed() || !energy.is_gu(i1, i2))
            && (c.ranges1().is_empty() || c.ranges1().covers(i1))
            && (c.ranges2().is_empty() || c.ranges2().covers(i2))
    }
    /// Move (i1,i2) to the next seed start within the window, i1 running fastest.
    /// A position that is not a seed start in the window restarts the scan.
    /// Returns false, leaving (i1,i2) untouched, if there is no further seed.
    fn update_to_next_seed(
        &self,
        i1: &mut usize,
        i2: &mut usize,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> bool {
        let energy = self.energy();
        let i1max = i1max.min(energy.size1().saturating_sub(1));
        let i2max = i2max.min(energy.size2().saturating_sub(1));
        let (mut x1, mut x2) = (*i1, *i2);
        let in_range = i1min <= x1 && x1 <= i1max && i2min <= x2 && x2 <= i2max;
        if !in_range || !self.is_seed_bound(x1, x2) {
            x1 = i1min;
            x2 = i2min;
        } else {
            x1 += 1;
            if i1max < x1 {
                x1 = i1min;
                x2 += 1;
            }
        }
        while x2 <= i2max && !self.is_seed_bound(x1, x2) {
            x1 += 1;
            if i1max < x1 {
                x1 = i1min;
                x2 += 1;
            }
        }
        if x1 <= i1max && x2 <= i2max {
            *i1 = x1;
            *i2 = x2;
            true
        } else {
            false
        }
    }
    /// Annotate the interaction with the first seed all of whose base pairs it contains.
    fn add_seeds(&self, interaction: &mut Interaction) {
        let mut found = None;
        for (idx, &(i1, i2)) in interaction.base_pairs.iter().enumerate() {
            if !self.is_seed_bound(i1, i2) {
                continue;
            }
            let j1 = i1 + self.seed_length1(i1, i2) - 1;
            let j2 = i2 + self.seed_length2(i1, i2) - 1;
            let mut seed = Interaction::new();
            self.trace_back_seed(&mut seed, i1, i2);
            seed.base_pairs.push((j1, j2));
            let rest = &interaction.base_pairs[idx + 1..];
            let contained = seed.len() <= rest.len()
                && rest.iter().zip(seed.base_pairs.iter()).all(|(x, y)| x == y);
            if contained {
                let energy = self.energy();
                found = Some(SeedInfo {
                    left: (i1, i2),
                    right: (j1, j2),
                    energy: energy.get_e(i1, j1, i2, j2, self.seed_e(i1, i2)) + energy.e_init(),
                });
                break;
            }
        }
        if found.is_some() {
            interaction.seed = found;
        }
    }
    fn as_idx_offset(&self) -> Option<&SeedHandlerIdxOffset<'a>>;
    /// Unbox into an offset decorator, or give the handler back if it is no decorator.
    fn into_idx_offset(
        self: Box<Self>,
    ) -> std::result::Result<SeedHandlerIdxOffset<'a>, Box<dyn SeedHandler<'a> + 'a>>;
}
