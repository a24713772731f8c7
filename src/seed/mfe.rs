//! Mfe seed computation.
//!
//! `rec[i1][i2][bp_in][u1][u2]` is the loop energy of the best seed-like
//! chain starting at (i1,i2) with `bp_in + 2` base pairs and exactly u1/u2
//! unpaired bases in the two strands. Its right-most pair is
//! `(i1 + bp_in + 1 + u1, i2 + bp_in + 1 + u2)`.
use super::{SeedHandler, SeedHandlerIdxOffset};
use crate::constraint::{decode_length1, decode_length2, encode_length, SeedConstraint};
use crate::dptable::{DPTable, RecTable};
use crate::energy::{e_equal, is_inf, Energy, InteractionEnergy, E_INF};
use crate::interaction::Interaction;

pub struct SeedHandlerMfe<'a> {
    energy: &'a dyn InteractionEnergy,
    constraint: SeedConstraint,
    // (loop energy, encoded length) of the best seed per start, window relative.
    seed: DPTable<(Energy, usize)>,
    rec: RecTable<Energy, 5>,
    offset1: usize,
    offset2: usize,
}

impl<'a> std::fmt::Debug for SeedHandlerMfe<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SeedHandlerMfe({}, window at {},{})",
            self.constraint, self.offset1, self.offset2
        )
    }
}

impl<'a> SeedHandlerMfe<'a> {
    pub fn new(energy: &'a dyn InteractionEnergy, constraint: SeedConstraint) -> Self {
        Self {
            energy,
            constraint,
            seed: DPTable::new(0, 0, (E_INF, 0)),
            rec: RecTable::new([0; 5], E_INF),
            offset1: 0,
            offset2: 0,
        }
    }
    fn rec_e(&self, i1: usize, i2: usize, bp_in: usize, u1: usize, u2: usize) -> Energy {
        match (i1.checked_sub(self.offset1), i2.checked_sub(self.offset2)) {
            (Some(r1), Some(r2)) => self.rec.get([r1, r2, bp_in, u1, u2]),
            _ => E_INF,
        }
    }
    fn seed_record(&self, i1: usize, i2: usize) -> (Energy, usize) {
        match (i1.checked_sub(self.offset1), i2.checked_sub(self.offset2)) {
            (Some(r1), Some(r2)) => self.seed.get(r1, r2),
            _ => (E_INF, 0),
        }
    }
}

impl<'a> SeedHandler<'a> for SeedHandlerMfe<'a> {
    fn constraint(&self) -> &SeedConstraint {
        &self.constraint
    }
    fn energy(&self) -> &'a dyn InteractionEnergy {
        self.energy
    }
    fn fill_seed(&mut self, i1min: usize, i1max: usize, i2min: usize, i2max: usize) -> usize {
        let energy = self.energy;
        self.offset1 = i1min;
        self.offset2 = i2min;
        let bounds = match (energy.size1().checked_sub(1), energy.size2().checked_sub(1)) {
            (Some(last1), Some(last2)) => Some((i1max.min(last1), i2max.min(last2))),
            _ => None,
        };
        let (i1max, i2max) = match bounds {
            Some((i1max, i2max)) if i1min <= i1max && i2min <= i2max => (i1max, i2max),
            _ => {
                self.seed.initialize(0, 0, (E_INF, 0));
                self.rec.initialize([0; 5], E_INF);
                return 0;
            }
        };
        let (w1, w2) = (i1max - i1min + 1, i2max - i2min + 1);
        let bp_in_len = self.constraint.bp() - 1;
        let max_u1 = self.constraint.max_unpaired1();
        let max_u2 = self.constraint.max_unpaired2();
        let max_u = self.constraint.max_unpaired_overall();
        let max_ed = self.constraint.max_ed();
        let max_e = self.constraint.max_e();
        let max_e_hybrid = self.constraint.max_e_hybrid();
        let modulus = self.constraint.length_modulus();
        let no_lp = if self.constraint.is_lp_allowed() { 0 } else { 1 };
        let max_il1 = energy.max_internal_loop_size1();
        let max_il2 = energy.max_internal_loop_size2();
        trace!(
            "fill seeds in [{},{}]x[{},{}] with {}",
            i1min,
            i1max,
            i2min,
            i2max,
            self.constraint
        );
        self.seed.initialize(w1, w2, (E_INF, 0));
        self.rec
            .initialize([w1, w2, bp_in_len, max_u1 + 1, max_u2 + 1], E_INF);
        let mut count = 0;
        for i1 in (i1min..=i1max).rev() {
            for i2 in (i2min..=i2max).rev() {
                if !self.is_feasible_seed_base_pair(i1, i2, false) {
                    continue;
                }
                let (r1, r2) = (i1 - i1min, i2 - i2min);
                for bp_in in 0..bp_in_len {
                    if w1 <= r1 + bp_in + 1 || w2 <= r2 + bp_in + 1 {
                        break;
                    }
                    // Without lonely pairs, (i1,i2) has to stack on (i1+1,i2+1).
                    let mut valid_left_end = true;
                    let mut i_stack_e = 0.;
                    if no_lp > 0 {
                        if self.is_feasible_seed_base_pair(i1 + 1, i2 + 1, false) {
                            i_stack_e = energy.e_inter_left(i1, i1 + 1, i2, i2 + 1);
                        } else {
                            valid_left_end = false;
                        }
                    }
                    for u1 in 0..=max_u1 {
                        if w1 <= r1 + bp_in + 1 + u1 {
                            break;
                        }
                        for u2 in 0..=max_u2 {
                            if max_u < u1 + u2 || w2 <= r2 + bp_in + 1 + u2 {
                                break;
                            }
                            let (j1, j2) = (i1 + bp_in + 1 + u1, i2 + bp_in + 1 + u2);
                            let mut cur_e = E_INF;
                            let valid_right_end = self.is_feasible_seed_base_pair(j1, j2, true)
                                && (no_lp == 0
                                    || self.is_feasible_seed_base_pair(j1 - 1, j2 - 1, false));
                            if valid_left_end && valid_right_end {
                                if bp_in == 0 {
                                    if no_lp == 0 || (u1 == 0 && u2 == 0) {
                                        cur_e = energy.e_inter_left(i1, j1, i2, j2);
                                    }
                                } else {
                                    if no_lp > 0 {
                                        let rest = self.rec.get([r1 + 1, r2 + 1, bp_in - 1, u1, u2]);
                                        if !is_inf(rest) {
                                            cur_e = cur_e.min(i_stack_e + rest);
                                        }
                                    }
                                    if 1 + no_lp <= bp_in {
                                        for u1p in (0..=u1.min(max_il1)).rev() {
                                            for u2p in (0..=u2.min(max_il2)).rev() {
                                                // The stacked extension is handled above.
                                                if u1p + u2p < no_lp {
                                                    continue;
                                                }
                                                let (k1, k2) =
                                                    (i1 + u1p + 1 + no_lp, i2 + u2p + 1 + no_lp);
                                                let rest = self.rec.get([
                                                    k1 - i1min,
                                                    k2 - i2min,
                                                    bp_in - 1 - no_lp,
                                                    u1 - u1p,
                                                    u2 - u2p,
                                                ]);
                                                if is_inf(rest)
                                                    || !self.is_feasible_seed_base_pair(k1, k2, false)
                                                {
                                                    continue;
                                                }
                                                let loop_e = energy.e_inter_left(
                                                    i1 + no_lp,
                                                    k1,
                                                    i2 + no_lp,
                                                    k2,
                                                );
                                                cur_e = cur_e.min(i_stack_e + loop_e + rest);
                                            }
                                        }
                                    }
                                }
                            }
                            self.rec.set([r1, r2, bp_in, u1, u2], cur_e);
                        }
                    }
                    // All base pairs placed: pick the best split of the unpaired bases.
                    if bp_in + 1 == bp_in_len && self.is_feasible_seed_base_pair(i1, i2, true) {
                        let mut best = None;
                        let mut best_e = E_INF;
                        for u1 in 0..=max_u1 {
                            if w1 <= r1 + bp_in + 1 + u1 {
                                break;
                            }
                            for u2 in 0..=max_u2 {
                                if max_u < u1 + u2 || w2 <= r2 + bp_in + 1 + u2 {
                                    break;
                                }
                                let (j1, j2) = (i1 + bp_in + 1 + u1, i2 + bp_in + 1 + u2);
                                if max_ed <= energy.ed1(i1, j1) || max_ed <= energy.ed2(i2, j2) {
                                    continue;
                                }
                                let hybrid_e = self.rec.get([r1, r2, bp_in, u1, u2]) + energy.e_init();
                                let cur_e = energy.get_e(i1, j1, i2, j2, hybrid_e);
                                if hybrid_e <= max_e_hybrid && cur_e <= max_e && cur_e < best_e {
                                    best_e = cur_e;
                                    best = Some((u1, u2));
                                }
                            }
                        }
                        if let Some((u1, u2)) = best {
                            let loop_e = self.rec.get([r1, r2, bp_in, u1, u2]);
                            let length = encode_length(bp_in + 2 + u1, bp_in + 2 + u2, modulus);
                            self.seed.set(r1, r2, (loop_e, length));
                            count += 1;
                        }
                    }
                }
            }
        }
        debug!("valid seeds = {} (of {} start positions)", count, w1 * w2);
        count
    }
    fn trace_back_seed(&self, interaction: &mut Interaction, i1: usize, i2: usize) {
        if !self.is_seed_bound(i1, i2) {
            return;
        }
        let energy = self.energy;
        let bp = self.constraint.bp();
        let no_lp = if self.constraint.is_lp_allowed() { 0 } else { 1 };
        let (start1, start2) = (i1, i2);
        let (mut i1, mut i2) = (i1, i2);
        let mut u1max = self.seed_length1(i1, i2) - bp;
        let mut u2max = self.seed_length2(i1, i2) - bp;
        let mut bp_in = bp - 2;
        let mut cur_e = self.rec_e(i1, i2, bp_in, u1max, u2max);
        while bp_in > 0 {
            let mut i_stack_e = 0.;
            if no_lp > 0 {
                i_stack_e = energy.e_inter_left(i1, i1 + 1, i2, i2 + 1);
                let rest = self.rec_e(i1 + 1, i2 + 1, bp_in - 1, u1max, u2max);
                if e_equal(cur_e, i_stack_e + rest) {
                    if i1 != start1 {
                        interaction.base_pairs.push((i1, i2));
                    }
                    i1 += 1;
                    i2 += 1;
                    bp_in -= 1;
                    cur_e = rest;
                    continue;
                }
                assert!(
                    1 + no_lp <= bp_in,
                    "seed traceback at ({},{}) found no stacking",
                    i1,
                    i2
                );
            }
            let mut found = None;
            'search: for u1 in 0..=u1max {
                for u2 in 0..=u2max {
                    if u1max + u2max < u1 + u2 {
                        break;
                    }
                    if u1 + u2 < no_lp {
                        continue;
                    }
                    let (k1, k2) = (i1 + u1 + 1 + no_lp, i2 + u2 + 1 + no_lp);
                    let rest = self.rec_e(k1, k2, bp_in - 1 - no_lp, u1max - u1, u2max - u2);
                    if is_inf(rest) || !self.is_feasible_seed_base_pair(k1, k2, false) {
                        continue;
                    }
                    let loop_e = energy.e_inter_left(i1 + no_lp, k1, i2 + no_lp, k2);
                    if e_equal(cur_e, i_stack_e + loop_e + rest) {
                        found = Some((u1, u2, k1, k2, rest));
                        break 'search;
                    }
                }
            }
            let (u1, u2, k1, k2, rest) = match found {
                Some(step) => step,
                None => panic!(
                    "seed traceback from ({},{}) found no loop at ({},{})",
                    start1, start2, i1, i2
                ),
            };
            if i1 != start1 {
                interaction.base_pairs.push((i1, i2));
            }
            if no_lp > 0 {
                interaction.base_pairs.push((i1 + 1, i2 + 1));
            }
            bp_in -= 1 + no_lp;
            i1 = k1;
            i2 = k2;
            u1max -= u1;
            u2max -= u2;
            cur_e = rest;
        }
        // Left pair of the last two-pair chain.
        if i1 != start1 {
            interaction.base_pairs.push((i1, i2));
        }
    }
    fn seed_e(&self, i1: usize, i2: usize) -> Energy {
        self.seed_record(i1, i2).0
    }
    fn seed_length1(&self, i1: usize, i2: usize) -> usize {
        decode_length1(self.seed_record(i1, i2).1, self.constraint.length_modulus())
    }
    fn seed_length2(&self, i1: usize, i2: usize) -> usize {
        decode_length2(self.seed_record(i1, i2).1, self.constraint.length_modulus())
    }
    fn as_idx_offset(&self) -> Option<&SeedHandlerIdxOffset<'a>> {
        None
    }
    fn into_idx_offset(
        self: Box<Self>,
    ) -> std::result::Result<SeedHandlerIdxOffset<'a>, Box<dyn SeedHandler<'a> + 'a>> {
        Err(self)
    }
}
