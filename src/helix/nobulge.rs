//! Helices of stacked base pairs, stored sparsely.
//!
//! Each diagonal is scanned from right to left while the stacking energies of the
//! current run are kept in a ring of `max_bp - 1` entries. Diagonals are
//! independent and run in parallel.
use super::{
    comparison_energy, exceeds_max_ed, is_pairable, seed_length_modulus, HelixHandler, Window,
};
use crate::constraint::{decode_length1, decode_length2, encode_length, HelixConstraint};
use crate::dptable::RingBuffer;
use crate::energy::{e_equal, is_inf, Energy, InteractionEnergy, E_INF};
use crate::error::{HelixError, Result};
use crate::interaction::{BasePair, Interaction};
use crate::seed::SeedHandler;
use rayon::prelude::*;
use std::collections::HashMap;

pub struct HelixHandlerNoBulgeMax<'a> {
    energy: &'a dyn InteractionEnergy,
    constraint: HelixConstraint,
    seed: Option<Box<dyn SeedHandler<'a> + 'a>>,
    // Left-most base pair -> (loop energy, encoded length).
    helix: HashMap<BasePair, (Energy, usize)>,
    helix_seed: HashMap<BasePair, (Energy, usize)>,
    seed_modulus: usize,
}

impl<'a> std::fmt::Debug for HelixHandlerNoBulgeMax<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HelixHandlerNoBulgeMax({}, {} helices)",
            self.constraint,
            self.helix.len()
        )
    }
}

// Best helices starting on the diagonal through (s1,s2).
fn fill_diagonal(
    energy: &dyn InteractionEnergy,
    c: &HelixConstraint,
    win: &Window,
    (s1, s2): BasePair,
) -> Vec<(BasePair, (Energy, usize))> {
    let modulus = c.length_modulus();
    let steps = (win.i1max + 1 - s1).min(win.i2max + 1 - s2);
    // recent(k) is the stack of (i+k, i+k+1).
    let mut stacks = RingBuffer::new(c.max_bp() - 1, 0.);
    let (mut cur_e, mut cur_len) = (E_INF, 0);
    let mut found = vec![];
    for o in (0..steps).rev() {
        let (i1, i2) = (s1 + o, s2 + o);
        if !is_pairable(energy, i1, i2) {
            stacks.clear();
            cur_e = E_INF;
            cur_len = 0;
            continue;
        }
        if is_inf(cur_e) {
            cur_e = 0.;
            cur_len = 1;
        } else {
            let stack = energy.e_inter_left(i1, i1 + 1, i2, i2 + 1);
            match stacks.push(stack) {
                Some(evicted) => cur_e -= evicted,
                None => cur_len += 1,
            }
            cur_e += stack;
        }
        let (mut best_loop, mut best_e, mut best_len) = (E_INF, E_INF, 0);
        let mut loop_e = cur_e;
        for len in (c.min_bp()..=cur_len).rev() {
            let (j1, j2) = (i1 + len - 1, i2 + len - 1);
            if !exceeds_max_ed(energy, c, (i1, j1), (i2, j2)) {
                let e = comparison_energy(energy, c, (i1, j1), (i2, j2), loop_e);
                if e < c.max_e() && e < best_e {
                    best_loop = loop_e;
                    best_e = e;
                    best_len = len;
                }
            }
            loop_e -= stacks.recent(len - 2);
        }
        if best_len != 0 {
            let length = encode_length(best_len, best_len, modulus);
            found.push(((i1, i2), (best_loop, length)));
        }
    }
    found
}

impl<'a> HelixHandlerNoBulgeMax<'a> {
    pub fn new(energy: &'a dyn InteractionEnergy, constraint: HelixConstraint) -> Self {
        Self {
            energy,
            constraint,
            seed: None,
            helix: HashMap::new(),
            helix_seed: HashMap::new(),
            seed_modulus: 1,
        }
    }
    pub fn with_seed_handler(mut self, seed: Box<dyn SeedHandler<'a> + 'a>) -> Self {
        self.seed = Some(seed);
        self
    }
    fn helix_record(&self, i1: usize, i2: usize) -> (Energy, usize) {
        self.helix.get(&(i1, i2)).copied().unwrap_or((E_INF, 0))
    }
    fn helix_seed_record(&self, i1: usize, i2: usize) -> (Energy, usize) {
        self.helix_seed
            .get(&(i1, i2))
            .copied()
            .unwrap_or((E_INF, 0))
    }
    fn stack_e(&self, i1: usize, i2: usize) -> Energy {
        self.energy.e_inter_left(i1, i1 + 1, i2, i2 + 1)
    }
}

impl<'a> HelixHandler<'a> for HelixHandlerNoBulgeMax<'a> {
    fn constraint(&self) -> &HelixConstraint {
        &self.constraint
    }
    fn energy(&self) -> &'a dyn InteractionEnergy {
        self.energy
    }
    fn fill_helix(&mut self, i1min: usize, i1max: usize, i2min: usize, i2max: usize) -> usize {
        let energy = self.energy;
        let c = self.constraint;
        self.helix.clear();
        let win = match Window::new(energy, i1min, i1max, i2min, i2max) {
            Some(win) => win,
            None => return 0,
        };
        trace!("fill helices along the diagonals of {:?} with {}", win, c);
        let starts: Vec<BasePair> = (win.i2min..=win.i2max)
            .map(|i2| (win.i1min, i2))
            .chain((win.i1min + 1..=win.i1max).map(|i1| (i1, win.i2min)))
            .collect();
        self.helix = starts
            .par_iter()
            .flat_map(|&start| fill_diagonal(energy, &c, &win, start))
            .collect();
        debug!("{} helices", self.helix.len());
        self.helix.len()
    }
    fn fill_helix_seed(
        &mut self,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> Result<usize> {
        let seed = self.seed.take().ok_or(HelixError::MissingSeedHandler)?;
        let count = self.fill_helix_seed_with(&*seed, i1min, i1max, i2min, i2max);
        self.seed = Some(seed);
        count
    }
    fn fill_helix_seed_with(
        &mut self,
        seed: &dyn SeedHandler<'a>,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> Result<usize> {
        let energy = self.energy;
        let c = self.constraint;
        let seed_bp = seed.constraint().bp();
        self.seed_modulus = seed_length_modulus(&c, seed.constraint());
        self.helix_seed.clear();
        let win = match Window::new(energy, i1min, i1max, i2min, i2max) {
            Some(win) if seed_bp <= c.max_bp() => win,
            _ => return Ok(0),
        };
        for (i1, i2) in win.starts_rev() {
            if !is_pairable(energy, i1, i2) {
                continue;
            }
            let room = (win.i1max + 1 - i1).min(win.i2max + 1 - i2);
            if room < seed_bp {
                continue;
            }
            let possible = room.min(c.max_bp()) - seed_bp;
            let mut best = (E_INF, E_INF, 0, 0);
            let mut lead_e = 0.;
            for lead in 0..=possible {
                let (s1, s2) = (i1 + lead, i2 + lead);
                if !win.contains(s1, s2) || !is_pairable(energy, s1, s2) {
                    break;
                }
                if lead > 0 {
                    lead_e += self.stack_e(s1 - 1, s2 - 1);
                }
                if !seed.is_seed_bound(s1, s2) {
                    continue;
                }
                let e1 = s1 + seed.seed_length1(s1, s2) - 1;
                let e2 = s2 + seed.seed_length2(s1, s2) - 1;
                let head_e = lead_e + seed.seed_e(s1, s2);
                let mut trail_e = 0.;
                for trail in 0..=possible - lead {
                    let (j1, j2) = (e1 + trail, e2 + trail);
                    if !win.contains(j1, j2) {
                        break;
                    }
                    if trail > 0 {
                        if !is_pairable(energy, j1, j2) {
                            break;
                        }
                        trail_e += self.stack_e(j1 - 1, j2 - 1);
                    }
                    if exceeds_max_ed(energy, &c, (i1, j1), (i2, j2)) {
                        continue;
                    }
                    let loop_e = head_e + trail_e;
                    let e = comparison_energy(energy, &c, (i1, j1), (i2, j2), loop_e);
                    if e < c.max_e() && e < best.1 && c.min_bp() <= lead + trail + seed_bp {
                        best = (loop_e, e, j1 + 1 - i1, j2 + 1 - i2);
                    }
                }
            }
            if !is_inf(best.1) {
                let length = encode_length(best.2, best.3, self.seed_modulus);
                self.helix_seed.insert((i1, i2), (best.0, length));
            }
        }
        debug!("{} helices with seed", self.helix_seed.len());
        Ok(self.helix_seed.len())
    }
    fn helix_e(&self, i1: usize, i2: usize) -> Energy {
        self.helix_record(i1, i2).0
    }
    fn helix_length1(&self, i1: usize, i2: usize) -> usize {
        decode_length1(self.helix_record(i1, i2).1, self.constraint.length_modulus())
    }
    fn helix_length2(&self, i1: usize, i2: usize) -> usize {
        decode_length2(self.helix_record(i1, i2).1, self.constraint.length_modulus())
    }
    fn helix_seed_e(&self, i1: usize, i2: usize) -> Energy {
        self.helix_seed_record(i1, i2).0
    }
    fn helix_seed_length1(&self, i1: usize, i2: usize) -> usize {
        decode_length1(self.helix_seed_record(i1, i2).1, self.seed_modulus)
    }
    fn helix_seed_length2(&self, i1: usize, i2: usize) -> usize {
        decode_length2(self.helix_seed_record(i1, i2).1, self.seed_modulus)
    }
    fn trace_back_helix(&self, interaction: &mut Interaction, i1: usize, i2: usize) {
        if is_inf(self.helix_e(i1, i2)) {
            return;
        }
        let len = self.helix_length1(i1, i2);
        for k in 1..len - 1 {
            interaction.base_pairs.push((i1 + k, i2 + k));
        }
    }
    fn trace_back_helix_seed(&self, interaction: &mut Interaction, i1: usize, i2: usize) {
        if let Some(seed) = self.seed.as_deref() {
            self.trace_back_helix_seed_with(seed, interaction, i1, i2);
        }
    }
    fn trace_back_helix_seed_with(
        &self,
        seed: &dyn SeedHandler<'a>,
        interaction: &mut Interaction,
        i1: usize,
        i2: usize,
    ) {
        let e = self.helix_seed_e(i1, i2);
        if is_inf(e) {
            return;
        }
        let (l1, l2) = (self.helix_seed_length1(i1, i2), self.helix_seed_length2(i1, i2));
        let (j1, j2) = (i1 + l1 - 1, i2 + l2 - 1);
        let seed_bp = seed.constraint().bp();
        let possible = l1.min(l2).min(self.constraint.max_bp()).saturating_sub(seed_bp);
        let mut lead_e = 0.;
        for lead in 0..=possible {
            let (s1, s2) = (i1 + lead, i2 + lead);
            if j1 < s1 || j2 < s2 || !is_pairable(self.energy, s1, s2) {
                break;
            }
            if lead > 0 {
                lead_e += self.stack_e(s1 - 1, s2 - 1);
            }
            if !seed.is_seed_bound(s1, s2) {
                continue;
            }
            let e1 = s1 + seed.seed_length1(s1, s2) - 1;
            let e2 = s2 + seed.seed_length2(s1, s2) - 1;
            if j1 < e1 || j2 < e2 || j1 - e1 != j2 - e2 {
                continue;
            }
            let trail = j1 - e1;
            let trail_e = (0..trail).map(|t| self.stack_e(e1 + t, e2 + t)).sum::<Energy>();
            if e_equal(e, lead_e + seed.seed_e(s1, s2) + trail_e) {
                for k in 1..=lead {
                    interaction.base_pairs.push((i1 + k, i2 + k));
                }
                seed.trace_back_seed(interaction, s1, s2);
                for t in 0..trail {
                    interaction.base_pairs.push((e1 + t, e2 + t));
                }
                return;
            }
        }
        panic!(
            "no helix with seed at ({},{}) matches E={} and lengths {},{}",
            i1, i2, e, l1, l2
        );
    }
    fn set_seed_handler(&mut self, seed: Box<dyn SeedHandler<'a> + 'a>) -> Result<()> {
        self.seed = Some(seed);
        Ok(())
    }
    fn seed_handler(&self) -> Option<&(dyn SeedHandler<'a> + 'a)> {
        self.seed.as_deref()
    }
    fn seed_handler_mut(&mut self) -> Option<&mut (dyn SeedHandler<'a> + 'a)> {
        self.seed.as_deref_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::SeedConstraint;
    use crate::energy::BasePairEnergy;
    use crate::helix::tests::{check_helix_tracebacks, check_seed_tracebacks, random_seq};
    use crate::helix::HelixHandlerStackingOnly;
    use crate::seed::SeedHandlerMfe;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    const SEED: u64 = 1293890;
    #[test]
    fn diagonal_helices() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let mut handler = HelixHandlerNoBulgeMax::new(&energy, constraint);
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 16);
        assert_eq!(handler.helix_e(0, 0), -3.);
        assert_eq!(handler.helix_length1(0, 0), 4);
        assert_eq!(handler.helix_e(0, 2), -2.);
        assert_eq!(handler.helix_e(3, 0), -1.);
        assert!(is_inf(handler.helix_e(4, 4)));
        assert_eq!(handler.helix_length2(4, 4), 0);
        let mut interaction = Interaction::new();
        handler.trace_back_helix(&mut interaction, 0, 0);
        assert_eq!(interaction.base_pairs, vec![(1, 1), (2, 2)]);
        // Same as the fill twice.
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 16);
        assert_eq!(handler.fill_helix(3, 1, 0, 4), 0);
        assert!(is_inf(handler.helix_e(0, 0)));
    }
    #[test]
    fn same_as_dense_stacking() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 40);
            let seq2 = random_seq(&mut rng, 35);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = HelixConstraint::new(2, 5, 0, 999., -2.5, false).unwrap();
            let mut sparse = HelixHandlerNoBulgeMax::new(&energy, constraint);
            let mut dense = HelixHandlerStackingOnly::new(&energy, constraint);
            let count = sparse.fill_helix(3, 36, 2, 30);
            assert_eq!(count, dense.fill_helix(3, 36, 2, 30));
            for i1 in 0..40 {
                for i2 in 0..35 {
                    let (x, y) = (sparse.helix_e(i1, i2), dense.helix_e(i1, i2));
                    assert!(x == y || (is_inf(x) && is_inf(y)), "{},{}", x, y);
                    assert_eq!(sparse.helix_length1(i1, i2), dense.helix_length1(i1, i2));
                }
            }
            assert_eq!(check_helix_tracebacks(&energy, &sparse, 40, 35), count);
        }
    }
    #[test]
    fn seeded_helices() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(3, 0).unwrap());
        seed.fill_seed(0, 4, 0, 4);
        let mut handler = HelixHandlerNoBulgeMax::new(&energy, constraint);
        assert!(handler.fill_helix_seed(0, 4, 0, 4).is_err());
        handler.set_seed_handler(Box::new(seed)).unwrap();
        assert_eq!(handler.fill_helix_seed(0, 4, 0, 4), Ok(9));
        assert_eq!(handler.helix_seed_e(0, 0), -3.);
        assert_eq!(handler.helix_seed_length2(0, 0), 4);
        assert_eq!(handler.helix_seed_e(1, 2), -2.);
        let mut interaction = Interaction::new();
        handler.trace_back_helix_seed(&mut interaction, 0, 0);
        assert_eq!(interaction.base_pairs, vec![(1, 1), (2, 2)]);
        assert_eq!(check_seed_tracebacks(&energy, &handler, 5, 5), 9);
    }
    #[test]
    fn random_seeded_tracebacks() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 30);
            let seq2 = random_seq(&mut rng, 30);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = HelixConstraint::new(3, 8, 0, 999., 0., false).unwrap();
            let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(3, 0).unwrap());
            seed.fill_seed(0, 29, 0, 29);
            let mut dense = HelixHandlerStackingOnly::new(&energy, constraint);
            let count = dense.fill_helix_seed_with(&seed, 0, 29, 0, 29).unwrap();
            let mut handler =
                HelixHandlerNoBulgeMax::new(&energy, constraint).with_seed_handler(Box::new(seed));
            assert_eq!(handler.fill_helix_seed(0, 29, 0, 29), Ok(count));
            for i1 in 0..30 {
                for i2 in 0..30 {
                    let (x, y) = (handler.helix_seed_e(i1, i2), dense.helix_seed_e(i1, i2));
                    assert!(x == y || (is_inf(x) && is_inf(y)));
                }
            }
            assert_eq!(check_seed_tracebacks(&energy, &handler, 30, 30), count);
        }
    }
}
