//! Helices of stacked base pairs only.
//!
//! `rec[i1][i2][bp]` is the loop energy of the `bp` base pairs stacked on the
//! diagonal from (i1,i2). The helix and the seed table each keep their own.
use super::{
    comparison_energy, exceeds_max_ed, is_pairable, seed_length_modulus, HelixHandler, Window,
};
use crate::constraint::{decode_length1, decode_length2, encode_length, HelixConstraint};
use crate::dptable::{DPTable, RecTable};
use crate::energy::{e_equal, is_inf, Energy, InteractionEnergy, E_INF};
use crate::error::{HelixError, Result};
use crate::interaction::Interaction;
use crate::seed::SeedHandler;

pub struct HelixHandlerStackingOnly<'a> {
    energy: &'a dyn InteractionEnergy,
    constraint: HelixConstraint,
    seed: Option<Box<dyn SeedHandler<'a> + 'a>>,
    rec: Stacks,
    seed_rec: Stacks,
    // (loop energy, encoded length), window relative.
    helix: DPTable<(Energy, usize)>,
    helix_window: Window,
    helix_seed: DPTable<(Energy, usize)>,
    helix_seed_window: Window,
    seed_modulus: usize,
}

impl<'a> std::fmt::Debug for HelixHandlerStackingOnly<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HelixHandlerStackingOnly({})", self.constraint)
    }
}

// Stacked loop energies with the window they were filled for.
struct Stacks {
    rec: RecTable<Energy, 3>,
    window: Option<Window>,
}

impl Stacks {
    fn new() -> Self {
        Self {
            rec: RecTable::new([0; 3], E_INF),
            window: None,
        }
    }
    /// Loop energy of `bp` stacked pairs from (i1,i2). Zero for fewer than two pairs.
    fn get(&self, i1: usize, i2: usize, bp: usize) -> Energy {
        if bp <= 1 {
            return 0.;
        }
        match self.window {
            Some(win) => {
                let (r1, r2) = win.cell(i1, i2);
                self.rec.get([r1, r2, bp])
            }
            None => E_INF,
        }
    }
    fn fill(&mut self, energy: &dyn InteractionEnergy, max_bp: usize, win: Window) {
        if self.window == Some(win) {
            return;
        }
        self.rec
            .initialize([win.width1(), win.width2(), max_bp + 1], E_INF);
        self.window = Some(win);
        for (i1, i2) in win.starts_rev() {
            if !is_pairable(energy, i1, i2) {
                continue;
            }
            let (r1, r2) = win.cell(i1, i2);
            for bp in 2..=max_bp {
                let (j1, j2) = (i1 + bp - 1, i2 + bp - 1);
                if !win.contains(j1, j2) || !is_pairable(energy, j1, j2) {
                    break;
                }
                let stack = energy.e_inter_left(i1, i1 + 1, i2, i2 + 1);
                let e = if bp == 2 {
                    stack
                } else {
                    stack + self.get(i1 + 1, i2 + 1, bp - 1)
                };
                if !is_inf(e) {
                    self.rec.set([r1, r2, bp], e);
                }
            }
        }
    }
}

impl<'a> HelixHandlerStackingOnly<'a> {
    pub fn new(energy: &'a dyn InteractionEnergy, constraint: HelixConstraint) -> Self {
        Self {
            energy,
            constraint,
            seed: None,
            rec: Stacks::new(),
            seed_rec: Stacks::new(),
            helix: DPTable::new(0, 0, (E_INF, 0)),
            helix_window: Window::default(),
            helix_seed: DPTable::new(0, 0, (E_INF, 0)),
            helix_seed_window: Window::default(),
            seed_modulus: 1,
        }
    }
    pub fn with_seed_handler(mut self, seed: Box<dyn SeedHandler<'a> + 'a>) -> Self {
        self.seed = Some(seed);
        self
    }
    fn helix_record(&self, i1: usize, i2: usize) -> (Energy, usize) {
        let (r1, r2) = self.helix_window.cell(i1, i2);
        self.helix.get(r1, r2)
    }
    fn helix_seed_record(&self, i1: usize, i2: usize) -> (Energy, usize) {
        let (r1, r2) = self.helix_seed_window.cell(i1, i2);
        self.helix_seed.get(r1, r2)
    }
    // Inner pairs of `bp` stacked pairs from (i1,i2).
    fn trace_stack(interaction: &mut Interaction, i1: usize, i2: usize, bp: usize) {
        for k in 1..bp.saturating_sub(1) {
            interaction.base_pairs.push((i1 + k, i2 + k));
        }
    }
    // Leading and trailing base pairs around a seed of `seed_bp` pairs starting at most at (i1,i2).
    fn room(win: &Window, i1: usize, i2: usize, max_bp: usize, seed_bp: usize) -> Option<usize> {
        let room = (win.i1max + 1 - i1).min(win.i2max + 1 - i2);
        if room < seed_bp {
            None
        } else {
            Some(room.min(max_bp) - seed_bp)
        }
    }
}

impl<'a> HelixHandler<'a> for HelixHandlerStackingOnly<'a> {
    fn constraint(&self) -> &HelixConstraint {
        &self.constraint
    }
    fn energy(&self) -> &'a dyn InteractionEnergy {
        self.energy
    }
    fn fill_helix(&mut self, i1min: usize, i1max: usize, i2min: usize, i2max: usize) -> usize {
        let energy = self.energy;
        let win = match Window::new(energy, i1min, i1max, i2min, i2max) {
            Some(win) => win,
            None => {
                self.helix.initialize(0, 0, (E_INF, 0));
                return 0;
            }
        };
        trace!("fill stacked helices in {:?} with {}", win, self.constraint);
        self.rec.fill(energy, self.constraint.max_bp(), win);
        let c = self.constraint;
        let modulus = c.length_modulus();
        self.helix
            .initialize(win.width1(), win.width2(), (E_INF, 0));
        self.helix_window = win;
        let mut count = 0;
        for (i1, i2) in win.starts_rev() {
            if !is_pairable(energy, i1, i2) {
                continue;
            }
            let (mut best_e, mut best_bp) = (E_INF, 0);
            for bp in c.min_bp()..=c.max_bp() {
                let (j1, j2) = (i1 + bp - 1, i2 + bp - 1);
                if !win.contains(j1, j2) {
                    break;
                }
                let loop_e = self.rec.get(i1, i2, bp);
                if is_inf(loop_e) || exceeds_max_ed(energy, &c, (i1, j1), (i2, j2)) {
                    continue;
                }
                let e = comparison_energy(energy, &c, (i1, j1), (i2, j2), loop_e);
                if e < best_e {
                    best_e = e;
                    best_bp = bp;
                }
            }
            if best_bp != 0 && best_e < c.max_e() {
                let (r1, r2) = win.cell(i1, i2);
                let record = (
                    self.rec.get(i1, i2, best_bp),
                    encode_length(best_bp, best_bp, modulus),
                );
                self.helix.set(r1, r2, record);
                count += 1;
            }
        }
        debug!("{} stacked helices", count);
        count
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
        let win = match Window::new(energy, i1min, i1max, i2min, i2max) {
            Some(win) if seed_bp <= c.max_bp() => win,
            _ => {
                self.helix_seed.initialize(0, 0, (E_INF, 0));
                return Ok(0);
            }
        };
        self.seed_rec.fill(energy, c.max_bp(), win);
        self.helix_seed
            .initialize(win.width1(), win.width2(), (E_INF, 0));
        self.helix_seed_window = win;
        let mut count = 0;
        for (i1, i2) in win.starts_rev() {
            if !is_pairable(energy, i1, i2) {
                continue;
            }
            let possible = match Self::room(&win, i1, i2, c.max_bp(), seed_bp) {
                Some(p) => p,
                None => continue,
            };
            let mut best = (E_INF, E_INF, 0, 0);
            for lead in 0..=possible {
                let (s1, s2) = (i1 + lead, i2 + lead);
                if !win.contains(s1, s2) || !is_pairable(energy, s1, s2) {
                    break;
                }
                if !seed.is_seed_bound(s1, s2) {
                    continue;
                }
                let (len1, len2) = (seed.seed_length1(s1, s2), seed.seed_length2(s1, s2));
                let (e1, e2) = (s1 + len1 - 1, s2 + len2 - 1);
                let head_e = self.seed_rec.get(i1, i2, lead + 1) + seed.seed_e(s1, s2);
                for trail in 0..=possible - lead {
                    let (j1, j2) = (e1 + trail, e2 + trail);
                    if !win.contains(j1, j2) {
                        break;
                    }
                    let tail_e = self.seed_rec.get(e1, e2, trail + 1);
                    if trail != 0 && is_inf(tail_e) {
                        break;
                    }
                    if exceeds_max_ed(energy, &c, (i1, j1), (i2, j2)) {
                        continue;
                    }
                    let loop_e = head_e + tail_e;
                    let e = comparison_energy(energy, &c, (i1, j1), (i2, j2), loop_e);
                    if e < best.1 && !e_equal(e, best.1) && c.min_bp() <= lead + trail + seed_bp {
                        best = (loop_e, e, j1 + 1 - i1, j2 + 1 - i2);
                    }
                }
            }
            if !is_inf(best.1) && best.1 < c.max_e() {
                let (r1, r2) = win.cell(i1, i2);
                let length = encode_length(best.2, best.3, self.seed_modulus);
                self.helix_seed.set(r1, r2, (best.0, length));
                count += 1;
            }
        }
        debug!("{} stacked helices with seed", count);
        Ok(count)
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
        Self::trace_stack(interaction, i1, i2, self.helix_length1(i1, i2));
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
        let win = self.helix_seed_window;
        let seed_bp = seed.constraint().bp();
        let possible = Self::room(&win, i1, i2, self.constraint.max_bp(), seed_bp).unwrap_or(0);
        for lead in 0..=possible {
            let (s1, s2) = (i1 + lead, i2 + lead);
            if !win.contains(s1, s2) || !is_pairable(self.energy, s1, s2) {
                break;
            }
            if !seed.is_seed_bound(s1, s2) {
                continue;
            }
            let (len1, len2) = (seed.seed_length1(s1, s2), seed.seed_length2(s1, s2));
            let (e1, e2) = (s1 + len1 - 1, s2 + len2 - 1);
            let head_e = self.seed_rec.get(i1, i2, lead + 1) + seed.seed_e(s1, s2);
            for trail in 0..=possible - lead {
                if !win.contains(e1 + trail, e2 + trail) {
                    break;
                }
                let tail_e = self.seed_rec.get(e1, e2, trail + 1);
                if trail != 0 && is_inf(tail_e) {
                    break;
                }
                let matched = e_equal(e, head_e + tail_e)
                    && l1 == lead + len1 + trail
                    && l2 == lead + len2 + trail;
                if matched {
                    if lead != 0 {
                        Self::trace_stack(interaction, i1, i2, lead + 1);
                        interaction.base_pairs.push((s1, s2));
                    }
                    seed.trace_back_seed(interaction, s1, s2);
                    if trail != 0 {
                        interaction.base_pairs.push((e1, e2));
                        Self::trace_stack(interaction, e1, e2, trail + 1);
                    }
                    return;
                }
            }
        }
        panic!(
            "no stacked helix with seed at ({},{}) matches E={} and lengths {},{}",
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
    use crate::seed::SeedHandlerMfe;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    const SEED: u64 = 1293890;
    #[test]
    fn stacked_helices() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let mut handler = HelixHandlerStackingOnly::new(&energy, constraint);
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 16);
        assert_eq!(handler.helix_e(0, 0), -3.);
        assert_eq!(handler.helix_length1(0, 0), 4);
        assert_eq!(handler.helix_length2(0, 0), 4);
        assert_eq!(handler.helix_e(0, 1), -3.);
        assert_eq!(handler.helix_e(0, 2), -2.);
        assert_eq!(handler.helix_length1(0, 2), 3);
        assert_eq!(handler.helix_e(0, 3), -1.);
        assert_eq!(handler.helix_length2(0, 3), 2);
        assert!(is_inf(handler.helix_e(4, 4)));
        assert!(is_inf(handler.helix_e(0, 4)));
        assert_eq!(handler.helix_length1(4, 4), 0);
        assert!(is_inf(handler.helix_e(7, 7)));
        let mut interaction = Interaction::new();
        handler.trace_back_helix(&mut interaction, 0, 0);
        assert_eq!(interaction.base_pairs, vec![(1, 1), (2, 2)]);
        let mut interaction = Interaction::new();
        handler.trace_back_helix(&mut interaction, 2, 1);
        assert_eq!(interaction.base_pairs, vec![(3, 2)]);
        let mut interaction = Interaction::new();
        handler.trace_back_helix(&mut interaction, 4, 4);
        assert!(interaction.is_empty());
    }
    #[test]
    fn mismatch_truncates() {
        let constraint = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let full = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let broken = BasePairEnergy::new(b"GGAGG", b"CCCCC").unwrap();
        let mut handler = HelixHandlerStackingOnly::new(&full, constraint);
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 16);
        let mut handler = HelixHandlerStackingOnly::new(&broken, constraint);
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 8);
        assert_eq!(handler.helix_length1(0, 0), 2);
        assert!(is_inf(handler.helix_e(1, 0)));
        assert!(is_inf(handler.helix_e(2, 0)));
    }
    #[test]
    fn windows_and_bounds() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let mut handler = HelixHandlerStackingOnly::new(&energy, constraint);
        assert_eq!(handler.fill_helix(3, 2, 0, 4), 0);
        assert_eq!(handler.fill_helix(1, 3, 1, 3), 4);
        assert_eq!(handler.helix_e(1, 1), -2.);
        assert!(is_inf(handler.helix_e(0, 0)));
        // The energy bound is strict.
        let tight = |max_e| HelixConstraint::new(2, 4, 0, 999., max_e, false).unwrap();
        let mut handler = HelixHandlerStackingOnly::new(&energy, tight(-4.));
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 0);
        let mut handler = HelixHandlerStackingOnly::new(&energy, tight(-3.5));
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 4);
        assert_eq!(handler.helix_e(1, 1), -3.);
        assert!(is_inf(handler.helix_e(0, 2)));
    }
    #[test]
    fn monotone_in_max_bp() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 25);
            let seq2 = random_seq(&mut rng, 25);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let short = HelixConstraint::new(2, 3, 0, 999., 0., false).unwrap();
            let long = HelixConstraint::new(2, 6, 0, 999., 0., false).unwrap();
            let mut short = HelixHandlerStackingOnly::new(&energy, short);
            let mut long = HelixHandlerStackingOnly::new(&energy, long);
            let count = short.fill_helix(0, 24, 0, 24);
            assert_eq!(long.fill_helix(0, 24, 0, 24), count);
            for i1 in 0..25 {
                for i2 in 0..25 {
                    assert!(long.helix_e(i1, i2) <= short.helix_e(i1, i2));
                }
            }
            check_helix_tracebacks(&energy, &long, 25, 25);
        }
    }
    #[test]
    fn seeded_helices() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(3, 0).unwrap());
        let mut handler = HelixHandlerStackingOnly::new(&energy, constraint);
        assert_eq!(
            handler.fill_helix_seed(0, 4, 0, 4),
            Err(HelixError::MissingSeedHandler)
        );
        handler.set_seed_handler(Box::new(seed)).unwrap();
        if let Some(seed) = handler.seed_handler_mut() {
            assert_eq!(seed.fill_seed(0, 4, 0, 4), 9);
        }
        assert_eq!(handler.fill_helix_seed(0, 4, 0, 4), Ok(9));
        assert_eq!(handler.helix_seed_e(0, 0), -3.);
        assert_eq!(handler.helix_seed_length1(0, 0), 4);
        assert_eq!(handler.helix_seed_e(2, 2), -2.);
        assert!(is_inf(handler.helix_seed_e(3, 0)));
        let mut interaction = Interaction::new();
        handler.trace_back_helix_seed(&mut interaction, 0, 0);
        assert_eq!(interaction.base_pairs, vec![(1, 1), (2, 2)]);
        check_seed_tracebacks(&energy, &handler, 5, 5);
        // A seed longer than the helix bound gives no helices.
        let mut long = SeedHandlerMfe::new(&energy, SeedConstraint::new(5, 0).unwrap());
        long.fill_seed(0, 4, 0, 4);
        assert_eq!(handler.fill_helix_seed_with(&long, 0, 4, 0, 4), Ok(0));
    }
    #[test]
    fn seeds_need_exact_runs() {
        let energy = BasePairEnergy::new(b"GGAGGAGG", b"CCCCCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 6, 0, 999., 0., false).unwrap();
        let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(3, 0).unwrap());
        assert_eq!(seed.fill_seed(0, 7, 0, 7), 0);
        let mut handler = HelixHandlerStackingOnly::new(&energy, constraint);
        assert!(handler.fill_helix(0, 7, 0, 7) > 0);
        assert_eq!(handler.fill_helix_seed_with(&seed, 0, 7, 0, 7), Ok(0));
    }
    #[test]
    fn random_seeded_tracebacks() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 30);
            let seq2 = random_seq(&mut rng, 30);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = HelixConstraint::new(2, 8, 0, 999., 0., false).unwrap();
            let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(3, 0).unwrap());
            seed.fill_seed(0, 29, 0, 29);
            let mut handler =
                HelixHandlerStackingOnly::new(&energy, constraint).with_seed_handler(Box::new(seed));
            handler.fill_helix(0, 29, 0, 29);
            let first = handler.fill_helix_seed(0, 29, 0, 29).unwrap();
            let count = handler.fill_helix_seed(0, 29, 0, 29).unwrap();
            assert_eq!(first, count);
            check_seed_tracebacks(&energy, &handler, 30, 30);
            check_helix_tracebacks(&energy, &handler, 30, 30);
            assert!(count <= handler.fill_helix(0, 29, 0, 29));
        }
    }
    #[test]
    fn helix_fill_on_other_window() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 10);
            let seq2 = random_seq(&mut rng, 9);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = HelixConstraint::new(2, 6, 0, 999., 0., false).unwrap();
            let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(2, 0).unwrap());
            seed.fill_seed(0, 9, 0, 8);
            let mut handler = HelixHandlerStackingOnly::new(&energy, constraint)
                .with_seed_handler(Box::new(seed));
            let seeded = handler.fill_helix_seed(0, 9, 0, 8).unwrap();
            let count = handler.fill_helix(3, 9, 3, 8);
            assert_eq!(check_seed_tracebacks(&energy, &handler, 10, 9), seeded);
            assert_eq!(check_helix_tracebacks(&energy, &handler, 10, 9), count);
        }
    }
}

