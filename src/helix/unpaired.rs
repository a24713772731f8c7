//! Helices whose consecutive base pairs may enclose internal loops.
//!
//! `rec[i1][i2][bp]` holds the loop energy and encoded length of the best chain
//! of exactly `bp` base pairs from (i1,i2), each loop having at most `max_il`
//! unpaired bases in total. The helix table keeps, per start, the base-pair
//! count that gave its best energy. The seed table keeps a tensor of its own,
//! so both tables trace back after fills over different windows.
use super::{
    comparison_energy, exceeds_max_ed, is_pairable, seed_length_modulus, HelixHandler, Window,
};
use crate::constraint::{decode_length1, decode_length2, encode_length, HelixConstraint};
use crate::dptable::{DPTable, RecTable};
use crate::energy::{e_equal, is_inf, Energy, InteractionEnergy, E_INF};
use crate::error::{HelixError, Result};
use crate::interaction::Interaction;
use crate::seed::SeedHandler;

pub struct HelixHandlerUnpaired<'a> {
    energy: &'a dyn InteractionEnergy,
    constraint: HelixConstraint,
    seed: Option<Box<dyn SeedHandler<'a> + 'a>>,
    rec: Chains,
    seed_rec: Chains,
    // (loop energy, encoded length, base pairs)
    helix: DPTable<(Energy, usize, usize)>,
    helix_window: Window,
    helix_seed: DPTable<(Energy, usize)>,
    helix_seed_window: Window,
    seed_modulus: usize,
}

impl<'a> std::fmt::Debug for HelixHandlerUnpaired<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HelixHandlerUnpaired({})", self.constraint)
    }
}

// Best chains per start and base-pair count, with the window they were filled for.
struct Chains {
    rec: RecTable<(Energy, usize), 3>,
    window: Option<Window>,
    modulus: usize,
}

impl Chains {
    fn new() -> Self {
        Self {
            rec: RecTable::new([0; 3], (E_INF, 0)),
            window: None,
            modulus: 1,
        }
    }
    /// Loop energy and lengths of the best chain of `bp` pairs from (i1,i2).
    fn entry(&self, i1: usize, i2: usize, bp: usize) -> (Energy, usize, usize) {
        let win = match self.window {
            Some(win) if bp >= 2 => win,
            _ => return (E_INF, 0, 0),
        };
        let (r1, r2) = win.cell(i1, i2);
        let (e, length) = self.rec.get([r1, r2, bp]);
        (e, decode_length1(length, self.modulus), decode_length2(length, self.modulus))
    }
    fn fill(&mut self, energy: &dyn InteractionEnergy, c: &HelixConstraint, win: Window) {
        if self.window == Some(win) {
            return;
        }
        let max_bp = c.max_bp();
        let max_il = c.max_il();
        let modulus = c.length_modulus();
        self.modulus = modulus;
        self.rec
            .initialize([win.width1(), win.width2(), max_bp + 1], (E_INF, 0));
        self.window = Some(win);
        for (i1, i2) in win.starts_rev() {
            if !is_pairable(energy, i1, i2) {
                continue;
            }
            let (r1, r2) = win.cell(i1, i2);
            for bp in 2..=max_bp {
                if !win.contains(i1 + bp - 1, i2 + bp - 1) {
                    break;
                }
                let mut best = (E_INF, 0);
                for u1 in 0..=max_il {
                    let k1 = i1 + u1 + 1;
                    if win.i1max < k1 {
                        break;
                    }
                    for u2 in 0..=max_il - u1 {
                        let k2 = i2 + u2 + 1;
                        if win.i2max < k2 {
                            break;
                        }
                        if !is_pairable(energy, k1, k2) {
                            continue;
                        }
                        let loop_e = energy.e_inter_left(i1, k1, i2, k2);
                        let (e, l1, l2) = if bp == 2 {
                            (loop_e, 2 + u1, 2 + u2)
                        } else {
                            let (rest, rest1, rest2) = self.entry(k1, k2, bp - 1);
                            if is_inf(rest) || !win.contains(i1 + u1 + rest1, i2 + u2 + rest2) {
                                continue;
                            }
                            (loop_e + rest, u1 + rest1 + 1, u2 + rest2 + 1)
                        };
                        if e < best.0 {
                            best = (e, encode_length(l1, l2, modulus));
                        }
                    }
                }
                if !is_inf(best.0) {
                    self.rec.set([r1, r2, bp], best);
                }
            }
        }
    }
}

impl<'a> HelixHandlerUnpaired<'a> {
    pub fn new(energy: &'a dyn InteractionEnergy, constraint: HelixConstraint) -> Self {
        Self {
            energy,
            constraint,
            seed: None,
            rec: Chains::new(),
            seed_rec: Chains::new(),
            helix: DPTable::new(0, 0, (E_INF, 0, 0)),
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
    fn helix_record(&self, i1: usize, i2: usize) -> (Energy, usize, usize) {
        let (r1, r2) = self.helix_window.cell(i1, i2);
        self.helix.get(r1, r2)
    }
    fn helix_seed_record(&self, i1: usize, i2: usize) -> (Energy, usize) {
        let (r1, r2) = self.helix_seed_window.cell(i1, i2);
        self.helix_seed.get(r1, r2)
    }
    // Inner pairs of the chain of `bp` pairs from (i1,i2), re-derived from the tensor.
    fn trace_rec(
        &self,
        rec: &Chains,
        interaction: &mut Interaction,
        i1: usize,
        i2: usize,
        bp: usize,
    ) {
        let energy = self.energy;
        let max_il = self.constraint.max_il();
        let (mut x1, mut x2) = (i1, i2);
        let (mut e, mut l1, mut l2) = rec.entry(i1, i2, bp);
        for cur in (3..=bp).rev() {
            let mut next = None;
            'search: for u1 in 0..=max_il {
                for u2 in 0..=max_il - u1 {
                    let (k1, k2) = (x1 + u1 + 1, x2 + u2 + 1);
                    let (rest, rest1, rest2) = rec.entry(k1, k2, cur - 1);
                    if is_inf(rest) || l1 != u1 + rest1 + 1 || l2 != u2 + rest2 + 1 {
                        continue;
                    }
                    if e_equal(e, energy.e_inter_left(x1, k1, x2, k2) + rest) {
                        next = Some((k1, k2, rest, rest1, rest2));
                        break 'search;
                    }
                }
            }
            let (k1, k2, rest, rest1, rest2) = match next {
                Some(next) => next,
                None => panic!(
                    "no loop from ({},{}) matches E={} with {} base pairs left",
                    x1, x2, e, cur
                ),
            };
            if (x1, x2) != (i1, i2) {
                interaction.base_pairs.push((x1, x2));
            }
            x1 = k1;
            x2 = k2;
            e = rest;
            l1 = rest1;
            l2 = rest2;
        }
        if (x1, x2) != (i1, i2) {
            interaction.base_pairs.push((x1, x2));
        }
    }
    // Seed start and loop energy for `lead` base pairs before the seed.
    fn lead_part(
        rec: &Chains,
        i1: usize,
        i2: usize,
        lead: usize,
    ) -> Option<(usize, usize, Energy)> {
        if lead == 0 {
            return Some((i1, i2, 0.));
        }
        let (e, l1, l2) = rec.entry(i1, i2, lead + 1);
        if is_inf(e) {
            None
        } else {
            Some((i1 + l1 - 1, i2 + l2 - 1, e))
        }
    }
}

impl<'a> HelixHandler<'a> for HelixHandlerUnpaired<'a> {
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
                self.helix.initialize(0, 0, (E_INF, 0, 0));
                return 0;
            }
        };
        trace!("fill helices in {:?} with {}", win, self.constraint);
        self.rec.fill(energy, &self.constraint, win);
        let c = self.constraint;
        let modulus = c.length_modulus();
        self.helix
            .initialize(win.width1(), win.width2(), (E_INF, 0, 0));
        self.helix_window = win;
        let mut count = 0;
        for (i1, i2) in win.starts_rev() {
            if !is_pairable(energy, i1, i2) {
                continue;
            }
            let mut best = (E_INF, E_INF, 0, 0, 0);
            for bp in c.min_bp()..=c.max_bp() {
                let (loop_e, l1, l2) = self.rec.entry(i1, i2, bp);
                if is_inf(loop_e) {
                    continue;
                }
                let (j1, j2) = (i1 + l1 - 1, i2 + l2 - 1);
                if exceeds_max_ed(energy, &c, (i1, j1), (i2, j2)) {
                    continue;
                }
                let e = comparison_energy(energy, &c, (i1, j1), (i2, j2), loop_e);
                if e < c.max_e() && e < best.1 && !e_equal(e, best.1) {
                    best = (loop_e, e, l1, l2, bp);
                }
            }
            if best.4 != 0 {
                let (r1, r2) = win.cell(i1, i2);
                let length = encode_length(best.2, best.3, modulus);
                self.helix.set(r1, r2, (best.0, length, best.4));
                count += 1;
            }
        }
        debug!("{} helices", count);
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
        self.seed_rec.fill(energy, &c, win);
        let rec = &self.seed_rec;
        self.helix_seed
            .initialize(win.width1(), win.width2(), (E_INF, 0));
        self.helix_seed_window = win;
        let mut count = 0;
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
            for lead in (0..=possible).rev() {
                let (s1, s2, lead_e) = match Self::lead_part(rec, i1, i2, lead) {
                    Some(part) => part,
                    None => continue,
                };
                if !win.contains(s1, s2) || !seed.is_seed_bound(s1, s2) {
                    continue;
                }
                let e1 = s1 + seed.seed_length1(s1, s2) - 1;
                let e2 = s2 + seed.seed_length2(s1, s2) - 1;
                let head_e = lead_e + seed.seed_e(s1, s2);
                for trail in (0..=possible - lead).rev() {
                    let (j1, j2, trail_e) = match Self::lead_part(rec, e1, e2, trail) {
                        Some(part) => part,
                        None => continue,
                    };
                    if !win.contains(j1, j2) || exceeds_max_ed(energy, &c, (i1, j1), (i2, j2)) {
                        continue;
                    }
                    let loop_e = head_e + trail_e;
                    let e = comparison_energy(energy, &c, (i1, j1), (i2, j2), loop_e);
                    // Later candidates of equal energy win.
                    if (e < best.1 || e_equal(e, best.1)) && c.min_bp() <= lead + trail + seed_bp {
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
        debug!("{} helices with seed", count);
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
        let (e, _, bp) = self.helix_record(i1, i2);
        if is_inf(e) {
            return;
        }
        self.trace_rec(&self.rec, interaction, i1, i2, bp);
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
        let room = (win.i1max + 1 - i1).min(win.i2max + 1 - i2);
        let possible = room.min(self.constraint.max_bp()).saturating_sub(seed_bp);
        for lead in 0..=possible {
            let (s1, s2, lead_e) = match Self::lead_part(&self.seed_rec, i1, i2, lead) {
                Some(part) => part,
                None => continue,
            };
            if !win.contains(s1, s2) || !seed.is_seed_bound(s1, s2) {
                continue;
            }
            let e1 = s1 + seed.seed_length1(s1, s2) - 1;
            let e2 = s2 + seed.seed_length2(s1, s2) - 1;
            let head_e = lead_e + seed.seed_e(s1, s2);
            for trail in 0..=possible - lead {
                let (j1, j2, trail_e) = match Self::lead_part(&self.seed_rec, e1, e2, trail) {
                    Some(part) => part,
                    None => continue,
                };
                if j1 + 1 - i1 != l1 || j2 + 1 - i2 != l2 || !e_equal(e, head_e + trail_e) {
                    continue;
                }
                if lead != 0 {
                    self.trace_rec(&self.seed_rec, interaction, i1, i2, lead + 1);
                    interaction.base_pairs.push((s1, s2));
                }
                seed.trace_back_seed(interaction, s1, s2);
                if trail != 0 {
                    interaction.base_pairs.push((e1, e2));
                    self.trace_rec(&self.seed_rec, interaction, e1, e2, trail + 1);
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
    fn stacks_without_loops() {
        let energy = BasePairEnergy::new(b"GGGGG", b"CCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let mut handler = HelixHandlerUnpaired::new(&energy, constraint);
        assert_eq!(handler.fill_helix(0, 4, 0, 4), 16);
        assert_eq!(handler.helix_e(0, 0), -3.);
        assert_eq!(handler.helix_length1(0, 0), 4);
        assert_eq!(handler.helix_e(0, 2), -2.);
        assert!(is_inf(handler.helix_e(4, 4)));
        let mut interaction = Interaction::new();
        handler.trace_back_helix(&mut interaction, 0, 0);
        assert_eq!(interaction.base_pairs, vec![(1, 1), (2, 2)]);
    }
    #[test]
    fn bulged_helices() {
        // The A in the first sequence can only be bulged out.
        let energy = BasePairEnergy::new(b"GGAGG", b"CCCC").unwrap();
        let stacked = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        let bulged = HelixConstraint::new(2, 4, 1, 999., 0., false).unwrap();
        let mut stacked = HelixHandlerUnpaired::new(&energy, stacked);
        let mut bulged = HelixHandlerUnpaired::new(&energy, bulged);
        stacked.fill_helix(0, 4, 0, 3);
        bulged.fill_helix(0, 4, 0, 3);
        assert_eq!(stacked.helix_e(0, 0), -1.);
        assert_eq!(bulged.helix_e(0, 0), -3.);
        assert_eq!(bulged.helix_length1(0, 0), 5);
        assert_eq!(bulged.helix_length2(0, 0), 4);
        let mut interaction = Interaction::new();
        bulged.trace_back_helix(&mut interaction, 0, 0);
        assert_eq!(interaction.base_pairs, vec![(1, 1), (3, 2)]);
        assert_eq!(check_helix_tracebacks(&energy, &bulged, 5, 4), bulged.fill_helix(0, 4, 0, 3));
    }
    #[test]
    fn same_as_stacking_without_loops() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 30);
            let seq2 = random_seq(&mut rng, 28);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = HelixConstraint::new(2, 5, 0, 999., 0., false).unwrap();
            let mut unpaired = HelixHandlerUnpaired::new(&energy, constraint);
            let mut stacking = HelixHandlerStackingOnly::new(&energy, constraint);
            assert_eq!(unpaired.fill_helix(0, 29, 0, 27), stacking.fill_helix(0, 29, 0, 27));
            for i1 in 0..30 {
                for i2 in 0..28 {
                    let (x, y) = (unpaired.helix_e(i1, i2), stacking.helix_e(i1, i2));
                    assert!(x == y || (is_inf(x) && is_inf(y)));
                }
            }
        }
    }
    #[test]
    fn monotone_and_traceable() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 30);
            let seq2 = random_seq(&mut rng, 30);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let short = HelixConstraint::new(2, 3, 2, 999., 0., false).unwrap();
            let long = HelixConstraint::new(2, 6, 2, 999., 0., false).unwrap();
            let mut short = HelixHandlerUnpaired::new(&energy, short);
            let mut long = HelixHandlerUnpaired::new(&energy, long);
            short.fill_helix(0, 29, 0, 29);
            let count = long.fill_helix(0, 29, 0, 29);
            for i1 in 0..30 {
                for i2 in 0..30 {
                    assert!(long.helix_e(i1, i2) <= short.helix_e(i1, i2));
                }
            }
            assert_eq!(check_helix_tracebacks(&energy, &long, 30, 30), count);
            assert_eq!(long.fill_helix(0, 29, 0, 29), count);
        }
    }
    #[test]
    fn seeded_helices() {
        let energy = BasePairEnergy::new(b"GGAGGGG", b"CCCCCC").unwrap();
        let constraint = HelixConstraint::new(2, 6, 1, 999., 0., false).unwrap();
        let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(3, 0).unwrap());
        seed.fill_seed(0, 6, 0, 5);
        let mut handler = HelixHandlerUnpaired::new(&energy, constraint);
        assert!(handler.fill_helix_seed(0, 6, 0, 5).is_err());
        handler.set_seed_handler(Box::new(seed)).unwrap();
        assert!(handler.fill_helix_seed(0, 6, 0, 5).unwrap() > 0);
        // Two pairs, a bulged A, then the seed GGG/CCC and one trailing pair.
        assert_eq!(handler.helix_seed_e(0, 0), -5.);
        assert_eq!(handler.helix_seed_length1(0, 0), 7);
        assert_eq!(handler.helix_seed_length2(0, 0), 6);
        let mut interaction = Interaction::new();
        handler.trace_back_helix_seed(&mut interaction, 0, 0);
        assert_eq!(interaction.base_pairs, vec![(1, 1), (3, 2), (4, 3), (5, 4)]);
        check_seed_tracebacks(&energy, &handler, 7, 6);
    }
    #[test]
    fn random_seeded_tracebacks() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 30);
            let seq2 = random_seq(&mut rng, 30);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = HelixConstraint::new(2, 7, 2, 999., 0., false).unwrap();
            let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(3, 1).unwrap());
            seed.fill_seed(0, 29, 0, 29);
            let mut handler =
                HelixHandlerUnpaired::new(&energy, constraint).with_seed_handler(Box::new(seed));
            handler.fill_helix(0, 29, 0, 29);
            let count = handler.fill_helix_seed(0, 29, 0, 29).unwrap();
            assert_eq!(check_seed_tracebacks(&energy, &handler, 30, 30), count);
            check_helix_tracebacks(&energy, &handler, 30, 30);
        }
    }
    #[test]
    fn seed_fill_on_other_window() {
        let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
        for _ in 0..20 {
            let seq1 = random_seq(&mut rng, 10);
            let seq2 = random_seq(&mut rng, 9);
            let energy = BasePairEnergy::new(&seq1, &seq2).unwrap();
            let constraint = HelixConstraint::new(2, 6, 2, 999., 0., false).unwrap();
            let mut seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(2, 0).unwrap());
            seed.fill_seed(0, 9, 0, 8);
            let mut handler =
                HelixHandlerUnpaired::new(&energy, constraint).with_seed_handler(Box::new(seed));
            let count = handler.fill_helix(0, 9, 0, 8);
            let seeded = handler.fill_helix_seed(3, 9, 3, 8).unwrap();
            assert_eq!(check_helix_tracebacks(&energy, &handler, 10, 9), count);
            assert_eq!(check_seed_tracebacks(&energy, &handler, 10, 9), seeded);
            assert!(is_inf(handler.helix_seed_e(2, 5)));
        }
    }
}

