//! Interactions assembled from helices joined by interior loops.
//!
//! For every left-most base pair `(i1,i2)` of the window, `hybrid_e` holds the
//! best of the lone pair `(i1,i2)` and the chains that start with the helix at
//! `(i1,i2)` and either stop there or continue through an interior loop into
//! another chain. Only the helix of the start is considered, which makes the
//! assembly a heuristic. If a seed handler is bound, `hybrid_e_seed` holds the
//! best chains that contain a seed-enclosing helix.
//!
//! Interactions are returned in the absolute index space of the energy model.
use crate::dptable::DPTable;
use crate::energy::{e_equal, is_inf, Energy, EnergyIdxOffset, InteractionEnergy, E_INF};
use crate::error::{HelixError, Result};
use crate::helix::{HelixHandler, HelixHandlerIdxOffset};
use crate::interaction::{BasePair, IndexRange, IndexRangeList, Interaction};
use crate::seed::{SeedHandler, SeedHandlerIdxOffset};

/// Hybridization energy of the best chain and its right-most base pair.
type Cell = (Energy, usize, usize);
const EMPTY_CELL: Cell = (E_INF, usize::MAX, usize::MAX);

pub struct HelixBlockPredictor<'a> {
    energy: &'a dyn InteractionEnergy,
    helix: HelixHandlerIdxOffset<'a>,
    hybrid_e: DPTable<Cell>,
    hybrid_e_seed: DPTable<Cell>,
    // Sites reported so far, window-relative.
    reported1: IndexRangeList,
    reported2: IndexRangeList,
}

impl<'a> std::fmt::Debug for HelixBlockPredictor<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HelixBlockPredictor({}x{}) with {:?}",
            self.hybrid_e.rows(),
            self.hybrid_e.cols(),
            self.helix
        )
    }
}

impl<'a> HelixBlockPredictor<'a> {
    pub fn new(energy: &'a dyn InteractionEnergy, helix: Box<dyn HelixHandler<'a> + 'a>) -> Self {
        Self {
            energy,
            helix: HelixHandlerIdxOffset::new(helix),
            hybrid_e: DPTable::new(0, 0, EMPTY_CELL),
            hybrid_e_seed: DPTable::new(0, 0, EMPTY_CELL),
            reported1: IndexRangeList::new(),
            reported2: IndexRangeList::new(),
        }
    }
    /// Require every interaction to contain a seed of `seed`.
    pub fn with_seed_handler(mut self, seed: Box<dyn SeedHandler<'a> + 'a>) -> Result<Self> {
        let seed = match seed.into_idx_offset() {
            Ok(seed) => seed,
            Err(seed) => SeedHandlerIdxOffset::new(seed),
        };
        self.helix.set_seed_handler(Box::new(seed))?;
        Ok(self)
    }
    pub fn helix_handler(&self) -> &HelixHandlerIdxOffset<'a> {
        &self.helix
    }
    pub fn is_seeded(&self) -> bool {
        self.helix.seed_handler().is_some()
    }
    /// Up to `suboptimals` interactions within the windows `r1` x `r2`, best first.
    /// Every interaction after the first is disjoint from all earlier ones on both strands.
    pub fn predict(
        &mut self,
        r1: IndexRange,
        r2: IndexRange,
        suboptimals: usize,
    ) -> Result<Vec<Interaction>> {
        let r1 = clamp(r1, self.energy.size1())?;
        let r2 = clamp(r2, self.energy.size2())?;
        let view = EnergyIdxOffset::new(self.energy, r1.from, r2.from)?;
        self.helix.set_offset1(r1.from)?;
        self.helix.set_offset2(r2.from)?;
        let (size1, size2) = (r1.len(), r2.len());
        trace!("predict on {}x{} with {:?}", r1, r2, self.helix);
        self.hybrid_e.initialize(size1, size2, EMPTY_CELL);
        self.hybrid_e_seed.initialize(size1, size2, EMPTY_CELL);
        self.reported1.clear();
        self.reported2.clear();
        let seeded = self.is_seeded();
        if seeded {
            let seeds = match self.helix.seed_handler_mut() {
                Some(seed) => seed.fill_seed(0, size1 - 1, 0, size2 - 1),
                None => 0,
            };
            debug!("{} seeds", seeds);
            if seeds == 0 {
                return Ok(vec![]);
            }
        }
        let helices = self.helix.fill_helix(0, size1 - 1, 0, size2 - 1);
        debug!("{} helices", helices);
        if helices == 0 {
            return Ok(vec![]);
        }
        if seeded {
            let helices = self.helix.fill_helix_seed(0, size1 - 1, 0, size2 - 1)?;
            debug!("{} seed helices", helices);
            if helices == 0 {
                return Ok(vec![]);
            }
        }
        self.fill_hybrid_e(&view);
        if seeded {
            self.fill_hybrid_e_seed(&view);
        }
        let mut interactions = vec![];
        let mut floor = -E_INF;
        while interactions.len() < suboptimals {
            let (e, (i1, i2)) = match self.next_best(&view, seeded, floor) {
                Some(found) => found,
                None => break,
            };
            let mut interaction = if seeded {
                self.trace_back_seed(&view, i1, i2)
            } else {
                self.trace_back(&view, i1, i2)
            };
            interaction.energy = e;
            if let Some(seed) = self.helix.seed_handler() {
                seed.add_seeds(&mut interaction);
            }
            if let (Some(x), Some(y)) = (interaction.range1(), interaction.range2()) {
                self.reported1.push(x);
                self.reported2.push(y);
            }
            if interactions.is_empty() {
                debug!("mfe {:.2} at {:?}", e, interaction.base_pairs.first());
            }
            interaction.shift_up(r1.from, r2.from);
            interactions.push(interaction);
            floor = e;
        }
        Ok(interactions)
    }
    fn fill_hybrid_e(&mut self, energy: &dyn InteractionEnergy) {
        let (size1, size2) = (self.hybrid_e.rows(), self.hybrid_e.cols());
        for i1 in 0..size1 {
            for i2 in 0..size2 {
                if energy.is_accessible1(i1)
                    && energy.is_accessible2(i2)
                    && energy.are_complementary(i1, i2)
                {
                    self.hybrid_e.set(i1, i2, (energy.e_init(), i1, i2));
                }
            }
        }
        let helix = &self.helix;
        let table = &mut self.hybrid_e;
        for i1 in (0..size1).rev() {
            for i2 in (0..size2).rev() {
                let helix_e = helix.helix_e(i1, i2);
                let mut best = table.get(i1, i2);
                if is_inf(best.0) || is_inf(helix_e) {
                    continue;
                }
                // The lone pair stays unless a chain is strictly better.
                let mut best_total = energy.get_e(i1, best.1, i2, best.2, best.0);
                let k1 = i1 + helix.helix_length1(i1, i2) - 1;
                let k2 = i2 + helix.helix_length2(i1, i2) - 1;
                let init_e = helix_e + energy.e_init();
                let total = energy.get_e(i1, k1, i2, k2, init_e);
                if total < best_total && !e_equal(total, best_total) {
                    best = (init_e, k1, k2);
                    best_total = total;
                }
                for_each_connector(energy, helix, (k1, k2), (size1, size2), |j1, j2, loop_e| {
                    let (right_e, r1, r2) = table.get(j1, j2);
                    if is_inf(right_e) || too_long(energy, (i1, i2), (r1, r2)) {
                        return;
                    }
                    let e = helix_e + loop_e + right_e;
                    let total = energy.get_e(i1, r1, i2, r2, e);
                    if total < best_total && !e_equal(total, best_total) {
                        best = (e, r1, r2);
                        best_total = total;
                    }
                });
                table.set(i1, i2, best);
            }
        }
    }
    fn fill_hybrid_e_seed(&mut self, energy: &dyn InteractionEnergy) {
        let (size1, size2) = (self.hybrid_e.rows(), self.hybrid_e.cols());
        let helix = &self.helix;
        let plain = &self.hybrid_e;
        let table = &mut self.hybrid_e_seed;
        for i1 in (0..size1).rev() {
            for i2 in (0..size2).rev() {
                if is_inf(plain.get(i1, i2).0) {
                    continue;
                }
                let mut best = EMPTY_CELL;
                let mut best_total = E_INF;
                // A seed-enclosing helix, then nothing or any chain.
                let seed_e = helix.helix_seed_e(i1, i2);
                if !is_inf(seed_e) {
                    let k1 = i1 + helix.helix_seed_length1(i1, i2) - 1;
                    let k2 = i2 + helix.helix_seed_length2(i1, i2) - 1;
                    let init_e = seed_e + energy.e_init();
                    let total = energy.get_e(i1, k1, i2, k2, init_e);
                    if total < best_total {
                        best = (init_e, k1, k2);
                        best_total = total;
                    }
                    for_each_connector(energy, helix, (k1, k2), (size1, size2), |j1, j2, loop_e| {
                        let (right_e, r1, r2) = plain.get(j1, j2);
                        if is_inf(right_e) || too_long(energy, (i1, i2), (r1, r2)) {
                            return;
                        }
                        let e = seed_e + loop_e + right_e;
                        let total = energy.get_e(i1, r1, i2, r2, e);
                        if total < best_total && !e_equal(total, best_total) {
                            best = (e, r1, r2);
                            best_total = total;
                        }
                    });
                }
                // A plain helix, then a seed-containing chain.
                let helix_e = helix.helix_e(i1, i2);
                if !is_inf(helix_e) {
                    let k1 = i1 + helix.helix_length1(i1, i2) - 1;
                    let k2 = i2 + helix.helix_length2(i1, i2) - 1;
                    for_each_connector(energy, helix, (k1, k2), (size1, size2), |j1, j2, loop_e| {
                        let (right_e, r1, r2) = table.get(j1, j2);
                        if is_inf(right_e) || too_long(energy, (i1, i2), (r1, r2)) {
                            return;
                        }
                        let e = helix_e + loop_e + right_e;
                        let total = energy.get_e(i1, r1, i2, r2, e);
                        if total < best_total {
                            best = (e, r1, r2);
                            best_total = total;
                        }
                    });
                }
                table.set(i1, i2, best);
            }
        }
    }
    // Lowest total energy not below `floor` whose site is disjoint from every reported one.
    fn next_best(
        &self,
        energy: &dyn InteractionEnergy,
        seeded: bool,
        floor: Energy,
    ) -> Option<(Energy, BasePair)> {
        let table = if seeded {
            &self.hybrid_e_seed
        } else {
            &self.hybrid_e
        };
        let mut best: Option<(Energy, BasePair)> = None;
        for i1 in (0..table.rows()).rev() {
            if self.reported1.covers(i1) {
                continue;
            }
            for i2 in (0..table.cols()).rev() {
                if self.reported2.covers(i2) {
                    continue;
                }
                let (e, j1, j2) = table.get(i1, i2);
                // Single base pairs are no helix chains.
                if is_inf(e) || (j1, j2) == (i1, i2) {
                    continue;
                }
                let total = energy.get_e(i1, j1, i2, j2, e);
                let best_e = best.map(|x| x.0).unwrap_or(E_INF);
                if (total < floor && !e_equal(total, floor)) || best_e <= total {
                    continue;
                }
                if self.reported1.overlaps(&IndexRange::new(i1, j1))
                    || self.reported2.overlaps(&IndexRange::new(i2, j2))
                {
                    continue;
                }
                best = Some((total, (i1, i2)));
            }
        }
        best
    }
    fn trace_back(&self, energy: &dyn InteractionEnergy, i1: usize, i2: usize) -> Interaction {
        let (e, j1, j2) = self.hybrid_e.get(i1, i2);
        let mut interaction = Interaction::new();
        interaction.base_pairs.push((i1, i2));
        self.trace_chain(energy, &mut interaction, (i1, i2), (j1, j2), e);
        interaction.base_pairs.push((j1, j2));
        interaction
    }
    // Push the pairs of the `hybrid_e` chain from `start` (excluded) to `end` (excluded).
    fn trace_chain(
        &self,
        energy: &dyn InteractionEnergy,
        interaction: &mut Interaction,
        start: BasePair,
        end: BasePair,
        e: Energy,
    ) {
        let size = (self.hybrid_e.rows(), self.hybrid_e.cols());
        let helix = &self.helix;
        let (mut i1, mut i2) = start;
        let mut cur_e = e;
        while (i1, i2) != end {
            let helix_e = helix.helix_e(i1, i2);
            assert!(!is_inf(helix_e), "no helix at ({},{})", i1, i2);
            let k1 = i1 + helix.helix_length1(i1, i2) - 1;
            let k2 = i2 + helix.helix_length2(i1, i2) - 1;
            let mut next = None;
            for_each_connector(energy, helix, (k1, k2), size, |j1, j2, loop_e| {
                let (right_e, r1, r2) = self.hybrid_e.get(j1, j2);
                if next.is_none() && (r1, r2) == end && e_equal(cur_e, helix_e + loop_e + right_e) {
                    next = Some((j1, j2, right_e));
                }
            });
            helix.trace_back_helix(interaction, i1, i2);
            match next {
                Some((j1, j2, right_e)) => {
                    interaction.base_pairs.push((k1, k2));
                    if (j1, j2) != end {
                        interaction.base_pairs.push((j1, j2));
                    }
                    i1 = j1;
                    i2 = j2;
                    cur_e = right_e;
                }
                None => {
                    assert!(
                        e_equal(cur_e, helix_e + energy.e_init()) && (k1, k2) == end,
                        "no decomposition of the chain at ({},{})",
                        i1,
                        i2
                    );
                    i1 = k1;
                    i2 = k2;
                }
            }
        }
    }
    fn trace_back_seed(&self, energy: &dyn InteractionEnergy, i1: usize, i2: usize) -> Interaction {
        let size = (self.hybrid_e.rows(), self.hybrid_e.cols());
        let helix = &self.helix;
        let (e, j1, j2) = self.hybrid_e_seed.get(i1, i2);
        let end = (j1, j2);
        let mut interaction = Interaction::new();
        interaction.base_pairs.push((i1, i2));
        let (mut i1, mut i2) = (i1, i2);
        let mut cur_e = e;
        while (i1, i2) != end {
            // A plain helix followed by a seed-containing chain.
            let helix_e = helix.helix_e(i1, i2);
            if !is_inf(helix_e) {
                let k1 = i1 + helix.helix_length1(i1, i2) - 1;
                let k2 = i2 + helix.helix_length2(i1, i2) - 1;
                let mut next = None;
                for_each_connector(energy, helix, (k1, k2), size, |j1, j2, loop_e| {
                    let (right_e, r1, r2) = self.hybrid_e_seed.get(j1, j2);
                    if next.is_none() && (r1, r2) == end && e_equal(cur_e, helix_e + loop_e + right_e)
                    {
                        next = Some((j1, j2, right_e));
                    }
                });
                if let Some((j1, j2, right_e)) = next {
                    helix.trace_back_helix(&mut interaction, i1, i2);
                    interaction.base_pairs.push((k1, k2));
                    interaction.base_pairs.push((j1, j2));
                    i1 = j1;
                    i2 = j2;
                    cur_e = right_e;
                    continue;
                }
            }
            // The seed-enclosing helix, then nothing or a plain chain.
            let seed_e = helix.helix_seed_e(i1, i2);
            assert!(!is_inf(seed_e), "no seed helix at ({},{})", i1, i2);
            let k1 = i1 + helix.helix_seed_length1(i1, i2) - 1;
            let k2 = i2 + helix.helix_seed_length2(i1, i2) - 1;
            let mut next = None;
            for_each_connector(energy, helix, (k1, k2), size, |j1, j2, loop_e| {
                let (right_e, r1, r2) = self.hybrid_e.get(j1, j2);
                if next.is_none() && (r1, r2) == end && e_equal(cur_e, seed_e + loop_e + right_e) {
                    next = Some((j1, j2, right_e));
                }
            });
            helix.trace_back_helix_seed(&mut interaction, i1, i2);
            match next {
                Some((j1, j2, right_e)) => {
                    interaction.base_pairs.push((k1, k2));
                    if (j1, j2) != end {
                        interaction.base_pairs.push((j1, j2));
                        self.trace_chain(energy, &mut interaction, (j1, j2), end, right_e);
                    }
                }
                None => assert!(
                    e_equal(cur_e, seed_e + energy.e_init()) && (k1, k2) == end,
                    "no decomposition of the seed chain at ({},{})",
                    i1,
                    i2
                ),
            }
            i1 = end.0;
            i2 = end.1;
        }
        interaction.base_pairs.push(end);
        interaction
    }
}

// Interior loops leaving the helix end `(k1,k2)` towards `(k1+w1,k2+w2)` within `size`.
// Loops a helix could have closed itself are skipped.
fn for_each_connector<'a, F: FnMut(usize, usize, Energy)>(
    energy: &dyn InteractionEnergy,
    helix: &dyn HelixHandler<'a>,
    (k1, k2): BasePair,
    (size1, size2): (usize, usize),
    mut f: F,
) {
    let helix_il = helix.constraint().max_il();
    let max_w1 = energy.max_internal_loop_size1() + 1;
    let max_w2 = energy.max_internal_loop_size2() + 1;
    for w1 in (1..=max_w1).take_while(|w1| k1 + w1 < size1) {
        for w2 in (1..=max_w2).take_while(|w2| k2 + w2 < size2) {
            if w1 + w2 - 2 <= helix_il {
                continue;
            }
            let loop_e = energy.e_inter_left(k1, k1 + w1, k2, k2 + w2);
            if !is_inf(loop_e) {
                f(k1 + w1, k2 + w2, loop_e);
            }
        }
    }
}

fn too_long(energy: &dyn InteractionEnergy, (i1, i2): BasePair, (j1, j2): BasePair) -> bool {
    energy.max_length1() < j1 + 1 - i1 || energy.max_length2() < j2 + 1 - i2
}

// Window restricted to the sequence. Windows starting past the end are rejected.
fn clamp(range: IndexRange, len: usize) -> Result<IndexRange> {
    if len <= range.from || range.to < range.from {
        Err(HelixError::InvalidWindow {
            from: range.from,
            to: range.to,
            len,
        })
    } else {
        Ok(IndexRange::new(range.from, range.to.min(len - 1)))
    }
}
