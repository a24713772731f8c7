//! Bounds on helices and seeds.
use crate::energy::Energy;
use crate::error::{HelixError, Result};
use crate::interaction::IndexRangeList;
use serde::{Deserialize, Serialize};

/// Packs a length pair into one integer with the given modulus (`max_length1 + 1`).
pub fn encode_length(length1: usize, length2: usize, modulus: usize) -> usize {
    length1 + length2 * modulus
}

pub fn decode_length1(encoded: usize, modulus: usize) -> usize {
    encoded % modulus
}

pub fn decode_length2(encoded: usize, modulus: usize) -> usize {
    encoded / modulus
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHelixConstraint")]
pub struct HelixConstraint {
    min_bp: usize,
    max_bp: usize,
    max_il: usize,
    max_ed: Energy,
    max_e: Energy,
    eval_full_e: bool,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawHelixConstraint {
    min_bp: usize,
    max_bp: usize,
    max_il: usize,
    max_ed: Energy,
    max_e: Energy,
    eval_full_e: bool,
}

impl std::default::Default for RawHelixConstraint {
    fn default() -> Self {
        let c = HelixConstraint::default();
        Self {
            min_bp: c.min_bp,
            max_bp: c.max_bp,
            max_il: c.max_il,
            max_ed: c.max_ed,
            max_e: c.max_e,
            eval_full_e: c.eval_full_e,
        }
    }
}

impl std::convert::TryFrom<RawHelixConstraint> for HelixConstraint {
    type Error = HelixError;
    fn try_from(raw: RawHelixConstraint) -> Result<Self> {
        HelixConstraint::new(
            raw.min_bp,
            raw.max_bp,
            raw.max_il,
            raw.max_ed,
            raw.max_e,
            raw.eval_full_e,
        )
    }
}

impl std::default::Default for HelixConstraint {
    fn default() -> Self {
        Self {
            min_bp: 2,
            max_bp: 10,
            max_il: 0,
            max_ed: 999.,
            max_e: 0.,
            eval_full_e: false,
        }
    }
}

impl HelixConstraint {
    pub fn new(
        min_bp: usize,
        max_bp: usize,
        max_il: usize,
        max_ed: Energy,
        max_e: Energy,
        eval_full_e: bool,
    ) -> Result<Self> {
        if min_bp < 2 {
            return Err(HelixError::TooFewBasePairs(min_bp));
        }
        if min_bp > max_bp {
            return Err(HelixError::InvertedBasePairRange {
                min: min_bp,
                max: max_bp,
            });
        }
        Ok(Self {
            min_bp,
            max_bp,
            max_il,
            max_ed,
            max_e,
            eval_full_e,
        })
    }
    pub fn min_bp(&self) -> usize {
        self.min_bp
    }
    pub fn max_bp(&self) -> usize {
        self.max_bp
    }
    pub fn max_il(&self) -> usize {
        self.max_il
    }
    pub fn max_ed(&self) -> Energy {
        self.max_ed
    }
    pub fn max_e(&self) -> Energy {
        self.max_e
    }
    pub fn eval_full_e(&self) -> bool {
        self.eval_full_e
    }
    pub fn max_length1(&self) -> usize {
        self.max_bp + (self.max_bp - 1) * self.max_il
    }
    pub fn max_length2(&self) -> usize {
        self.max_length1()
    }
    /// Modulus of the encoded helix lengths.
    pub fn length_modulus(&self) -> usize {
        self.max_length1() + 1
    }
}

impl std::fmt::Display for HelixConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Helix(bp={}-{}, il={}, maxED={}, maxE={}, fullE={})",
            self.min_bp, self.max_bp, self.max_il, self.max_ed, self.max_e, self.eval_full_e
        )
    }
}

/// Bounds of a seed: a short helix of an exact base-pair count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeedConstraint")]
pub struct SeedConstraint {
    bp: usize,
    max_unpaired_overall: usize,
    max_unpaired1: usize,
    max_unpaired2: usize,
    max_e: Energy,
    max_ed: Energy,
    max_e_hybrid: Energy,
    ranges1: IndexRangeList,
    ranges2: IndexRangeList,
    gu_allowed: bool,
    gu_end_allowed: bool,
    lp_allowed: bool,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawSeedConstraint {
    bp: usize,
    max_unpaired_overall: usize,
    // Unset means bounded by the overall count only.
    max_unpaired1: Option<usize>,
    max_unpaired2: Option<usize>,
    max_e: Energy,
    max_ed: Energy,
    max_e_hybrid: Energy,
    ranges1: IndexRangeList,
    ranges2: IndexRangeList,
    gu_allowed: bool,
    gu_end_allowed: bool,
    lp_allowed: bool,
}

impl std::default::Default for RawSeedConstraint {
    fn default() -> Self {
        Self {
            bp: 7,
            max_unpaired_overall: 0,
            max_unpaired1: None,
            max_unpaired2: None,
            max_e: 0.,
            max_ed: 999.,
            max_e_hybrid: 999.,
            ranges1: IndexRangeList::new(),
            ranges2: IndexRangeList::new(),
            gu_allowed: true,
            gu_end_allowed: true,
            lp_allowed: true,
        }
    }
}

impl std::convert::TryFrom<RawSeedConstraint> for SeedConstraint {
    type Error = HelixError;
    fn try_from(raw: RawSeedConstraint) -> Result<Self> {
        let overall = raw.max_unpaired_overall;
        Ok(SeedConstraint::new(raw.bp, overall)?
            .with_max_unpaired(
                raw.max_unpaired1.unwrap_or(overall),
                raw.max_unpaired2.unwrap_or(overall),
            )
            .with_max_e(raw.max_e)
            .with_max_ed(raw.max_ed)
            .with_max_e_hybrid(raw.max_e_hybrid)
            .with_ranges(raw.ranges1, raw.ranges2)
            .with_gu(raw.gu_allowed, raw.gu_end_allowed)
            .with_lonely_pairs(raw.lp_allowed))
    }
}

impl SeedConstraint {
    /// A seed of `bp` base pairs with up to `max_unpaired_overall` unpaired bases,
    /// all of which may sit in either strand.
    pub fn new(bp: usize, max_unpaired_overall: usize) -> Result<Self> {
        if bp < 2 {
            return Err(HelixError::TooFewSeedBasePairs(bp));
        }
        let raw = RawSeedConstraint::default();
        Ok(Self {
            bp,
            max_unpaired_overall,
            max_unpaired1: max_unpaired_overall,
            max_unpaired2: max_unpaired_overall,
            max_e: raw.max_e,
            max_ed: raw.max_ed,
            max_e_hybrid: raw.max_e_hybrid,
            ranges1: raw.ranges1,
            ranges2: raw.ranges2,
            gu_allowed: raw.gu_allowed,
            gu_end_allowed: raw.gu_end_allowed,
            lp_allowed: raw.lp_allowed,
        })
    }
    /// Per-strand bounds, clamped to the overall bound.
    pub fn with_max_unpaired(mut self, max_unpaired1: usize, max_unpaired2: usize) -> Self {
        self.max_unpaired1 = max_unpaired1.min(self.max_unpaired_overall);
        self.max_unpaired2 = max_unpaired2.min(self.max_unpaired_overall);
        self
    }
    pub fn with_max_e(mut self, max_e: Energy) -> Self {
        self.max_e = max_e;
        self
    }
    pub fn with_max_ed(mut self, max_ed: Energy) -> Self {
        self.max_ed = max_ed;
        self
    }
    pub fn with_max_e_hybrid(mut self, max_e_hybrid: Energy) -> Self {
        self.max_e_hybrid = max_e_hybrid;
        self
    }
    pub fn with_ranges(mut self, ranges1: IndexRangeList, ranges2: IndexRangeList) -> Self {
        self.ranges1 = ranges1;
        self.ranges2 = ranges2;
        self
    }
    pub fn with_gu(mut self, gu_allowed: bool, gu_end_allowed: bool) -> Self {
        self.gu_allowed = gu_allowed;
        self.gu_end_allowed = gu_end_allowed;
        self
    }
    pub fn with_lonely_pairs(mut self, lp_allowed: bool) -> Self {
        self.lp_allowed = lp_allowed;
        self
    }
    pub fn bp(&self) -> usize {
        self.bp
    }
    pub fn max_unpaired_overall(&self) -> usize {
        self.max_unpaired_overall
    }
    pub fn max_unpaired1(&self) -> usize {
        self.max_unpaired1
    }
    pub fn max_unpaired2(&self) -> usize {
        self.max_unpaired2
    }
    pub fn max_e(&self) -> Energy {
        self.max_e
    }
    pub fn max_ed(&self) -> Energy {
        self.max_ed
    }
    pub fn max_e_hybrid(&self) -> Energy {
        self.max_e_hybrid
    }
    pub fn ranges1(&self) -> &IndexRangeList {
        &self.ranges1
    }
    pub fn ranges2(&self) -> &IndexRangeList {
        &self.ranges2
    }
    pub fn is_gu_allowed(&self) -> bool {
        self.gu_allowed
    }
    pub fn is_gu_end_allowed(&self) -> bool {
        self.gu_end_allowed
    }
    pub fn is_lp_allowed(&self) -> bool {
        self.lp_allowed
    }
    pub fn max_length1(&self) -> usize {
        self.bp + self.max_unpaired1
    }
    pub fn max_length2(&self) -> usize {
        self.bp + self.max_unpaired2
    }
    pub fn length_modulus(&self) -> usize {
        self.max_length1() + 1
    }
}

impl std::fmt::Display for SeedConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Seed(bp={}, up={}, up1={}, up2={}, maxE={}, maxED={}, maxEhybrid={}, GU={}, GUend={}, LP={})",
            self.bp,
            self.max_unpaired_overall,
            self.max_unpaired1,
            self.max_unpaired2,
            self.max_e,
            self.max_ed,
            self.max_e_hybrid,
            self.gu_allowed,
            self.gu_end_allowed,
            self.lp_allowed
        )
    }
}
