//! Helices: runs of base pairs of variable length, optionally enclosing a seed.
//!
//! Every engine computes, per left-most base pair of a window, the
//! minimum-energy helix of `min_bp..=max_bp` base pairs extending to the right.
//! The stored energy is the hybridization loop energy only; comparisons
//! against `max_e` add the initiation and, on request, the accessibility terms.
mod nobulge;
mod offset;
mod stacking;
mod unpaired;
pub use nobulge::HelixHandlerNoBulgeMax;
pub use offset::HelixHandlerIdxOffset;
pub use stacking::HelixHandlerStackingOnly;
pub use unpaired::HelixHandlerUnpaired;

use crate::constraint::HelixConstraint;
use crate::energy::{Energy, InteractionEnergy};
use crate::error::{HelixError, Result};
use crate::interaction::Interaction;
use crate::seed::SeedHandler;
use serde::{Deserialize, Serialize};

pub trait HelixHandler<'a> {
    fn constraint(&self) -> &HelixConstraint;
    /// The energy model the handler was built on.
    fn energy(&self) -> &'a dyn InteractionEnergy;
    /// Fill the helix table of the window. Returns the number of feasible starts.
    fn fill_helix(&mut self, i1min: usize, i1max: usize, i2min: usize, i2max: usize) -> usize;
    /// Fill the table of helices enclosing a seed of the bound seed handler.
    fn fill_helix_seed(
        &mut self,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> Result<usize>;
    /// Same as `fill_helix_seed`, with the seeds taken from `seed`.
    fn fill_helix_seed_with(
        &mut self,
        seed: &dyn SeedHandler<'a>,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> Result<usize>;
    fn helix_e(&self, i1: usize, i2: usize) -> Energy;
    fn helix_length1(&self, i1: usize, i2: usize) -> usize;
    fn helix_length2(&self, i1: usize, i2: usize) -> usize;
    fn helix_seed_e(&self, i1: usize, i2: usize) -> Energy;
    fn helix_seed_length1(&self, i1: usize, i2: usize) -> usize;
    fn helix_seed_length2(&self, i1: usize, i2: usize) -> usize;
    /// Push the base pairs of the helix at (i1,i2), except its left-most and right-most ones.
    fn trace_back_helix(&self, interaction: &mut Interaction, i1: usize, i2: usize);
    /// Traceback of a seed-containing helix with the bound seed handler.
    /// Does nothing if no seed handler is bound.
    fn trace_back_helix_seed(&self, interaction: &mut Interaction, i1: usize, i2: usize);
    fn trace_back_helix_seed_with(
        &self,
        seed: &dyn SeedHandler<'a>,
        interaction: &mut Interaction,
        i1: usize,
        i2: usize,
    );
    fn set_seed_handler(&mut self, seed: Box<dyn SeedHandler<'a> + 'a>) -> Result<()>;
    fn seed_handler(&self) -> Option<&(dyn SeedHandler<'a> + 'a)>;
    fn seed_handler_mut(&mut self) -> Option<&mut (dyn SeedHandler<'a> + 'a)>;
}

/// Which helix engine to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelixModel {
    /// Stacking only without internal loops, the unpaired engine otherwise.
    Auto,
    #[serde(rename = "stacking")]
    StackingOnly,
    #[serde(rename = "nobulge")]
    NoBulgeMax,
    Unpaired,
}

impl std::default::Default for HelixModel {
    fn default() -> Self {
        HelixModel::Auto
    }
}

impl HelixModel {
    pub fn resolve(self, constraint: &HelixConstraint) -> Self {
        match self {
            HelixModel::Auto if constraint.max_il() == 0 => HelixModel::StackingOnly,
            HelixModel::Auto => HelixModel::Unpaired,
            x => x,
        }
    }
}

impl std::fmt::Display for HelixModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HelixModel::Auto => "auto",
            HelixModel::StackingOnly => "stacking",
            HelixModel::NoBulgeMax => "nobulge",
            HelixModel::Unpaired => "unpaired",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for HelixModel {
    type Err = HelixError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(HelixModel::Auto),
            "stacking" => Ok(HelixModel::StackingOnly),
            "nobulge" => Ok(HelixModel::NoBulgeMax),
            "unpaired" => Ok(HelixModel::Unpaired),
            _ => Err(HelixError::UnknownModel(s.to_string())),
        }
    }
}

pub fn new_helix_handler<'a>(
    energy: &'a dyn InteractionEnergy,
    constraint: HelixConstraint,
    model: HelixModel,
) -> Box<dyn HelixHandler<'a> + 'a> {
    match model.resolve(&constraint) {
        HelixModel::NoBulgeMax => Box::new(HelixHandlerNoBulgeMax::new(energy, constraint)),
        HelixModel::Unpaired => Box::new(HelixHandlerUnpaired::new(energy, constraint)),
        _ => Box::new(HelixHandlerStackingOnly::new(energy, constraint)),
    }
}

/// A fill window, clamped to the sequence lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Window {
    pub i1min: usize,
    pub i1max: usize,
    pub i2min: usize,
    pub i2max: usize,
}

impl Window {
    /// None if the clamped window is empty or inverted.
    pub fn new(
        energy: &dyn InteractionEnergy,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> Option<Self> {
        let i1max = i1max.min(energy.size1().checked_sub(1)?);
        let i2max = i2max.min(energy.size2().checked_sub(1)?);
        if i1max < i1min || i2max < i2min {
            None
        } else {
            Some(Self {
                i1min,
                i1max,
                i2min,
                i2max,
            })
        }
    }
    pub fn width1(&self) -> usize {
        self.i1max + 1 - self.i1min
    }
    pub fn width2(&self) -> usize {
        self.i2max + 1 - self.i2min
    }
    pub fn contains(&self, i1: usize, i2: usize) -> bool {
        self.i1min <= i1 && i1 <= self.i1max && self.i2min <= i2 && i2 <= self.i2max
    }
    /// Window-relative cell of (i1,i2). Positions right of the window map outside of any table.
    pub fn cell(&self, i1: usize, i2: usize) -> (usize, usize) {
        match (i1.checked_sub(self.i1min), i2.checked_sub(self.i2min)) {
            (Some(r1), Some(r2)) => (r1, r2),
            _ => (usize::MAX, usize::MAX),
        }
    }
    /// Starts in decreasing order, i2 running fastest.
    pub fn starts_rev(&self) -> impl Iterator<Item = (usize, usize)> {
        let (i1min, i1max, i2min, i2max) = (self.i1min, self.i1max, self.i2min, self.i2max);
        (i1min..=i1max)
            .rev()
            .flat_map(move |i1| (i2min..=i2max).rev().map(move |i2| (i1, i2)))
    }
}

pub(crate) fn is_pairable(energy: &dyn InteractionEnergy, i1: usize, i2: usize) -> bool {
    i1 < energy.size1()
        && i2 < energy.size2()
        && energy.is_accessible1(i1)
        && energy.is_accessible2(i2)
        && energy.are_complementary(i1, i2)
}

pub(crate) fn exceeds_max_ed(
    energy: &dyn InteractionEnergy,
    constraint: &HelixConstraint,
    (i1, j1): (usize, usize),
    (i2, j2): (usize, usize),
) -> bool {
    energy.ed1(i1, j1) > constraint.max_ed() || energy.ed2(i2, j2) > constraint.max_ed()
}

/// Energy a helix spanning [i1,j1]x[i2,j2] is ranked and bounded by.
pub(crate) fn comparison_energy(
    energy: &dyn InteractionEnergy,
    constraint: &HelixConstraint,
    (i1, j1): (usize, usize),
    (i2, j2): (usize, usize),
    loop_e: Energy,
) -> Energy {
    let full = energy.get_e(i1, j1, i2, j2, loop_e) + energy.e_init();
    if constraint.eval_full_e() {
        full
    } else {
        full - (energy.ed1(i1, j1) + energy.ed2(i2, j2))
    }
}

/// Length modulus of helices enclosing a seed.
pub(crate) fn seed_length_modulus(
    constraint: &HelixConstraint,
    seed: &crate::constraint::SeedConstraint,
) -> usize {
    constraint.max_length1() + seed.max_length1() + 1
}
