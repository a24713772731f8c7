use super::HelixHandler;
use crate::constraint::HelixConstraint;
use crate::energy::{Energy, InteractionEnergy};
use crate::error::{HelixError, Result};
use crate::interaction::Interaction;
use crate::seed::{SeedHandler, SeedHandlerIdxOffset};

/// Helix handler whose indices are shifted by (offset1, offset2) against the wrapped one.
pub struct HelixHandlerIdxOffset<'a> {
    inner: Box<dyn HelixHandler<'a> + 'a>,
    // Kept at the same offsets as the helix handler.
    seed: Option<SeedHandlerIdxOffset<'a>>,
    offset1: usize,
    offset2: usize,
}

impl<'a> std::fmt::Debug for HelixHandlerIdxOffset<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HelixHandlerIdxOffset({},{}) of {}",
            self.offset1,
            self.offset2,
            self.inner.constraint()
        )
    }
}

impl<'a> HelixHandlerIdxOffset<'a> {
    pub fn new(inner: Box<dyn HelixHandler<'a> + 'a>) -> Self {
        Self {
            inner,
            seed: None,
            offset1: 0,
            offset2: 0,
        }
    }
    pub fn original(&self) -> &(dyn HelixHandler<'a> + 'a) {
        self.inner.as_ref()
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
        if let Some(seed) = self.seed.as_mut() {
            seed.set_offset1(offset)?;
        }
        self.offset1 = offset;
        Ok(())
    }
    pub fn set_offset2(&mut self, offset: usize) -> Result<()> {
        let len = self.inner.energy().size2();
        if len <= offset {
            return Err(HelixError::OffsetOutOfRange { seq: 2, offset, len });
        }
        if let Some(seed) = self.seed.as_mut() {
            seed.set_offset2(offset)?;
        }
        self.offset2 = offset;
        Ok(())
    }
}

impl<'a> HelixHandler<'a> for HelixHandlerIdxOffset<'a> {
    fn constraint(&self) -> &HelixConstraint {
        self.inner.constraint()
    }
    /// The unshifted energy model of the wrapped handler.
    fn energy(&self) -> &'a dyn InteractionEnergy {
        self.inner.energy()
    }
    fn fill_helix(&mut self, i1min: usize, i1max: usize, i2min: usize, i2max: usize) -> usize {
        let (o1, o2) = (self.offset1, self.offset2);
        self.inner.fill_helix(
            i1min + o1,
            i1max.saturating_add(o1),
            i2min + o2,
            i2max.saturating_add(o2),
        )
    }
    fn fill_helix_seed(
        &mut self,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> Result<usize> {
        let (o1, o2) = (self.offset1, self.offset2);
        let seed = self.seed.as_ref().ok_or(HelixError::MissingSeedHandler)?;
        self.inner.fill_helix_seed_with(
            seed.original(),
            i1min + o1,
            i1max.saturating_add(o1),
            i2min + o2,
            i2max.saturating_add(o2),
        )
    }
    fn fill_helix_seed_with(
        &mut self,
        seed: &dyn SeedHandler<'a>,
        i1min: usize,
        i1max: usize,
        i2min: usize,
        i2max: usize,
    ) -> Result<usize> {
        let (o1, o2) = (self.offset1, self.offset2);
        let seed = seed.as_idx_offset().ok_or(HelixError::SeedHandlerKind)?;
        self.inner.fill_helix_seed_with(
            seed.original(),
            i1min + o1,
            i1max.saturating_add(o1),
            i2min + o2,
            i2max.saturating_add(o2),
        )
    }
    fn helix_e(&self, i1: usize, i2: usize) -> Energy {
        self.inner.helix_e(i1 + self.offset1, i2 + self.offset2)
    }
    fn helix_length1(&self, i1: usize, i2: usize) -> usize {
        self.inner.helix_length1(i1 + self.offset1, i2 + self.offset2)
    }
    fn helix_length2(&self, i1: usize, i2: usize) -> usize {
        self.inner.helix_length2(i1 + self.offset1, i2 + self.offset2)
    }
    fn helix_seed_e(&self, i1: usize, i2: usize) -> Energy {
        self.inner.helix_seed_e(i1 + self.offset1, i2 + self.offset2)
    }
    fn helix_seed_length1(&self, i1: usize, i2: usize) -> usize {
        self.inner
            .helix_seed_length1(i1 + self.offset1, i2 + self.offset2)
    }
    fn helix_seed_length2(&self, i1: usize, i2: usize) -> usize {
        self.inner
            .helix_seed_length2(i1 + self.offset1, i2 + self.offset2)
    }
    fn trace_back_helix(&self, interaction: &mut Interaction, i1: usize, i2: usize) {
        let start = interaction.len();
        self.inner
            .trace_back_helix(interaction, i1 + self.offset1, i2 + self.offset2);
        interaction.shift_from(start, self.offset1, self.offset2);
    }
    fn trace_back_helix_seed(&self, interaction: &mut Interaction, i1: usize, i2: usize) {
        if let Some(seed) = self.seed.as_ref() {
            let start = interaction.len();
            self.inner.trace_back_helix_seed_with(
                seed.original(),
                interaction,
                i1 + self.offset1,
                i2 + self.offset2,
            );
            interaction.shift_from(start, self.offset1, self.offset2);
        }
    }
    fn trace_back_helix_seed_with(
        &self,
        seed: &dyn SeedHandler<'a>,
        interaction: &mut Interaction,
        i1: usize,
        i2: usize,
    ) {
        let seed = match seed.as_idx_offset() {
            Some(seed) => seed,
            None => panic!("{}", HelixError::SeedHandlerKind),
        };
        let start = interaction.len();
        self.inner.trace_back_helix_seed_with(
            seed.original(),
            interaction,
            i1 + self.offset1,
            i2 + self.offset2,
        );
        interaction.shift_from(start, self.offset1, self.offset2);
    }
    /// Only index-offset seed handlers are accepted. They are moved to the current offsets.
    fn set_seed_handler(&mut self, seed: Box<dyn SeedHandler<'a> + 'a>) -> Result<()> {
        let mut seed = seed
            .into_idx_offset()
            .map_err(|_| HelixError::SeedHandlerKind)?;
        seed.set_offset1(self.offset1)?;
        seed.set_offset2(self.offset2)?;
        self.seed = Some(seed);
        Ok(())
    }
    fn seed_handler(&self) -> Option<&(dyn SeedHandler<'a> + 'a)> {
        self.seed.as_ref().map(|s| s as &(dyn SeedHandler<'a> + 'a))
    }
    fn seed_handler_mut(&mut self) -> Option<&mut (dyn SeedHandler<'a> + 'a)> {
        self.seed
            .as_mut()
            .map(|s| s as &mut (dyn SeedHandler<'a> + 'a))
    }
}
