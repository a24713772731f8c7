//! RNA-RNA interactions built from helices.
//!
//! The helix engines in [`helix`] compute, for every pair of left-most base
//! pairs, the minimum-energy helix and the minimum-energy helix enclosing a
//! seed. [`predictor::HelixBlockPredictor`] chains them into interactions.
//! [`predict`] wires a run together from a [`PredictConfig`].
#[macro_use]
extern crate log;
pub mod constraint;
pub mod dptable;
pub mod energy;
pub mod error;
pub mod helix;
pub mod interaction;
pub mod predictor;
pub mod seed;
pub mod sequence;

use constraint::{HelixConstraint, SeedConstraint};
use energy::{BasePairEnergy, BasePairEnergyConfig, InteractionEnergy};
use error::{HelixError, Result};
use helix::HelixModel;
use interaction::{IndexRange, Interaction};
use predictor::HelixBlockPredictor;
use seed::SeedHandlerMfe;
use serde::{Deserialize, Serialize};

/// Everything needed for one prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    pub helix: HelixConstraint,
    /// Interactions have to contain a seed, if any.
    pub seed: Option<SeedConstraint>,
    pub model: HelixModel,
    pub energy: BasePairEnergyConfig,
    /// Maximum number of interactions to report.
    pub suboptimals: usize,
}

impl std::default::Default for PredictConfig {
    fn default() -> Self {
        Self {
            helix: HelixConstraint::default(),
            seed: SeedConstraint::new(7, 0).ok(),
            model: HelixModel::default(),
            energy: BasePairEnergyConfig::default(),
            suboptimals: 1,
        }
    }
}

impl PredictConfig {
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let rdr = std::fs::File::open(path).map(std::io::BufReader::new)?;
        let config: Self = serde_json::from_reader(rdr)?;
        config.validate()?;
        Ok(config)
    }
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    pub fn validate(&self) -> Result<()> {
        let h = &self.helix;
        HelixConstraint::new(
            h.min_bp(),
            h.max_bp(),
            h.max_il(),
            h.max_ed(),
            h.max_e(),
            h.eval_full_e(),
        )?;
        if let Some(seed) = self.seed.as_ref() {
            SeedConstraint::new(seed.bp(), seed.max_unpaired_overall())?;
            if h.max_bp() < seed.bp() {
                warn!(
                    "seeds of {} base pairs never fit into helices of at most {}",
                    seed.bp(),
                    h.max_bp()
                );
            }
        }
        if self.suboptimals == 0 {
            return Err(HelixError::Config(
                "at least one interaction has to be reported".to_string(),
            ));
        }
        Ok(())
    }
}

/// Interactions between `seq1` and `seq2` under the base-pair energy model.
pub fn predict(config: &PredictConfig, seq1: &[u8], seq2: &[u8]) -> Result<Vec<Interaction>> {
    let energy = BasePairEnergy::with_config(seq1, seq2, &config.energy)?;
    predict_on(&energy, config)
}

/// Interactions under any energy model, over the whole of both sequences.
pub fn predict_on(energy: &dyn InteractionEnergy, config: &PredictConfig) -> Result<Vec<Interaction>> {
    config.validate()?;
    let model = config.model.resolve(&config.helix);
    debug!(
        "{} helices of {} on {}x{}",
        model,
        config.helix,
        energy.size1(),
        energy.size2()
    );
    let helix = helix::new_helix_handler(energy, config.helix, model);
    let mut predictor = HelixBlockPredictor::new(energy, helix);
    if let Some(seed) = config.seed.as_ref() {
        debug!("{}", seed);
        let seed = SeedHandlerMfe::new(energy, seed.clone());
        predictor = predictor.with_seed_handler(Box::new(seed))?;
    }
    let r1 = IndexRange::new(0, energy.size1().saturating_sub(1));
    let r2 = IndexRange::new(0, energy.size2().saturating_sub(1));
    predictor.predict(r1, r2, config.suboptimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::e_equal;
    #[test]
    fn config_from_json() {
        let config = PredictConfig::from_json(
            r#"{"helix":{"min_bp":2,"max_bp":4},"seed":null,"model":"stacking","suboptimals":2}"#,
        )
        .unwrap();
        assert_eq!(config.helix.max_bp(), 4);
        assert!(config.seed.is_none());
        assert_eq!(config.model, HelixModel::StackingOnly);
        assert_eq!(config.energy, BasePairEnergyConfig::default());
        let default = PredictConfig::from_json("{}").unwrap();
        assert_eq!(default, PredictConfig::default());
        assert_eq!(default.seed.map(|s| s.bp()), Some(7));
        let dumped = config.to_json().unwrap();
        assert_eq!(PredictConfig::from_json(&dumped).unwrap(), config);
        assert!(PredictConfig::from_json(r#"{"suboptimals":0}"#).is_err());
        assert!(PredictConfig::from_json(r#"{"model":"zigzag"}"#).is_err());
        assert!(PredictConfig::from_json(r#"{"helix":{"min_bp":5,"max_bp":3}}"#).is_err());
    }
    #[test]
    fn predict_duplex() {
        let mut config = PredictConfig::default();
        config.helix = HelixConstraint::new(2, 4, 0, 999., 0., false).unwrap();
        config.seed = SeedConstraint::new(3, 0).ok();
        let interactions = predict(&config, b"GGGGGG", b"CCCCCC").unwrap();
        assert_eq!(interactions.len(), 1);
        assert!(e_equal(interactions[0].energy, -5.));
        assert!(interactions[0].seed.is_some());
        config.seed = None;
        let interactions = predict(&config, b"GGGGGG", b"CCCCCC").unwrap();
        assert!(e_equal(interactions[0].energy, -5.));
        assert!(predict(&config, b"GGXG", b"CCCC").is_err());
        assert!(predict(&config, b"AAAA", b"AAAA").unwrap().is_empty());
    }
}
