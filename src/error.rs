//! Configuration errors. Traceback inconsistencies are not errors, they panic.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HelixError {
    #[error("minimum base pairs ({0}) must be at least 2")]
    TooFewBasePairs(usize),
    #[error("minimum base pairs ({min}) exceeds maximum base pairs ({max})")]
    InvertedBasePairRange { min: usize, max: usize },
    #[error("seed base pairs ({0}) must be at least 2")]
    TooFewSeedBasePairs(usize),
    #[error("offset{seq} ({offset}) must be smaller than the sequence length ({len})")]
    OffsetOutOfRange { seq: u8, offset: usize, len: usize },
    #[error("seed handler must be an index-offset seed handler")]
    SeedHandlerKind,
    #[error("no seed handler bound to the helix handler")]
    MissingSeedHandler,
    #[error("invalid window [{from},{to}] for a sequence of length {len}")]
    InvalidWindow { from: usize, to: usize, len: usize },
    #[error("unknown nucleotide '{0}'")]
    UnknownNucleotide(char),
    #[error("unknown helix model: {0}")]
    UnknownModel(String),
    #[error("empty sequence")]
    EmptySequence,
    #[error("configuration: {0}")]
    Config(String),
}

impl std::convert::From<serde_json::Error> for HelixError {
    fn from(why: serde_json::Error) -> Self {
        HelixError::Config(why.to_string())
    }
}

impl std::convert::From<std::io::Error> for HelixError {
    fn from(why: std::io::Error) -> Self {
        HelixError::Config(why.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HelixError>;
