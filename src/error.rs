use thiserror::Error;

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("minimum support must be a positive transaction count, got {0}")]
    InvalidSupport(u32),
    #[error("support fraction must lie in (0, 1], got {0}")]
    InvalidSupportFraction(f64),
    #[error("minimum confidence must lie in [0, 1], got {0}")]
    InvalidConfidence(f64),
    #[error("unknown mining engine {0:?}, expected \"tree\" or \"array\"")]
    UnknownEngine(String),
    #[error("mining invariant violated: {0}")]
    InvariantViolation(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MiningError>;

pub(crate) fn check_min_support(min_support: u32) -> Result<()> {
    if min_support == 0 {
        return Err(MiningError::InvalidSupport(min_support));
    }
    Ok(())
}

pub(crate) fn check_min_confidence(min_confidence: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&min_confidence) {
        return Err(MiningError::InvalidConfidence(min_confidence));
    }
    Ok(())
}
