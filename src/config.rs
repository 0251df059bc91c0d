use serde::Deserialize;

use crate::{
    database::TransactionDb,
    error::{check_min_confidence, check_min_support, MiningError, Result},
    itemsets::Engine,
    types::SupportCount,
};

/// Minimum support, either as a transaction count or as a share of the
/// database.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportThreshold {
    Count(SupportCount),
    Fraction(f64),
}

/// Settings for one mining run.
///
/// ```toml
/// min_support = { fraction = 0.4 }
/// min_confidence = 0.8
/// engine = "array"
/// parallel = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MiningConfig {
    pub min_support: SupportThreshold,
    pub min_confidence: f64,
    pub engine: Engine,
    pub parallel: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: SupportThreshold::Fraction(0.1),
            min_confidence: 0.8,
            engine: Engine::default(),
            parallel: false,
        }
    }
}

impl MiningConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_min_confidence(self.min_confidence)?;
        match self.min_support {
            SupportThreshold::Count(count) => check_min_support(count),
            SupportThreshold::Fraction(fraction) if fraction > 0.0 && fraction <= 1.0 => Ok(()),
            SupportThreshold::Fraction(fraction) => {
                Err(MiningError::InvalidSupportFraction(fraction))
            }
        }
    }

    /// The absolute support count this configuration asks for on `db`.
    pub fn resolve_min_support(&self, db: &TransactionDb) -> Result<SupportCount> {
        match self.min_support {
            SupportThreshold::Count(count) => {
                check_min_support(count)?;
                Ok(count)
            }
            SupportThreshold::Fraction(fraction) => db.absolute_support(fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = MiningConfig::from_toml_str(
            r#"
            min_support = { fraction = 0.4 }
            min_confidence = 0.6
            engine = "array"
            parallel = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            MiningConfig {
                min_support: SupportThreshold::Fraction(0.4),
                min_confidence: 0.6,
                engine: Engine::Array,
                parallel: true,
            }
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = MiningConfig::from_toml_str("min_support = { count = 3 }").unwrap();
        assert_eq!(config.min_support, SupportThreshold::Count(3));
        assert_eq!(config.min_confidence, 0.8);
        assert_eq!(config.engine, Engine::Tree);
        assert!(!config.parallel);
    }

    #[test]
    fn rejects_bad_thresholds() {
        assert!(matches!(
            MiningConfig::from_toml_str("min_support = { count = 0 }"),
            Err(MiningError::InvalidSupport(0))
        ));
        assert!(matches!(
            MiningConfig::from_toml_str("min_support = { fraction = 1.5 }"),
            Err(MiningError::InvalidSupportFraction(_))
        ));
        assert!(matches!(
            MiningConfig::from_toml_str("min_confidence = 2.0"),
            Err(MiningError::InvalidConfidence(_))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            MiningConfig::from_toml_str("engine = \"quantum\""),
            Err(MiningError::Config(_))
        ));
        assert!(matches!(
            MiningConfig::from_toml_str("threshold = 3"),
            Err(MiningError::Config(_))
        ));
    }

    #[test]
    fn resolves_fraction_against_database() {
        let db = TransactionDb::new(vec![vec!["a"]; 10]);
        let config = MiningConfig {
            min_support: SupportThreshold::Fraction(0.25),
            ..MiningConfig::default()
        };
        assert_eq!(config.resolve_min_support(&db).unwrap(), 3);
    }
}
