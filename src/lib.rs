//! Frequent itemset mining and association rules.
//!
//! Two interchangeable miners, a prefix-tree one ([`FpGrowth`]) and a
//! projected-array one ([`HMine`]), enumerate every itemset reaching an
//! absolute support count. Rules are split from the frequent itemsets and
//! scored against the raw transactions.
//!
//! ```
//! use fpmine::{generate_rules, mine_patterns, Engine};
//!
//! let transactions = vec![
//!     vec!["a", "b"],
//!     vec!["b", "c"],
//!     vec!["a", "b", "c"],
//!     vec!["a", "b", "c", "d"],
//! ];
//! let patterns = mine_patterns(&transactions, 2, Engine::Tree).unwrap();
//! assert_eq!(patterns[&vec!["a".to_string(), "b".to_string()]], 3);
//!
//! let rules = generate_rules(&patterns, 0.8).unwrap();
//! assert_eq!(rules.len(), 3);
//! ```

pub mod combi;
pub mod config;
pub mod database;
pub mod error;
pub mod itemsets;
pub mod rules;
pub mod types;
#[cfg(feature = "python")]
mod wrapper;

use log::debug;

pub use config::{MiningConfig, SupportThreshold};
pub use database::TransactionDb;
pub use error::{MiningError, Result};
pub use itemsets::{Engine, FpGrowth, HMine, PatternMiner};
pub use rules::{
    compute_metrics, generate_all_rules, generate_rules, rules_from_mapping, MetricsSummary,
    Rule, RuleMetrics,
};
pub use types::{Itemset, PatternMapping, RuleMapping, SupportCount};

/// Mines every itemset contained in at least `min_support` transactions.
/// Items repeated inside one transaction count once.
pub fn mine_patterns<T, I, S>(
    transactions: T,
    min_support: SupportCount,
    engine: Engine,
) -> Result<PatternMapping>
where
    T: IntoIterator<Item = I>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let db = TransactionDb::new(transactions);
    let counts = engine.miner(false).mine(&db, min_support)?;
    Ok(db.name_patterns(counts))
}

/// Everything one configured run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub min_support: SupportCount,
    pub patterns: PatternMapping,
    pub rules: RuleMapping,
    pub metrics: Vec<RuleMetrics>,
    pub summary: MetricsSummary,
}

/// Mines `db`, derives rules and scores them as `config` asks.
pub fn analyze(config: &MiningConfig, db: &TransactionDb) -> Result<Analysis> {
    config.validate()?;
    let min_support = config.resolve_min_support(db)?;
    debug!(
        "analyze: {:?} engine, min support {} of {} transactions",
        config.engine,
        min_support,
        db.len()
    );

    let counts = config.engine.miner(config.parallel).mine(db, min_support)?;
    let patterns = db.name_patterns(counts);
    let rules = generate_rules(&patterns, config.min_confidence)?;
    let metrics = compute_metrics(&rules_from_mapping(&rules), db);
    let summary = MetricsSummary::from_metrics(&metrics);

    Ok(Analysis {
        min_support,
        patterns,
        rules,
        metrics,
        summary,
    })
}

#[cfg(feature = "python")]
#[pyo3::pymodule]
fn fpmine(_py: pyo3::Python, m: &pyo3::types::PyModule) -> pyo3::PyResult<()> {
    m.add_function(pyo3::wrap_pyfunction!(wrapper::py_mine_patterns, m)?)?;
    m.add_function(pyo3::wrap_pyfunction!(wrapper::py_generate_rules, m)?)?;
    m.add_function(pyo3::wrap_pyfunction!(wrapper::py_compute_metrics, m)?)?;
    Ok(())
}
