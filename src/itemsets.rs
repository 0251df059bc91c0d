pub mod fp_growth;
pub mod hmine;
pub mod tree;

use std::str::FromStr;

use serde::Deserialize;

use crate::{
    database::TransactionDb,
    error::{MiningError, Result},
    types::{ItemIdset, ItemsetCounts, SupportCount},
};

pub use fp_growth::FpGrowth;
pub use hmine::HMine;

/// Enumerates every itemset whose support reaches an absolute threshold.
///
/// Implementations must agree exactly: for the same database and threshold,
/// every miner returns the same itemsets with the same counts.
pub trait PatternMiner {
    fn mine(&self, db: &TransactionDb, min_support: SupportCount) -> Result<ItemsetCounts>;
}

/// Selects a mining strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Compressed prefix tree with conditional sub-trees.
    Tree,
    /// Flat projection buffer with per-item pointer rows.
    Array,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::Tree
    }
}

impl Engine {
    pub fn miner(self, parallel: bool) -> Box<dyn PatternMiner + Send + Sync> {
        match self {
            Engine::Tree => Box::new(FpGrowth { parallel }),
            Engine::Array => Box::new(HMine { parallel }),
        }
    }
}

impl FromStr for Engine {
    type Err = MiningError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "tree" | "fp-growth" => Ok(Engine::Tree),
            "array" | "h-mine" => Ok(Engine::Array),
            other => Err(MiningError::UnknownEngine(other.to_owned())),
        }
    }
}

/// Adds `support` to `pattern`, summing when the pattern is already present.
pub(crate) fn merge_pattern(patterns: &mut ItemsetCounts, pattern: ItemIdset, support: SupportCount) {
    *patterns.entry(pattern).or_insert(0) += support;
}

pub(crate) fn merge_all(patterns: &mut ItemsetCounts, partials: Vec<ItemsetCounts>) {
    for partial in partials {
        for (pattern, support) in partial {
            merge_pattern(patterns, pattern, support);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn parses_engine_names() {
        assert_eq!("tree".parse::<Engine>().unwrap(), Engine::Tree);
        assert_eq!("h-mine".parse::<Engine>().unwrap(), Engine::Array);
        assert!(matches!(
            "apriori".parse::<Engine>(),
            Err(MiningError::UnknownEngine(_))
        ));
    }

    #[test]
    fn merge_sums_coinciding_patterns() {
        let mut patterns = hashmap! { vec![1] => 2 };
        merge_all(
            &mut patterns,
            vec![hashmap! { vec![1] => 3, vec![2] => 1 }, hashmap! { vec![2] => 4 }],
        );
        assert_eq!(patterns, hashmap! { vec![1] => 5, vec![2] => 5 });
    }

    #[test]
    fn engines_agree_through_trait_objects() {
        let db = TransactionDb::new(vec![vec!["p", "q"], vec!["q", "r"], vec!["p", "q", "r"]]);
        let tree = Engine::Tree.miner(false).mine(&db, 2).unwrap();
        let array = Engine::Array.miner(true).mine(&db, 2).unwrap();
        assert_eq!(tree, array);
    }
}
