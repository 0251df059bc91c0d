use std::collections::HashMap;

use log::debug;
use rayon::prelude::*;

use crate::{
    combi::proper_splits,
    error::{check_min_confidence, Result},
    rules::rule::Rule,
    types::{Itemset, PatternMapping, RuleMapping},
};

/// Generate rules keyed by antecedent.
///
/// When several consequents qualify for the same antecedent only the last one
/// processed is kept. Itemsets are processed by length, then lexically, and the
/// splits of one itemset in combination order, so the survivor is stable
/// across runs. Use [`generate_all_rules`] to keep every qualifying rule.
pub fn generate_rules(patterns: &PatternMapping, min_confidence: f64) -> Result<RuleMapping> {
    let rules = qualifying_rules(patterns, min_confidence)?;
    let found = rules.len();

    let mut mapping: RuleMapping = HashMap::with_capacity(found);
    for rule in rules {
        mapping.insert(rule.antecedent, (rule.consequent, rule.confidence));
    }
    debug!(
        "rules: {} qualifying splits, {} kept by antecedent",
        found,
        mapping.len()
    );
    Ok(mapping)
}

/// Every qualifying rule, ordered by antecedent then consequent.
pub fn generate_all_rules(patterns: &PatternMapping, min_confidence: f64) -> Result<Vec<Rule>> {
    let mut rules = qualifying_rules(patterns, min_confidence)?;
    rules.sort_by(|a, b| {
        a.antecedent
            .cmp(&b.antecedent)
            .then_with(|| a.consequent.cmp(&b.consequent))
    });
    debug!("rules: {} qualifying splits", rules.len());
    Ok(rules)
}

/// Rules in processing order.
fn qualifying_rules(patterns: &PatternMapping, min_confidence: f64) -> Result<Vec<Rule>> {
    check_min_confidence(min_confidence)?;

    let mut itemsets: Vec<(&Itemset, u32)> = patterns
        .iter()
        .filter(|(itemset, _)| itemset.len() > 1)
        .map(|(itemset, &support)| (itemset, support))
        .collect();
    itemsets.sort_unstable_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(b.0)));

    let per_itemset: Vec<Vec<Rule>> = itemsets
        .par_iter()
        .map(|&(itemset, support)| split(itemset, support, patterns, min_confidence))
        .collect();
    Ok(per_itemset.into_iter().flatten().collect())
}

/// Rules from one itemset. Splits whose antecedent is not itself frequent, or
/// whose antecedent support is below the itemset's, are skipped.
fn split(
    itemset: &[String],
    support: u32,
    patterns: &PatternMapping,
    min_confidence: f64,
) -> Vec<Rule> {
    proper_splits(itemset)
        .into_iter()
        .filter_map(|(antecedent, consequent)| {
            let antecedent_support = *patterns.get(&antecedent)?;
            if antecedent_support < support {
                return None;
            }
            let confidence = f64::from(support) / f64::from(antecedent_support);
            if confidence >= min_confidence {
                Some(Rule {
                    antecedent,
                    consequent,
                    confidence,
                })
            } else {
                None
            }
        })
        .collect()
}
