use bitvec::prelude::*;
use log::debug;
use rayon::prelude::*;

use crate::{database::TransactionDb, rules::rule::Rule, types::Itemset};

/// Interestingness statistics of one rule, recomputed from the transactions.
/// Supports are fractions of the database.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMetrics {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    /// `f64::INFINITY` when confidence is 1.
    pub conviction: f64,
    pub j_measure: f64,
    pub all_confidence: f64,
    pub cosine_similarity: f64,
}

impl RuleMetrics {
    /// Derives every statistic from the three supports. Zero denominators
    /// fall back to fixed values instead of producing NaN.
    pub fn from_supports(
        rule: &Rule,
        antecedent_support: f64,
        consequent_support: f64,
        rule_support: f64,
    ) -> Self {
        let confidence = rule.confidence;

        let lift = if consequent_support > 0.0 {
            confidence / consequent_support
        } else {
            0.0
        };
        let leverage = rule_support - antecedent_support * consequent_support;
        let conviction = if 1.0 - confidence > 0.0 {
            (1.0 - consequent_support) / (1.0 - confidence)
        } else {
            f64::INFINITY
        };

        let p_a_not_c = antecedent_support - rule_support;
        let p_not_c = 1.0 - consequent_support;
        let mut j_measure = 0.0;
        if confidence > 0.0 && consequent_support > 0.0 {
            j_measure += rule_support * (confidence / consequent_support).log2();
        }
        if p_a_not_c > 0.0 && p_not_c > 0.0 && 1.0 - confidence > 0.0 {
            j_measure += p_a_not_c * ((1.0 - confidence) / p_not_c).log2();
        }

        let max_support = antecedent_support.max(consequent_support);
        let all_confidence = if max_support > 0.0 {
            rule_support / max_support
        } else {
            0.0
        };
        let product = antecedent_support * consequent_support;
        let cosine_similarity = if product > 0.0 {
            rule_support / product.sqrt()
        } else {
            0.0
        };

        Self {
            antecedent: rule.antecedent.clone(),
            consequent: rule.consequent.clone(),
            support: rule_support,
            confidence,
            lift,
            leverage,
            conviction,
            j_measure,
            all_confidence,
            cosine_similarity,
        }
    }
}

/// Scores every rule against the raw transactions, in input order.
pub fn compute_metrics(rules: &[Rule], db: &TransactionDb) -> Vec<RuleMetrics> {
    let covers = db.covers();
    debug!(
        "metrics: scoring {} rules over {} transactions",
        rules.len(),
        db.len()
    );

    rules
        .par_iter()
        .map(|rule| {
            let antecedent_support = fraction(db, &covers, &rule.antecedent);
            let consequent_support = fraction(db, &covers, &rule.consequent);
            let rule_support = fraction(db, &covers, &rule.itemset());
            RuleMetrics::from_supports(rule, antecedent_support, consequent_support, rule_support)
        })
        .collect()
}

/// Share of transactions containing every item of `itemset`. Items the
/// database never saw give 0.
fn fraction(db: &TransactionDb, covers: &[BitVec], itemset: &[String]) -> f64 {
    if db.is_empty() {
        return 0.0;
    }
    let ids = match db.ids(itemset) {
        Some(ids) => ids,
        None => return 0.0,
    };

    let mut cover: BitVec = BitVec::repeat(true, db.len());
    for id in ids {
        cover &= covers[id].as_bitslice();
    }
    cover.count_ones() as f64 / db.len() as f64
}

/// Means of every statistic across a rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSummary {
    pub rules: usize,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
    pub j_measure: f64,
    pub all_confidence: f64,
    pub cosine_similarity: f64,
}

impl MetricsSummary {
    /// All zero for an empty slice. A single rule with confidence 1 makes the
    /// mean conviction infinite.
    pub fn from_metrics(metrics: &[RuleMetrics]) -> Self {
        if metrics.is_empty() {
            return Self::default();
        }
        let n = metrics.len() as f64;
        let mean = |f: fn(&RuleMetrics) -> f64| metrics.iter().map(f).sum::<f64>() / n;

        Self {
            rules: metrics.len(),
            support: mean(|m| m.support),
            confidence: mean(|m| m.confidence),
            lift: mean(|m| m.lift),
            leverage: mean(|m| m.leverage),
            conviction: mean(|m| m.conviction),
            j_measure: mean(|m| m.j_measure),
            all_confidence: mean(|m| m.all_confidence),
            cosine_similarity: mean(|m| m.cosine_similarity),
        }
    }
}
