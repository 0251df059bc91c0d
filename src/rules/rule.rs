use std::fmt::{Display, Formatter, Result};

use crate::{
    combi::sorted_union,
    types::{Itemset, RuleMapping},
};

/// `antecedent => consequent`, two disjoint sorted itemsets whose union is a
/// frequent itemset.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub confidence: f64,
}

impl Rule {
    /// The frequent itemset this rule was split from.
    pub fn itemset(&self) -> Itemset {
        sorted_union(&self.antecedent, &self.consequent)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{{{}}} => {{{}}} ({:.3})",
            self.antecedent.join(", "),
            self.consequent.join(", "),
            self.confidence
        )
    }
}

/// Unpacks an antecedent-keyed mapping, ordered by antecedent.
pub fn rules_from_mapping(mapping: &RuleMapping) -> Vec<Rule> {
    let mut rules: Vec<Rule> = mapping
        .iter()
        .map(|(antecedent, (consequent, confidence))| Rule {
            antecedent: antecedent.clone(),
            consequent: consequent.clone(),
            confidence: *confidence,
        })
        .collect();
    rules.sort_by(|a, b| a.antecedent.cmp(&b.antecedent));
    rules
}

#[cfg(test)]
mod test {
    use super::*;
    use maplit::hashmap;

    fn itemset(items: &[&str]) -> Itemset {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_itemset_is_sorted_union() {
        let rule = Rule {
            antecedent: itemset(&["b", "d"]),
            consequent: itemset(&["a", "c"]),
            confidence: 0.5,
        };
        assert_eq!(rule.itemset(), itemset(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_display() {
        let rule = Rule {
            antecedent: itemset(&["bread", "milk"]),
            consequent: itemset(&["cereal"]),
            confidence: 0.8,
        };
        assert_eq!(rule.to_string(), "{bread, milk} => {cereal} (0.800)");
    }

    #[test]
    fn test_rules_from_mapping() {
        let mapping: RuleMapping = hashmap! {
            itemset(&["c"]) => (itemset(&["b"]), 1.0),
            itemset(&["a"]) => (itemset(&["b"]), 0.9),
        };
        let rules = rules_from_mapping(&mapping);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].antecedent, itemset(&["a"]));
        assert_eq!(rules[0].confidence, 0.9);
        assert_eq!(rules[1].antecedent, itemset(&["c"]));
    }
}
