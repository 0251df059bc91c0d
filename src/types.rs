use std::collections::HashMap;

pub type ItemId = usize;
pub type ItemName = String;

/// Sorted, deduplicated item names.
pub type Itemset = Vec<ItemName>;
/// Sorted, deduplicated item ids.
pub type ItemIdset = Vec<ItemId>;

pub type Transaction = Vec<ItemId>;
pub type SupportCount = u32;

pub type ItemCounts = HashMap<ItemId, SupportCount>;
pub type ItemsetCounts = HashMap<ItemIdset, SupportCount>;

/// Frequent itemsets keyed by their canonical (sorted) form.
pub type PatternMapping = HashMap<Itemset, SupportCount>;
/// Antecedent => (consequent, confidence).
pub type RuleMapping = HashMap<Itemset, (Itemset, f64)>;

/// A transaction prefix together with the number of times it occurs.
pub type WeightedTransaction = (Vec<ItemId>, SupportCount);
