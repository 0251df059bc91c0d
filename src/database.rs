use std::collections::{BTreeSet, HashMap};

use bitvec::prelude::*;
use itertools::Itertools;

use crate::{
    error::{MiningError, Result},
    types::{
        ItemId, ItemIdset, ItemName, ItemsetCounts, Itemset, PatternMapping, SupportCount,
        Transaction,
    },
};

/// Relative slack absorbed before rounding a fractional threshold up.
const ROUNDING_TOLERANCE: f64 = 1e-9;

/// Interned, deduplicated transactions with global item counts.
///
/// Item ids follow the lexical order of item names, so they do not depend on
/// the order in which transactions arrive and a sorted id list always maps to
/// a sorted name list.
#[derive(Debug, Clone, Default)]
pub struct TransactionDb {
    inventory: Vec<ItemName>,
    reverse_lookup: HashMap<ItemName, ItemId>,
    transactions: Vec<Transaction>,
    item_counts: Vec<SupportCount>,
}

impl TransactionDb {
    pub fn new<T, I, S>(raw_transactions: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<Vec<ItemName>> = raw_transactions
            .into_iter()
            .map(|t| t.into_iter().map(|item| item.as_ref().to_owned()).collect())
            .collect();

        let names: BTreeSet<&ItemName> = raw.iter().flatten().collect();
        let inventory: Vec<ItemName> = names.into_iter().cloned().collect();
        let reverse_lookup: HashMap<ItemName, ItemId> = inventory
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        let mut item_counts = vec![0; inventory.len()];
        let transactions: Vec<Transaction> = raw
            .iter()
            .map(|raw_transaction| {
                let items: Transaction = raw_transaction
                    .iter()
                    .map(|name| reverse_lookup[name])
                    .sorted_unstable()
                    .dedup()
                    .collect();
                for &item in &items {
                    item_counts[item] += 1;
                }
                items
            })
            .collect();

        Self {
            inventory,
            reverse_lookup,
            transactions,
            item_counts,
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of distinct items.
    pub fn num_items(&self) -> usize {
        self.inventory.len()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of transactions containing `item`.
    pub fn support(&self, item: ItemId) -> SupportCount {
        self.item_counts.get(item).copied().unwrap_or(0)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.reverse_lookup.get(name).copied()
    }

    pub fn item_name(&self, item: ItemId) -> Option<&str> {
        self.inventory.get(item).map(String::as_str)
    }

    /// Translates ids into their canonical sorted name form, or `None` if any
    /// id is unknown.
    pub fn names(&self, items: &[ItemId]) -> Option<Itemset> {
        let names: Option<Itemset> = items
            .iter()
            .map(|&item| self.inventory.get(item).cloned())
            .collect();
        names.map(|names| names.into_iter().sorted_unstable().collect())
    }

    /// Translates mined id patterns into their name form. Patterns holding an
    /// unknown id are dropped.
    pub fn name_patterns(&self, counts: ItemsetCounts) -> PatternMapping {
        counts
            .into_iter()
            .filter_map(|(items, support)| self.names(&items).map(|names| (names, support)))
            .collect()
    }

    /// Translates names into a sorted id list, or `None` if any name is unknown.
    pub fn ids<S: AsRef<str>>(&self, names: &[S]) -> Option<ItemIdset> {
        let ids: Option<ItemIdset> = names.iter().map(|n| self.item_id(n.as_ref())).collect();
        ids.map(|ids| ids.into_iter().sorted_unstable().dedup().collect())
    }

    /// Items meeting `min_support`, with their global counts.
    pub fn frequent_items(&self, min_support: SupportCount) -> Vec<(ItemId, SupportCount)> {
        self.item_counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count >= min_support)
            .map(|(item, &count)| (item, count))
            .collect()
    }

    /// One bit per transaction, per item: set where the item occurs.
    pub fn covers(&self) -> Vec<BitVec> {
        let mut covers = vec![bitvec![0; self.len()]; self.num_items()];
        for (tid, transaction) in self.transactions.iter().enumerate() {
            for &item in transaction {
                covers[item].set(tid, true);
            }
        }
        covers
    }

    /// Converts a fraction of the database into an absolute transaction count.
    pub fn absolute_support(&self, fraction: f64) -> Result<SupportCount> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(MiningError::InvalidSupportFraction(fraction));
        }
        // 0.28 * 25 is 7.000000000000001; drop that noise before rounding up
        let exact = fraction * self.len() as f64;
        let count = (exact - exact * ROUNDING_TOLERANCE).ceil() as SupportCount;
        Ok(count.max(1))
    }
}
