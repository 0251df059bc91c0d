use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;

use crate::types::{ItemCounts, ItemId, SupportCount, WeightedTransaction};

#[derive(Debug, Clone)]
pub struct FpNode {
    pub item: Option<ItemId>,
    pub count: SupportCount,
    pub parent: Option<usize>,
    pub children: BTreeMap<ItemId, usize>,
}

impl FpNode {
    fn new_root(count: SupportCount) -> Self {
        Self {
            item: None,
            count,
            parent: None,
            children: BTreeMap::new(),
        }
    }

    fn new_item(item: ItemId, count: SupportCount, parent: usize) -> Self {
        Self {
            item: Some(item),
            count,
            parent: Some(parent),
            children: BTreeMap::new(),
        }
    }
}

/// Prefix tree stored as an arena. Children are owned through index lists,
/// parents are plain indices used only to walk back to the root.
#[derive(Debug, Clone)]
pub struct FpTree {
    pub nodes: Vec<FpNode>,
    /// Item => every node holding that item, in insertion order.
    pub header_table: HashMap<ItemId, Vec<usize>>,
    /// Item => count within this tree. Only items meeting the threshold.
    pub frequent: ItemCounts,
}

impl FpTree {
    pub const ROOT: usize = 0;

    /// Builds a tree from weighted transactions, dropping items whose total
    /// weight falls below `min_support`. `root_count` is the support of the
    /// suffix this tree is conditioned on (or the database size at top level).
    pub fn build(
        transactions: &[WeightedTransaction],
        min_support: SupportCount,
        root_count: SupportCount,
    ) -> Self {
        let mut frequent: ItemCounts = HashMap::new();
        for (items, weight) in transactions {
            for &item in items {
                *frequent.entry(item).or_insert(0) += weight;
            }
        }
        frequent.retain(|_, &mut count| count >= min_support);

        let mut tree = Self {
            nodes: vec![FpNode::new_root(root_count)],
            header_table: HashMap::with_capacity(frequent.len()),
            frequent,
        };

        for (items, weight) in transactions {
            let ordered = tree.order_items(items);
            if !ordered.is_empty() {
                tree.insert_transaction(&ordered, *weight);
            }
        }

        tree
    }

    /// Keeps frequent items only, ordered by descending count with ties
    /// broken by ascending id.
    fn order_items(&self, items: &[ItemId]) -> Vec<ItemId> {
        items
            .iter()
            .filter_map(|item| self.frequent.get(item).map(|&count| (*item, count)))
            .sorted_unstable_by_key(|&(item, count)| (Reverse(count), item))
            .map(|(item, _)| item)
            .collect()
    }

    pub fn insert_transaction(&mut self, items: &[ItemId], weight: SupportCount) {
        let mut current_index = Self::ROOT;

        for &item in items {
            if let Some(&child_index) = self.nodes[current_index].children.get(&item) {
                self.nodes[child_index].count += weight;
                current_index = child_index;
            } else {
                let new_index = self.nodes.len();
                self.nodes
                    .push(FpNode::new_item(item, weight, current_index));
                self.nodes[current_index].children.insert(item, new_index);
                self.header_table.entry(item).or_default().push(new_index);
                current_index = new_index;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].children.is_empty()
    }

    pub fn root_count(&self) -> SupportCount {
        self.nodes[Self::ROOT].count
    }

    /// Prefix paths leading to every occurrence of `item`, each weighted by
    /// that occurrence's count. Paths run root-side first.
    pub fn conditional_pattern_base(&self, item: ItemId) -> Vec<WeightedTransaction> {
        self.header_table.get(&item).map_or(Vec::new(), |indices| {
            indices
                .iter()
                .filter_map(|&idx| {
                    let mut path = Vec::new();
                    let mut current = self.nodes[idx].parent;

                    while let Some(i) = current {
                        if let Some(parent_item) = self.nodes[i].item {
                            path.push(parent_item);
                        }
                        current = self.nodes[i].parent;
                    }

                    path.reverse();
                    (!path.is_empty()).then(|| (path, self.nodes[idx].count))
                })
                .collect()
        })
    }

    pub fn has_single_path(&self) -> bool {
        let mut current_index = Self::ROOT;

        loop {
            let children = &self.nodes[current_index].children;
            if children.len() > 1 {
                return false;
            }
            match children.values().next() {
                Some(&child_index) => current_index = child_index,
                None => return true,
            }
        }
    }

    /// `(item, count)` pairs from the root down a branch-free tree. Counts are
    /// non-increasing along the path.
    pub fn single_path(&self) -> Vec<(ItemId, SupportCount)> {
        let mut path = Vec::new();
        let mut current_index = Self::ROOT;

        while let Some(&child_index) = self.nodes[current_index].children.values().next() {
            let child = &self.nodes[child_index];
            if let Some(item) = child.item {
                path.push((item, child.count));
            }
            current_index = child_index;
        }
        path
    }

    /// Frequent items least frequent first; ties by descending id, the exact
    /// reverse of the order items are inserted along a path.
    pub fn mining_order(&self) -> Vec<(ItemId, SupportCount)> {
        self.frequent
            .iter()
            .map(|(&item, &count)| (item, count))
            .sorted_unstable_by_key(|&(item, count)| (count, Reverse(item)))
            .collect()
    }

    /// Sum of the first-level counts, which can never exceed the root count.
    pub fn first_level_count(&self) -> SupportCount {
        self.nodes[Self::ROOT]
            .children
            .values()
            .map(|&idx| self.nodes[idx].count)
            .sum()
    }
}
