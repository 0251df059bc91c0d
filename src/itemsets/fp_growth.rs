use std::collections::HashMap;

use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    combi::{nonempty_subsets, sorted_union},
    database::TransactionDb,
    error::{check_min_support, MiningError, Result},
    itemsets::{merge_all, merge_pattern, tree::FpTree, PatternMiner},
    types::{ItemId, ItemIdset, ItemsetCounts, SupportCount, WeightedTransaction},
};

/// Prefix-tree miner.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpGrowth {
    /// Mine the top-level conditional trees on the rayon pool.
    pub parallel: bool,
}

impl PatternMiner for FpGrowth {
    fn mine(&self, db: &TransactionDb, min_support: SupportCount) -> Result<ItemsetCounts> {
        check_min_support(min_support)?;
        if db.is_empty() {
            return Ok(HashMap::new());
        }

        let transactions: Vec<WeightedTransaction> = db
            .transactions()
            .iter()
            .map(|transaction| (transaction.clone(), 1))
            .collect();
        let tree = FpTree::build(&transactions, min_support, db.len() as SupportCount);
        debug!(
            "fp-growth: {} transactions, {} frequent items, {} nodes",
            db.len(),
            tree.frequent.len(),
            tree.nodes.len()
        );

        let patterns = self.mine_built(tree, min_support)?;
        debug!("fp-growth: {} frequent itemsets", patterns.len());
        Ok(patterns)
    }
}

impl FpGrowth {
    /// Mines an already built top-level tree. A fault in any sub-problem
    /// fails the whole call.
    fn mine_built(&self, tree: FpTree, min_support: SupportCount) -> Result<ItemsetCounts> {
        let patterns = if self.parallel && !tree.has_single_path() {
            let partials = tree
                .mining_order()
                .into_par_iter()
                .map(|(item, support)| mine_item(&tree, &[], item, support, min_support))
                .collect::<Result<Vec<ItemsetCounts>>>()?;
            let mut patterns = HashMap::new();
            merge_all(&mut patterns, partials);
            patterns
        } else {
            mine_tree(tree, Vec::new(), min_support)?
        };
        Ok(patterns)
    }
}

/// A tree waiting to be mined, with the items it is conditioned on.
struct Frame {
    tree: FpTree,
    suffix: ItemIdset,
    order: Vec<(ItemId, SupportCount)>,
    next: usize,
}

/// Mines `tree` and every conditional tree below it with an explicit stack.
fn mine_tree(tree: FpTree, suffix: ItemIdset, min_support: SupportCount) -> Result<ItemsetCounts> {
    let mut patterns = HashMap::new();
    let mut stack = Vec::new();
    push_or_emit(tree, suffix, &mut stack, &mut patterns);

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.order.len() {
            stack.pop();
            continue;
        }
        let (item, support) = frame.order[frame.next];
        frame.next += 1;

        let pattern = sorted_union(&frame.suffix, &[item]);
        merge_pattern(&mut patterns, pattern.clone(), support);
        let conditional = conditional_tree(&frame.tree, item, support, min_support)?;
        if !conditional.is_empty() {
            push_or_emit(conditional, pattern, &mut stack, &mut patterns);
        }
    }

    Ok(patterns)
}

/// Mines the sub-problem of one item of `tree`, including the item itself.
fn mine_item(
    tree: &FpTree,
    suffix: &[ItemId],
    item: ItemId,
    support: SupportCount,
    min_support: SupportCount,
) -> Result<ItemsetCounts> {
    let pattern = sorted_union(suffix, &[item]);
    let conditional = conditional_tree(tree, item, support, min_support)?;

    let mut patterns = if conditional.is_empty() {
        HashMap::new()
    } else {
        mine_tree(conditional, pattern.clone(), min_support)?
    };
    merge_pattern(&mut patterns, pattern, support);
    Ok(patterns)
}

/// Branch-free trees are enumerated in closed form; all others are stacked.
fn push_or_emit(
    tree: FpTree,
    suffix: ItemIdset,
    stack: &mut Vec<Frame>,
    patterns: &mut ItemsetCounts,
) {
    if tree.has_single_path() {
        emit_single_path(&tree.single_path(), &suffix, patterns);
    } else {
        let order = tree.mining_order();
        stack.push(Frame {
            tree,
            suffix,
            order,
            next: 0,
        });
    }
}

/// Every non-empty subset of the path, joined with the suffix. Support is the
/// smallest count among the chosen nodes.
fn emit_single_path(
    path: &[(ItemId, SupportCount)],
    suffix: &[ItemId],
    patterns: &mut ItemsetCounts,
) {
    for subset in nonempty_subsets(path) {
        let support = subset.iter().map(|&(_, count)| count).min().unwrap_or(0);
        let mut items: Vec<ItemId> = subset.iter().map(|&(item, _)| item).collect();
        items.sort_unstable();
        merge_pattern(patterns, sorted_union(suffix, &items), support);
    }
}

fn conditional_tree(
    tree: &FpTree,
    item: ItemId,
    support: SupportCount,
    min_support: SupportCount,
) -> Result<FpTree> {
    let base = tree.conditional_pattern_base(item);
    let conditional = FpTree::build(&base, min_support, support);
    trace!(
        "conditional tree for item {}: {} paths, {} nodes",
        item,
        base.len(),
        conditional.nodes.len()
    );

    if conditional.first_level_count() > conditional.root_count() {
        return Err(MiningError::InvariantViolation(format!(
            "conditional tree for item {} holds {} occurrences but the item has support {}",
            item,
            conditional.first_level_count(),
            conditional.root_count()
        )));
    }
    Ok(conditional)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    fn scenario() -> TransactionDb {
        TransactionDb::new(vec![
            vec!["a", "b"],
            vec!["b", "c"],
            vec!["a", "b", "c"],
            vec!["a", "b", "c", "d"],
        ])
    }

    #[test]
    fn mines_reference_scenario() {
        // a=0 b=1 c=2 d=3
        let patterns = FpGrowth::default().mine(&scenario(), 2).unwrap();
        let expected = hashmap! {
            vec![0] => 3,
            vec![1] => 4,
            vec![2] => 3,
            vec![0, 1] => 3,
            vec![1, 2] => 3,
            vec![0, 2] => 2,
            vec![0, 1, 2] => 2,
        };
        assert_eq!(patterns, expected);
    }

    #[test]
    fn parallel_matches_sequential() {
        let db = scenario();
        let sequential = FpGrowth { parallel: false }.mine(&db, 1).unwrap();
        let parallel = FpGrowth { parallel: true }.mine(&db, 1).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), 15);
    }

    #[test]
    fn single_path_tree_is_enumerated() {
        let db = TransactionDb::new(vec![vec!["x", "y", "z"], vec!["x", "y"], vec!["x"]]);
        let patterns = FpGrowth::default().mine(&db, 1).unwrap();
        let expected = hashmap! {
            vec![0] => 3,
            vec![1] => 2,
            vec![2] => 1,
            vec![0, 1] => 2,
            vec![0, 2] => 1,
            vec![1, 2] => 1,
            vec![0, 1, 2] => 1,
        };
        assert_eq!(patterns, expected);
    }

    #[test]
    fn empty_database_yields_nothing() {
        let db = TransactionDb::new(Vec::<Vec<&str>>::new());
        assert!(FpGrowth::default().mine(&db, 1).unwrap().is_empty());
    }

    #[test]
    fn zero_support_is_rejected() {
        let err = FpGrowth::default().mine(&scenario(), 0).unwrap_err();
        assert!(matches!(err, MiningError::InvalidSupport(0)));
    }

    #[test]
    fn threshold_above_every_item_yields_nothing() {
        assert!(FpGrowth::default().mine(&scenario(), 5).unwrap().is_empty());
    }

    #[test]
    fn emit_single_path_joins_suffix() {
        let mut patterns = HashMap::new();
        emit_single_path(&[(4, 3), (1, 2)], &[7], &mut patterns);
        assert_eq!(
            patterns,
            hashmap! {
                vec![4, 7] => 3,
                vec![1, 7] => 2,
                vec![1, 4, 7] => 2,
            }
        );
    }

    fn scenario_tree() -> FpTree {
        let transactions: Vec<WeightedTransaction> = scenario()
            .transactions()
            .iter()
            .map(|transaction| (transaction.clone(), 1))
            .collect();
        FpTree::build(&transactions, 1, 4)
    }

    #[test]
    fn conditional_tree_rejects_understated_support() {
        // c=2 occurs under b once and under b-a twice
        let tree = scenario_tree();
        assert!(conditional_tree(&tree, 2, 3, 1).is_ok());

        let err = conditional_tree(&tree, 2, 2, 1).unwrap_err();
        assert!(matches!(err, MiningError::InvariantViolation(_)));
    }

    #[test]
    fn fault_in_one_item_fails_the_whole_call() {
        for &parallel in &[false, true] {
            let mut tree = scenario_tree();
            tree.frequent.insert(2, 2);
            let result = FpGrowth { parallel }.mine_built(tree, 1);
            assert!(
                matches!(result, Err(MiningError::InvariantViolation(_))),
                "parallel: {}",
                parallel
            );
        }
    }
}
