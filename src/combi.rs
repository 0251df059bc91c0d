use itertools::Itertools;

/// Every non-empty subset of `items`, smallest first.
pub fn nonempty_subsets<T: Clone>(items: &[T]) -> impl Iterator<Item = Vec<T>> + '_ {
    (1..=items.len()).flat_map(move |size| items.iter().cloned().combinations(size))
}

/// Every (antecedent, consequent) split of a sorted itemset where both sides are
/// non-empty. Both sides stay sorted.
pub fn proper_splits<T: Clone + PartialEq>(itemset: &[T]) -> Vec<(Vec<T>, Vec<T>)> {
    (1..itemset.len())
        .flat_map(|size| itemset.iter().cloned().combinations(size))
        .map(|antecedent| {
            let consequent = itemset
                .iter()
                .filter(|item| !antecedent.contains(item))
                .cloned()
                .collect();
            (antecedent, consequent)
        })
        .collect()
}

/// Merges `extra` into the sorted `base` while keeping it sorted.
pub fn sorted_union<T: Ord + Clone>(base: &[T], extra: &[T]) -> Vec<T> {
    base.iter().cloned().merge(extra.iter().cloned()).dedup().collect()
}
