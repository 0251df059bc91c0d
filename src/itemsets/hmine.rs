use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    combi::sorted_union,
    database::TransactionDb,
    error::{check_min_support, MiningError, Result},
    itemsets::{merge_all, merge_pattern, PatternMiner},
    types::{ItemCounts, ItemId, ItemIdset, ItemsetCounts, SupportCount},
};

/// Separates transactions inside the projection buffer.
pub const SENTINEL: ItemId = ItemId::MAX;

/// Projected-array miner.
#[derive(Debug, Clone, Copy, Default)]
pub struct HMine {
    /// Mine the top-level rows on the rayon pool.
    pub parallel: bool,
}

impl PatternMiner for HMine {
    fn mine(&self, db: &TransactionDb, min_support: SupportCount) -> Result<ItemsetCounts> {
        check_min_support(min_support)?;
        if db.is_empty() {
            return Ok(HashMap::new());
        }

        let projection = Projection::build(db, min_support);
        debug!(
            "h-mine: {} transactions, {} frequent items, buffer of {}",
            db.len(),
            projection.rows.len(),
            projection.buffer.len()
        );

        let patterns = self.mine_projection(&projection, min_support)?;
        debug!("h-mine: {} frequent itemsets", patterns.len());
        Ok(patterns)
    }
}

impl HMine {
    /// Mines the top level of `projection`. A fault in any row fails the
    /// whole call.
    fn mine_projection(
        &self,
        projection: &Projection,
        min_support: SupportCount,
    ) -> Result<ItemsetCounts> {
        let patterns = if self.parallel {
            let partials = projection
                .rows
                .par_iter()
                .map(|row| projection.mine(&[], std::slice::from_ref(row), min_support))
                .collect::<Result<Vec<ItemsetCounts>>>()?;
            let mut patterns = HashMap::new();
            merge_all(&mut patterns, partials);
            patterns
        } else {
            projection.mine(&[], &projection.rows, min_support)?
        };
        Ok(patterns)
    }
}

/// One item of a projection level: its support and every buffer position
/// where it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub item: ItemId,
    pub support: SupportCount,
    pub pointers: Vec<usize>,
}

impl Row {
    fn new(item: ItemId) -> Self {
        Self {
            item,
            support: 0,
            pointers: Vec::new(),
        }
    }
}

/// Frequent items of every transaction flattened into one buffer, each
/// transaction ordered by ascending global support and closed by `SENTINEL`.
#[derive(Debug, Clone)]
pub struct Projection {
    pub buffer: Vec<ItemId>,
    pub rows: Vec<Row>,
}

struct Frame {
    prefix: ItemIdset,
    rows: Vec<Row>,
    next: usize,
}

impl Projection {
    pub fn build(db: &TransactionDb, min_support: SupportCount) -> Self {
        let frequent: ItemCounts = db.frequent_items(min_support).into_iter().collect();
        let mut rows: HashMap<ItemId, Row> = frequent
            .keys()
            .map(|&item| (item, Row::new(item)))
            .collect();
        let mut buffer = Vec::new();

        for transaction in db.transactions() {
            let items: Vec<ItemId> = transaction
                .iter()
                .copied()
                .filter(|item| frequent.contains_key(item))
                .sorted_unstable_by_key(|item| (frequent[item], *item))
                .collect();
            if items.is_empty() {
                continue;
            }

            for item in items {
                if let Some(row) = rows.get_mut(&item) {
                    row.support += 1;
                    row.pointers.push(buffer.len());
                }
                buffer.push(item);
            }
            buffer.push(SENTINEL);
        }

        Self {
            buffer,
            rows: sort_rows(rows.into_values().collect()),
        }
    }

    /// Rows of the level below `row`: every item found after one of its
    /// positions, up to the end of that transaction. Infrequent items are
    /// dropped.
    pub fn project(&self, row: &Row, min_support: SupportCount) -> Result<Vec<Row>> {
        let mut level: HashMap<ItemId, Row> = HashMap::new();

        for &pointer in &row.pointers {
            let mut position = pointer + 1;
            while let Some(&item) = self.buffer.get(position) {
                if item == SENTINEL {
                    break;
                }
                let entry = level.entry(item).or_insert_with(|| Row::new(item));
                entry.support += 1;
                entry.pointers.push(position);
                position += 1;
            }
        }

        if let Some(over) = level.values().find(|r| r.support > row.support) {
            return Err(MiningError::InvariantViolation(format!(
                "item {} projected below item {} has support {} above its parent's {}",
                over.item, row.item, over.support, row.support
            )));
        }

        Ok(sort_rows(
            level
                .into_values()
                .filter(|r| r.support >= min_support)
                .collect(),
        ))
    }

    /// Mines `rows` and every level projected below them with an explicit
    /// stack. Each frame owns its rows.
    pub fn mine(
        &self,
        prefix: &[ItemId],
        rows: &[Row],
        min_support: SupportCount,
    ) -> Result<ItemsetCounts> {
        let mut patterns = HashMap::new();
        let mut stack = vec![Frame {
            prefix: prefix.to_vec(),
            rows: rows.to_vec(),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.rows.len() {
                stack.pop();
                continue;
            }
            let row = &frame.rows[frame.next];
            frame.next += 1;

            let pattern = sorted_union(&frame.prefix, &[row.item]);
            merge_pattern(&mut patterns, pattern.clone(), row.support);

            let next_rows = self.project(row, min_support)?;
            if !next_rows.is_empty() {
                trace!("h-mine: {} rows below {:?}", next_rows.len(), pattern);
                stack.push(Frame {
                    prefix: pattern,
                    rows: next_rows,
                    next: 0,
                });
            }
        }

        Ok(patterns)
    }
}

/// Ascending support, ties by ascending id.
fn sort_rows(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort_unstable_by_key(|row| (row.support, row.item));
    rows
}
