use std::collections::HashMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyTuple};

use crate::{
    database::TransactionDb,
    error::MiningError,
    itemsets::Engine,
    rules::{self, Rule},
    types::{Itemset, PatternMapping, RuleMapping, SupportCount},
};

impl From<MiningError> for PyErr {
    fn from(err: MiningError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn tuple<'py>(py: Python<'py>, itemset: &[String]) -> &'py PyTuple {
    PyTuple::new(py, itemset)
}

/// Frequent itemsets as `{sorted tuple: support}`.
#[pyfunction]
#[pyo3(name = "mine_patterns", signature = (transactions, min_support, engine = "tree", parallel = false))]
pub fn py_mine_patterns(
    py: Python,
    transactions: Vec<Vec<String>>,
    min_support: SupportCount,
    engine: &str,
    parallel: bool,
) -> PyResult<Py<PyDict>> {
    let engine: Engine = engine.parse()?;
    let db = TransactionDb::new(transactions);
    let counts = engine.miner(parallel).mine(&db, min_support)?;

    let dict = PyDict::new(py);
    for (itemset, support) in db.name_patterns(counts) {
        dict.set_item(tuple(py, &itemset), support)?;
    }
    Ok(dict.into())
}

/// Rules as `{antecedent: (consequent, confidence)}`.
#[pyfunction]
#[pyo3(name = "generate_rules")]
pub fn py_generate_rules(
    py: Python,
    patterns: HashMap<Itemset, SupportCount>,
    min_confidence: f64,
) -> PyResult<Py<PyDict>> {
    let patterns: PatternMapping = patterns.into_iter().map(|(k, v)| (sorted(k), v)).collect();
    let rules = rules::generate_rules(&patterns, min_confidence)?;

    let dict = PyDict::new(py);
    for (antecedent, (consequent, confidence)) in rules {
        dict.set_item(
            tuple(py, &antecedent),
            (tuple(py, &consequent), confidence),
        )?;
    }
    Ok(dict.into())
}

/// One dict of statistics per rule.
#[pyfunction]
#[pyo3(name = "compute_metrics")]
pub fn py_compute_metrics(
    py: Python,
    rules: HashMap<Itemset, (Itemset, f64)>,
    transactions: Vec<Vec<String>>,
) -> PyResult<Vec<Py<PyDict>>> {
    let mapping: RuleMapping = rules
        .into_iter()
        .map(|(antecedent, (consequent, confidence))| {
            (sorted(antecedent), (sorted(consequent), confidence))
        })
        .collect();
    let rules: Vec<Rule> = rules::rules_from_mapping(&mapping);
    let db = TransactionDb::new(transactions);

    rules::compute_metrics(&rules, &db)
        .into_iter()
        .map(|m| {
            let dict = PyDict::new(py);
            dict.set_item("antecedent", tuple(py, &m.antecedent))?;
            dict.set_item("consequent", tuple(py, &m.consequent))?;
            dict.set_item("support", m.support)?;
            dict.set_item("confidence", m.confidence)?;
            dict.set_item("lift", m.lift)?;
            dict.set_item("leverage", m.leverage)?;
            dict.set_item("conviction", m.conviction)?;
            dict.set_item("j_measure", m.j_measure)?;
            dict.set_item("all_confidence", m.all_confidence)?;
            dict.set_item("cosine_similarity", m.cosine_similarity)?;
            Ok(dict.into())
        })
        .collect()
}

fn sorted(mut itemset: Itemset) -> Itemset {
    itemset.sort_unstable();
    itemset.dedup();
    itemset
}
