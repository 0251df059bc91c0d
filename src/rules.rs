pub mod metrics;
pub mod rule;
pub mod search;

pub use metrics::{compute_metrics, MetricsSummary, RuleMetrics};
pub use rule::{rules_from_mapping, Rule};
pub use search::{generate_all_rules, generate_rules};
