//! Mapping-rule evaluation
//!
//! A BBI's mapping rules combine per-indicator verdict requirements with one
//! boolean operator. Status comparison is plain string equality against the
//! snapshot of verdicts for one assessment; a missing indicator is an
//! unsatisfied condition, not an error.

use cap_calc::GroupOperator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Verdict snapshot for one assessment: indicator_id -> status string.
pub type IndicatorStatuses = HashMap<i64, String>;

/// One requirement on one indicator's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingCondition {
    pub indicator_id: i64,
    pub required_status: String,
}

/// The authored mapping rules of a BBI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingRules {
    #[serde(default)]
    pub operator: GroupOperator,
    #[serde(default)]
    pub conditions: Vec<MappingCondition>,
}

/// Evaluate mapping rules against the verdict snapshot. No conditions means
/// no rule is defined, which is non-functional by default.
pub fn evaluate_mapping(rules: &MappingRules, statuses: &IndicatorStatuses) -> bool {
    if rules.conditions.is_empty() {
        return false;
    }

    let satisfied = |c: &MappingCondition| {
        statuses
            .get(&c.indicator_id)
            .map(|actual| actual == &c.required_status)
            .unwrap_or(false)
    };

    match &rules.operator {
        GroupOperator::And => rules.conditions.iter().all(satisfied),
        GroupOperator::Or => rules.conditions.iter().any(satisfied),
        GroupOperator::Other(op) => {
            warn!(operator = %op, "unknown mapping operator, falling back to AND");
            rules.conditions.iter().all(satisfied)
        }
    }
}
