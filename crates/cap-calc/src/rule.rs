//! Rule variants and their evaluation
//!
//! Every branch fails closed: a missing field, a non-numeric value where a
//! number is expected, or an empty condition list all contribute `false`.
//! Incomplete submissions can never accidentally pass compliance.

use cap_core::{as_number, ResponseData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Numeric comparison operator. Unknown operator strings are rejected at
/// parse time; the lenient path for stored documents is
/// [`CalculationEngine::evaluate_json`](crate::engine::CalculationEngine::evaluate_json).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "==")]
    Eq,
}

impl ComparisonOp {
    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Gte => lhs >= rhs,
            ComparisonOp::Lte => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Eq => (lhs - rhs).abs() < f64::EPSILON,
        }
    }
}

/// One primitive comparison inside an AND_ALL / OR_ANY rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    #[serde(alias = "field_id")]
    pub field: String,
    pub operator: ComparisonOp,
    pub value: Value,
}

impl Condition {
    /// Numeric comparison against the response. Missing field or non-numeric
    /// operand on either side is false, never an error.
    pub fn evaluate(&self, data: &ResponseData) -> bool {
        let actual = match data.get(&self.field).and_then(as_number) {
            Some(n) => n,
            None => return false,
        };
        let expected = match as_number(&self.value) {
            Some(n) => n,
            None => return false,
        };
        self.operator.compare(actual, expected)
    }
}

/// A single evaluation rule, discriminated by `rule_type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule_type")]
pub enum Rule {
    /// Every wrapped comparison must hold.
    #[serde(rename = "AND_ALL")]
    AndAll { conditions: Vec<Condition> },

    /// At least one wrapped comparison must hold.
    #[serde(rename = "OR_ANY")]
    OrAny { conditions: Vec<Condition> },

    /// Numeric comparison of one field against a threshold.
    #[serde(rename = "PERCENTAGE_THRESHOLD")]
    PercentageThreshold {
        #[serde(alias = "field_id")]
        field: String,
        operator: ComparisonOp,
        threshold: f64,
    },

    /// Equality of one field against an expected value.
    #[serde(rename = "MATCH_VALUE")]
    MatchValue {
        #[serde(alias = "field_id")]
        field: String,
        expected_value: Value,
    },
}

impl Rule {
    /// Evaluate the rule against response data, returning a bare boolean.
    pub fn evaluate(&self, data: &ResponseData) -> bool {
        match self {
            Rule::AndAll { conditions } => {
                if conditions.is_empty() {
                    warn!("AND_ALL rule has no conditions, evaluating to false");
                    return false;
                }
                conditions.iter().all(|c| c.evaluate(data))
            }
            Rule::OrAny { conditions } => conditions.iter().any(|c| c.evaluate(data)),
            Rule::PercentageThreshold {
                field,
                operator,
                threshold,
            } => match data.get(field).and_then(as_number) {
                Some(actual) => operator.compare(actual, *threshold),
                None => false,
            },
            Rule::MatchValue {
                field,
                expected_value,
            } => match data.get(field) {
                Some(actual) => values_equal(actual, expected_value),
                None => false,
            },
        }
    }
}

/// Equality with numeric normalization so `85` matches `85.0`. Everything
/// else is strict JSON equality.
fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(e)) => (a - e).abs() < f64::EPSILON,
        _ => actual == expected,
    }
}
