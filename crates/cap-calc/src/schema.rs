//! Calculation schema: condition groups over rules
//!
//! A schema is an ordered list of condition groups, each reducing its rules
//! through one boolean operator. The pass/fail display labels ride along but
//! are cosmetic; the canonical verdict is always the enum.

use crate::rule::Rule;
use cap_core::ResponseData;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Boolean reduction operator for a group of rules (or mapping conditions).
///
/// Parsing is lenient: an unrecognized operator string is preserved and
/// evaluated with AND semantics, so malformed authored data degrades to the
/// strictest default instead of crashing evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupOperator {
    And,
    Or,
    Other(String),
}

impl From<String> for GroupOperator {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => GroupOperator::And,
            "OR" => GroupOperator::Or,
            _ => GroupOperator::Other(s),
        }
    }
}

impl From<GroupOperator> for String {
    fn from(op: GroupOperator) -> Self {
        match op {
            GroupOperator::And => "AND".to_string(),
            GroupOperator::Or => "OR".to_string(),
            GroupOperator::Other(s) => s,
        }
    }
}

impl Default for GroupOperator {
    fn default() -> Self {
        GroupOperator::And
    }
}

impl fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GroupOperator::And => write!(f, "AND"),
            GroupOperator::Or => write!(f, "OR"),
            GroupOperator::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A cluster of rules combined by one operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub operator: GroupOperator,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl ConditionGroup {
    /// Reduce the group's rules over the response data. An empty rule list
    /// is false: a group that checks nothing must not pass anything.
    pub fn evaluate(&self, data: &ResponseData) -> bool {
        if self.rules.is_empty() {
            warn!("condition group has no rules, evaluating to false");
            return false;
        }
        match &self.operator {
            GroupOperator::And => self.rules.iter().all(|r| r.evaluate(data)),
            GroupOperator::Or => self.rules.iter().any(|r| r.evaluate(data)),
            GroupOperator::Other(op) => {
                warn!(operator = %op, "unknown group operator, falling back to AND");
                self.rules.iter().all(|r| r.evaluate(data))
            }
        }
    }
}

fn default_pass_label() -> String {
    "Pass".to_string()
}

fn default_fail_label() -> String {
    "Fail".to_string()
}

/// The full calculation schema attached to an indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationSchema {
    #[serde(default)]
    pub condition_groups: Vec<ConditionGroup>,
    /// Display label when the calculation passes. Cosmetic only.
    #[serde(default = "default_pass_label")]
    pub output_status_on_pass: String,
    /// Display label when the calculation fails. Cosmetic only.
    #[serde(default = "default_fail_label")]
    pub output_status_on_fail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{ComparisonOp, Condition};
    use serde_json::json;

    fn threshold_rule(field: &str, threshold: f64) -> Rule {
        Rule::PercentageThreshold {
            field: field.to_string(),
            operator: ComparisonOp::Gte,
            threshold,
        }
    }

    #[test]
    fn test_group_operator_lenient_parse() {
        let op: GroupOperator = serde_json::from_value(json!("AND")).unwrap();
        assert_eq!(op, GroupOperator::And);
        let op: GroupOperator = serde_json::from_value(json!("or")).unwrap();
        assert_eq!(op, GroupOperator::Or);
        let op: GroupOperator = serde_json::from_value(json!("XOR")).unwrap();
        assert_eq!(op, GroupOperator::Other("XOR".to_string()));
    }

    #[test]
    fn test_and_group_requires_all_rules() {
        let group = ConditionGroup {
            operator: GroupOperator::And,
            rules: vec![threshold_rule("hours", 40.0), threshold_rule("attendance", 80.0)],
        };
        let mut data = cap_core::ResponseData::new();
        data.insert("hours".into(), json!(45));
        data.insert("attendance".into(), json!(85));
        assert!(group.evaluate(&data));

        data.insert("attendance".into(), json!(70));
        assert!(!group.evaluate(&data));
    }

    #[test]
    fn test_or_group_requires_any_rule() {
        let group = ConditionGroup {
            operator: GroupOperator::Or,
            rules: vec![threshold_rule("hours", 40.0), threshold_rule("attendance", 80.0)],
        };
        let mut data = cap_core::ResponseData::new();
        data.insert("hours".into(), json!(10));
        data.insert("attendance".into(), json!(85));
        assert!(group.evaluate(&data));
    }

    #[test]
    fn test_unknown_group_operator_falls_back_to_and() {
        let group = ConditionGroup {
            operator: GroupOperator::Other("XOR".to_string()),
            rules: vec![threshold_rule("a", 50.0), threshold_rule("b", 50.0)],
        };
        let mut data = cap_core::ResponseData::new();
        data.insert("a".into(), json!(60));
        data.insert("b".into(), json!(40));
        // AND fallback: one failing rule fails the group.
        assert!(!group.evaluate(&data));
    }

    #[test]
    fn test_empty_group_is_false() {
        let group = ConditionGroup {
            operator: GroupOperator::And,
            rules: vec![],
        };
        assert!(!group.evaluate(&cap_core::ResponseData::new()));
    }

    #[test]
    fn test_schema_label_defaults() {
        let schema: CalculationSchema =
            serde_json::from_value(json!({ "condition_groups": [] })).unwrap();
        assert_eq!(schema.output_status_on_pass, "Pass");
        assert_eq!(schema.output_status_on_fail, "Fail");
    }
}
