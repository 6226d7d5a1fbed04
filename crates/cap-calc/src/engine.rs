//! Calculation orchestrator
//!
//! Reduces a calculation schema to one canonical verdict. A null schema is
//! always Fail: an indicator with no calculation logic cannot be auto-passed.

use crate::remark::RemarkSchema;
use crate::schema::{CalculationSchema, GroupOperator};
use cap_core::{ResponseData, ValidationStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Evaluation outcome with the cosmetic label and optional remark attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub status: ValidationStatus,
    /// The schema's display label for this outcome. Never branch on it.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Stateless calculation engine. Construct once and share freely; it holds
/// no mutable state and is safe to call from any number of threads.
#[derive(Debug, Clone)]
pub struct CalculationEngine {
    /// How sibling condition groups combine. AND is the platform default:
    /// an indicator passes only if every group passes.
    pub group_aggregation: GroupOperator,
}

impl CalculationEngine {
    pub fn new() -> Self {
        Self {
            group_aggregation: GroupOperator::And,
        }
    }

    /// Evaluate a parsed schema. `None` (no calculation logic) is Fail.
    pub fn evaluate(
        &self,
        schema: Option<&CalculationSchema>,
        data: &ResponseData,
    ) -> ValidationStatus {
        let schema = match schema {
            Some(s) => s,
            None => return ValidationStatus::Fail,
        };
        ValidationStatus::from_outcome(self.evaluate_groups(schema, data))
    }

    /// Evaluate a stored JSON document leniently: an unparseable schema is
    /// logged and evaluates to Fail rather than aborting the caller's batch.
    pub fn evaluate_json(&self, schema: Option<&Value>, data: &ResponseData) -> ValidationStatus {
        let raw = match schema {
            Some(v) => v,
            None => return ValidationStatus::Fail,
        };
        match serde_json::from_value::<CalculationSchema>(raw.clone()) {
            Ok(schema) => self.evaluate(Some(&schema), data),
            Err(e) => {
                warn!(error = %e, "malformed calculation schema, evaluating to Fail");
                ValidationStatus::Fail
            }
        }
    }

    /// Evaluate and resolve the display label plus the remark for the
    /// resulting verdict in one call.
    pub fn execute(
        &self,
        schema: Option<&CalculationSchema>,
        remarks: Option<&RemarkSchema>,
        data: &ResponseData,
    ) -> CalculationOutcome {
        let status = self.evaluate(schema, data);
        let label = match (schema, status) {
            (Some(s), ValidationStatus::Pass) => s.output_status_on_pass.clone(),
            (Some(s), _) => s.output_status_on_fail.clone(),
            (None, _) => status.to_string(),
        };
        let remark = remarks
            .and_then(|r| r.remark_for(status))
            .or_else(|| crate::remark::default_remark(status))
            .map(|s| s.to_string());
        CalculationOutcome {
            status,
            label,
            remark,
        }
    }

    fn evaluate_groups(&self, schema: &CalculationSchema, data: &ResponseData) -> bool {
        if schema.condition_groups.is_empty() {
            warn!("calculation schema has no condition groups, evaluating to Fail");
            return false;
        }
        let result = match &self.group_aggregation {
            GroupOperator::Or => schema.condition_groups.iter().any(|g| g.evaluate(data)),
            GroupOperator::And => schema.condition_groups.iter().all(|g| g.evaluate(data)),
            GroupOperator::Other(op) => {
                warn!(operator = %op, "unknown group aggregation, falling back to AND");
                schema.condition_groups.iter().all(|g| g.evaluate(data))
            }
        };
        debug!(
            groups = schema.condition_groups.len(),
            result, "condition groups evaluated"
        );
        result
    }
}

impl Default for CalculationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> CalculationEngine {
        CalculationEngine::new()
    }

    fn multi_group_schema() -> CalculationSchema {
        serde_json::from_value(json!({
            "condition_groups": [
                {
                    "operator": "AND",
                    "rules": [
                        { "rule_type": "PERCENTAGE_THRESHOLD", "field": "hours", "operator": ">=", "threshold": 40 },
                        { "rule_type": "PERCENTAGE_THRESHOLD", "field": "attendance", "operator": ">=", "threshold": 80 }
                    ]
                },
                {
                    "operator": "AND",
                    "rules": [
                        { "rule_type": "MATCH_VALUE", "field": "cert", "expected_value": "Certified" }
                    ]
                }
            ],
            "output_status_on_pass": "Compliant",
            "output_status_on_fail": "Non-Compliant"
        }))
        .unwrap()
    }

    #[test]
    fn test_null_schema_always_fails() {
        let data: ResponseData = [("anything".to_string(), json!(100))].into_iter().collect();
        assert_eq!(engine().evaluate(None, &data), ValidationStatus::Fail);
        assert_eq!(
            engine().evaluate(None, &ResponseData::new()),
            ValidationStatus::Fail
        );
    }

    #[test]
    fn test_empty_response_fails_any_field_schema() {
        let schema = multi_group_schema();
        assert_eq!(
            engine().evaluate(Some(&schema), &ResponseData::new()),
            ValidationStatus::Fail
        );
    }

    #[test]
    fn test_multi_group_implicit_and() {
        let schema = multi_group_schema();
        let mut data = ResponseData::new();
        data.insert("hours".into(), json!(45));
        data.insert("attendance".into(), json!(85));
        data.insert("cert".into(), json!("Certified"));
        assert_eq!(
            engine().evaluate(Some(&schema), &data),
            ValidationStatus::Pass
        );

        // One failing group fails the whole schema.
        data.insert("cert".into(), json!("Pending"));
        assert_eq!(
            engine().evaluate(Some(&schema), &data),
            ValidationStatus::Fail
        );
    }

    #[test]
    fn test_empty_condition_groups_fail() {
        let schema: CalculationSchema =
            serde_json::from_value(json!({ "condition_groups": [] })).unwrap();
        let mut data = ResponseData::new();
        data.insert("x".into(), json!(1));
        assert_eq!(
            engine().evaluate(Some(&schema), &data),
            ValidationStatus::Fail
        );
    }

    #[test]
    fn test_evaluate_json_malformed_is_fail() {
        let raw = json!({ "condition_groups": "not-a-list" });
        assert_eq!(
            engine().evaluate_json(Some(&raw), &ResponseData::new()),
            ValidationStatus::Fail
        );
        assert_eq!(
            engine().evaluate_json(None, &ResponseData::new()),
            ValidationStatus::Fail
        );
    }

    #[test]
    fn test_evaluate_json_well_formed() {
        let raw = json!({
            "condition_groups": [
                {
                    "operator": "AND",
                    "rules": [
                        { "rule_type": "PERCENTAGE_THRESHOLD", "field": "rate", "operator": ">=", "threshold": 75.0 }
                    ]
                }
            ]
        });
        let mut data = ResponseData::new();
        data.insert("rate".into(), json!(85));
        assert_eq!(
            engine().evaluate_json(Some(&raw), &data),
            ValidationStatus::Pass
        );
    }

    #[test]
    fn test_execute_carries_label_and_remark() {
        let schema = multi_group_schema();
        let remarks: RemarkSchema = serde_json::from_value(json!({
            "PASS": "All requirements met",
            "FAIL": "Certification missing"
        }))
        .unwrap();

        let mut data = ResponseData::new();
        data.insert("hours".into(), json!(45));
        data.insert("attendance".into(), json!(85));
        data.insert("cert".into(), json!("Certified"));

        let outcome = engine().execute(Some(&schema), Some(&remarks), &data);
        assert_eq!(outcome.status, ValidationStatus::Pass);
        assert_eq!(outcome.label, "Compliant");
        assert_eq!(outcome.remark.as_deref(), Some("All requirements met"));

        data.insert("cert".into(), json!("Pending"));
        let outcome = engine().execute(Some(&schema), Some(&remarks), &data);
        assert_eq!(outcome.status, ValidationStatus::Fail);
        assert_eq!(outcome.label, "Non-Compliant");
        assert_eq!(outcome.remark.as_deref(), Some("Certification missing"));
    }

    #[test]
    fn test_or_aggregation_is_one_switch_away() {
        let mut or_engine = CalculationEngine::new();
        or_engine.group_aggregation = GroupOperator::Or;

        let schema = multi_group_schema();
        let mut data = ResponseData::new();
        data.insert("hours".into(), json!(45));
        data.insert("attendance".into(), json!(85));
        data.insert("cert".into(), json!("Pending"));

        // First group passes, second fails: OR-of-groups passes.
        assert_eq!(
            or_engine.evaluate(Some(&schema), &data),
            ValidationStatus::Pass
        );
    }
}
