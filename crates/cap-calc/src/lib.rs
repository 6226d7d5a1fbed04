//! CAP Calc: rule DSL and calculation engine
//!
//! Turns an indicator's declarative calculation schema plus submitted
//! response data into a canonical Pass/Fail verdict.
//!
//! ```text
//! CalculationSchema ─┐
//!                    ├─ CalculationEngine ─ ValidationStatus (+ label, remark)
//! ResponseData ──────┘
//! ```
//!
//! Every evaluator is a pure function of its inputs and fails closed:
//! missing or malformed data resolves to `false`, never to an error.
//!
//! # Example
//!
//! ```
//! use cap_calc::{CalculationEngine, CalculationSchema};
//! use cap_core::{ResponseData, ValidationStatus};
//! use serde_json::json;
//!
//! let schema: CalculationSchema = serde_json::from_value(json!({
//!     "condition_groups": [{
//!         "operator": "AND",
//!         "rules": [{
//!             "rule_type": "PERCENTAGE_THRESHOLD",
//!             "field": "completion_rate",
//!             "operator": ">=",
//!             "threshold": 75.0
//!         }]
//!     }],
//!     "output_status_on_pass": "Pass",
//!     "output_status_on_fail": "Fail"
//! })).unwrap();
//!
//! let engine = CalculationEngine::new();
//! let data: ResponseData = [("completion_rate".to_string(), json!(85))].into_iter().collect();
//! assert_eq!(engine.evaluate(Some(&schema), &data), ValidationStatus::Pass);
//! ```

pub mod engine;
pub mod remark;
pub mod rule;
pub mod schema;

pub use engine::{CalculationEngine, CalculationOutcome};
pub use remark::{default_remark, RemarkSchema};
pub use rule::{ComparisonOp, Condition, Rule};
pub use schema::{CalculationSchema, ConditionGroup, GroupOperator};

use cap_core::{ResponseData, ValidationStatus};

/// One-shot evaluation with the default engine configuration.
pub fn execute_calculation(
    schema: Option<&CalculationSchema>,
    data: &ResponseData,
) -> ValidationStatus {
    CalculationEngine::new().evaluate(schema, data)
}
