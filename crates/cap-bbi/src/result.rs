//! BBI entities and resilient batch calculation
//!
//! Status calculation for one BBI is lenient: absent or malformed mapping
//! rules degrade to Non-Functional with a warning. The batch over all active
//! BBIs is isolated per item so one bad rule set cannot block the finalize
//! workflow for the rest.

use crate::mapping::{evaluate_mapping, IndicatorStatuses, MappingRules};
use cap_core::{BbiStatus, CAP_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

/// An institution whose functionality is derived from indicator verdicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bbi {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Authored mapping rules, stored as JSON. Parsed leniently at
    /// calculation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_rules: Option<Value>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Functionality verdict for one (bbi, assessment) pair. Created once at
/// finalization, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BbiResult {
    pub bbi_id: i64,
    pub assessment_id: i64,
    pub status: BbiStatus,
    pub calculation_details: Value,
}

/// Calculate one BBI's status from the verdict snapshot. Never panics or
/// errors: a BBI without usable rules is Non-Functional.
pub fn calculate_status(bbi: &Bbi, statuses: &IndicatorStatuses) -> BbiStatus {
    let raw = match &bbi.mapping_rules {
        Some(v) => v,
        None => {
            warn!(bbi_id = bbi.id, "BBI has no mapping_rules, defaulting to Non-Functional");
            return BbiStatus::NonFunctional;
        }
    };

    match serde_json::from_value::<MappingRules>(raw.clone()) {
        Ok(rules) => BbiStatus::from_outcome(evaluate_mapping(&rules, statuses)),
        Err(e) => {
            warn!(bbi_id = bbi.id, error = %e, "malformed mapping_rules, defaulting to Non-Functional");
            BbiStatus::NonFunctional
        }
    }
}

/// Calculate statuses for every active BBI against one assessment's verdict
/// snapshot. The returned batch is complete: failures are isolated per BBI
/// and recorded as Non-Functional results.
pub fn calculate_all(
    bbis: &[Bbi],
    statuses: &IndicatorStatuses,
    assessment_id: i64,
) -> Vec<BbiResult> {
    let calculated_at = Utc::now();
    let mut results = Vec::new();

    for bbi in bbis.iter().filter(|b| b.is_active) {
        let status = calculate_status(bbi, statuses);
        info!(bbi_id = bbi.id, assessment_id, %status, "calculated BBI status");
        results.push(BbiResult {
            bbi_id: bbi.id,
            assessment_id,
            status,
            calculation_details: json!({
                "mapping_rules": bbi.mapping_rules,
                "calculated_at": calculated_at,
                "engine": CAP_VERSION,
            }),
        });
    }

    results
}
