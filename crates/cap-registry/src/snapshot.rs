//! Immutable version snapshots
//!
//! A snapshot is the indicator's schema content the instant before a schema
//! change, tagged with the version number it replaced. Created, never
//! mutated, retained indefinitely so historical verdicts stay reproducible
//! against the exact schema version that produced them.

use crate::indicator::Indicator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Archived copy of one indicator version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub indicator_id: i64,
    /// The version this snapshot preserves (the version being replaced).
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub is_auto_calculable: bool,
    #[serde(default)]
    pub is_profiling_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub archived_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_by: Option<i64>,
    /// blake3 fingerprint of the archived schema content.
    pub fingerprint: String,
}

impl IndicatorSnapshot {
    /// Capture the indicator's current state, tagged with its current
    /// version number.
    pub fn capture(indicator: &Indicator, archived_by: Option<i64>) -> Self {
        Self {
            indicator_id: indicator.id,
            version: indicator.version,
            name: indicator.name.clone(),
            description: indicator.description.clone(),
            is_active: indicator.is_active,
            is_auto_calculable: indicator.is_auto_calculable,
            is_profiling_only: indicator.is_profiling_only,
            form_schema: indicator.form_schema.clone(),
            calculation_schema: indicator.calculation_schema.clone(),
            remark_schema: indicator.remark_schema.clone(),
            technical_notes: indicator.technical_notes.clone(),
            parent_id: indicator.parent_id,
            archived_at: Utc::now(),
            archived_by,
            fingerprint: crate::version::schema_fingerprint(
                indicator.form_schema.as_ref(),
                indicator.calculation_schema.as_ref(),
                indicator.remark_schema.as_ref(),
            ),
        }
    }
}
