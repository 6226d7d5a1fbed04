//! Indicator model
//!
//! Schema fields are stored as raw JSON documents, the same shape they cross
//! the persistence boundary in. Typed access parses on demand so a malformed
//! stored document degrades at the call site instead of poisoning the whole
//! record.

use cap_forms::FormSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A single auditable compliance item with a form, an automated evaluation
/// rule, and a version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Monotonic schema version, starts at 1. Bumped only by schema changes.
    pub version: u32,
    /// Parent indicator for hierarchical structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
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
}

impl Indicator {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            version: 1,
            parent_id: None,
            is_active: true,
            is_auto_calculable: false,
            is_profiling_only: false,
            form_schema: None,
            calculation_schema: None,
            remark_schema: None,
            technical_notes: None,
        }
    }

    pub fn with_form_schema(mut self, schema: Value) -> Self {
        self.form_schema = Some(schema);
        self
    }

    pub fn with_calculation_schema(mut self, schema: Value) -> Self {
        self.calculation_schema = Some(schema);
        self.is_auto_calculable = true;
        self
    }

    pub fn with_remark_schema(mut self, schema: Value) -> Self {
        self.remark_schema = Some(schema);
        self
    }

    /// Typed view of the stored form schema. A malformed document is logged
    /// and treated as absent-with-error by the caller.
    pub fn parsed_form_schema(&self) -> Option<Result<FormSchema, serde_json::Error>> {
        self.form_schema.as_ref().map(|raw| {
            serde_json::from_value::<FormSchema>(raw.clone()).map_err(|e| {
                warn!(indicator_id = self.id, error = %e, "malformed stored form schema");
                e
            })
        })
    }
}

/// Partial update request. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_auto_calculable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_profiling_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_notes: Option<String>,
}

impl IndicatorUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn describe(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn replace_form_schema(schema: Value) -> Self {
        Self {
            form_schema: Some(schema),
            ..Default::default()
        }
    }

    pub fn replace_calculation_schema(schema: Value) -> Self {
        Self {
            calculation_schema: Some(schema),
            ..Default::default()
        }
    }

    /// Whether the request touches any of the versioned schema fields.
    pub fn touches_schema(&self) -> bool {
        self.form_schema.is_some()
            || self.calculation_schema.is_some()
            || self.remark_schema.is_some()
    }
}
