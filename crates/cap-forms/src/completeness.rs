//! Completeness validation
//!
//! Structural readiness of one response: are all required fields present,
//! typed correctly, and backed by evidence where the field demands it. This
//! never reveals whether the response would pass compliance; that belongs to
//! the calculation engine.

use crate::field::{FieldType, FormField};
use crate::schema::FormSchema;
use cap_core::{MovFile, ResponseData};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a completeness check for one indicator response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessResult {
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
}

impl CompletenessResult {
    fn from_missing(missing_fields: Vec<String>) -> Self {
        Self {
            is_complete: missing_fields.is_empty(),
            missing_fields,
        }
    }
}

/// Check a response against its form schema and the evidence already
/// attached. A null response means every required field is missing.
pub fn validate_completeness(
    schema: &FormSchema,
    response: Option<&ResponseData>,
    movs: &[MovFile],
    indicator_id: i64,
) -> CompletenessResult {
    let mut missing = Vec::new();

    for field in &schema.fields {
        if !field.required {
            continue;
        }
        let satisfied = match field.field_type {
            FieldType::FileUpload => has_evidence(field, movs, indicator_id),
            _ => response
                .and_then(|data| data.get(&field.field_id))
                .map(|value| value_conforms(field, value))
                .unwrap_or(false),
        };
        if !satisfied {
            missing.push(field.field_id.clone());
        }
    }

    CompletenessResult::from_missing(missing)
}

/// Evidence presence is judged from MOV records, not from response content.
fn has_evidence(field: &FormField, movs: &[MovFile], indicator_id: i64) -> bool {
    movs.iter()
        .any(|m| m.is_active() && m.covers(indicator_id, &field.field_id))
}

fn value_conforms(field: &FormField, value: &Value) -> bool {
    match field.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Date => value
            .as_str()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false),
        FieldType::Number => value.is_number(),
        FieldType::Select | FieldType::Radio => value
            .as_str()
            .map(|s| field.options.iter().any(|o| o == s))
            .unwrap_or(false),
        FieldType::Checkbox => value
            .as_array()
            .map(|items| {
                !items.is_empty()
                    && items.iter().all(|item| {
                        item.as_str()
                            .map(|s| field.options.iter().any(|o| o == s))
                            .unwrap_or(false)
                    })
            })
            .unwrap_or(false),
        // Handled by has_evidence.
        FieldType::FileUpload => false,
    }
}
