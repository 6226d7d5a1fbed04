//! Form field model

use serde::{Deserialize, Serialize};

/// Input widget kind for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
    FileUpload,
}

impl FieldType {
    /// Field kinds whose value must be a member of the declared options.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }
}

/// Conditional evidence requirement: this field's evidence obligation is
/// tied to another field's answer. Only the reference participates in
/// structural validation; the referenced field must exist and the reference
/// graph must stay acyclic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalMovRequirement {
    pub field_id: String,
}

/// One field of an indicator's form schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub field_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", alias = "field_type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Option ids for select/radio/checkbox fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_mov_requirement: Option<ConditionalMovRequirement>,
}

impl FormField {
    pub fn new(field_id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_id: field_id.into(),
            label: String::new(),
            field_type,
            required: false,
            options: Vec::new(),
            conditional_mov_requirement: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_conditional_mov(mut self, field_id: impl Into<String>) -> Self {
        self.conditional_mov_requirement = Some(ConditionalMovRequirement {
            field_id: field_id.into(),
        });
        self
    }
}
