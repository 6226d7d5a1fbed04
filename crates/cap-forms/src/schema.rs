//! Form schema container

use crate::field::{FieldType, FormField};
use serde::{Deserialize, Serialize};

/// Ordered list of form fields for one indicator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    /// Whether any field requires an uploaded evidence file.
    pub fn has_file_upload_fields(&self) -> bool {
        self.fields
            .iter()
            .any(|f| f.field_type == FieldType::FileUpload)
    }

    pub fn file_upload_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields
            .iter()
            .filter(|f| f.field_type == FieldType::FileUpload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let schema = FormSchema::new(vec![
            FormField::new("a", FieldType::Text),
            FormField::new("b", FieldType::Number),
        ]);
        assert!(schema.field("a").is_some());
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_file_upload_detection() {
        let plain = FormSchema::new(vec![FormField::new("a", FieldType::Text)]);
        assert!(!plain.has_file_upload_fields());

        let with_upload = FormSchema::new(vec![
            FormField::new("a", FieldType::Text),
            FormField::new("mov", FieldType::FileUpload),
        ]);
        assert!(with_upload.has_file_upload_fields());
        assert_eq!(with_upload.file_upload_fields().count(), 1);
    }
}
