//! Evidence (MOV) records
//!
//! A Means of Verification is an uploaded artifact proving a claimed answer.
//! The engine never touches file bytes; it only needs the record's scope and
//! lifecycle state to judge evidence presence.

use crate::status::MovStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded evidence file attached to an assessment response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovFile {
    pub id: Uuid,
    pub assessment_id: i64,
    pub indicator_id: i64,
    /// Field-level scope. `None` means the upload covers the indicator as a
    /// whole rather than one specific file_upload field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    pub status: MovStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl MovFile {
    pub fn new(assessment_id: i64, indicator_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            assessment_id,
            indicator_id,
            field_id: None,
            status: MovStatus::Uploaded,
            deleted_at: None,
        }
    }

    /// Scope the upload to one file_upload field.
    pub fn for_field(mut self, field_id: impl Into<String>) -> Self {
        self.field_id = Some(field_id.into());
        self
    }

    /// Counts toward evidence presence: uploaded and not soft-deleted.
    pub fn is_active(&self) -> bool {
        self.status == MovStatus::Uploaded && self.deleted_at.is_none()
    }

    /// Whether this record satisfies evidence for `field_id` on `indicator_id`.
    /// Indicator-scoped uploads satisfy every file_upload field of the
    /// indicator; field-scoped uploads satisfy only their own field.
    pub fn covers(&self, indicator_id: i64, field_id: &str) -> bool {
        self.indicator_id == indicator_id
            && self
                .field_id
                .as_deref()
                .map(|f| f == field_id)
                .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_lifecycle() {
        let mov = MovFile::new(1, 10);
        assert!(mov.is_active());

        let mut deleted = MovFile::new(1, 10);
        deleted.status = MovStatus::Deleted;
        deleted.deleted_at = Some(Utc::now());
        assert!(!deleted.is_active());
    }

    #[test]
    fn test_indicator_scoped_covers_any_field() {
        let mov = MovFile::new(1, 10);
        assert!(mov.covers(10, "budget_doc"));
        assert!(mov.covers(10, "minutes_doc"));
        assert!(!mov.covers(11, "budget_doc"));
    }

    #[test]
    fn test_field_scoped_covers_only_its_field() {
        let mov = MovFile::new(1, 10).for_field("budget_doc");
        assert!(mov.covers(10, "budget_doc"));
        assert!(!mov.covers(10, "minutes_doc"));
    }
}
