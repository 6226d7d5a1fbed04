//! Unified Error Model
//!
//! Data absence (missing field, missing evidence, empty response) is never an
//! error anywhere in the engine; it resolves to the conservative branch of
//! whichever evaluator met it. `CapError` is reserved for structural
//! rejection, state/version conflicts, and storage failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapError {
    /// Structural authoring error, rejected before save.
    #[error("SCHEMA/{0}")]
    Schema(String),

    /// Retryable state or version conflict (concurrent writer won).
    #[error("CONFLICT/{0}")]
    Conflict(String),

    /// Referenced entity does not exist.
    #[error("NOTFOUND/{0}")]
    NotFound(String),

    /// Unexpected persistence failure.
    #[error("STORAGE/{0}")]
    Storage(String),

    /// Submission validation could not run to completion.
    #[error("VALIDATE/{0}")]
    Validation(String),
}

impl CapError {
    /// Conflicts are safe to retry; everything else needs intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CapError::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            CapError::Schema("duplicate field_id".into()).to_string(),
            "SCHEMA/duplicate field_id"
        );
        assert_eq!(
            CapError::Conflict("version 3 already archived".into()).to_string(),
            "CONFLICT/version 3 already archived"
        );
    }

    #[test]
    fn test_only_conflicts_retryable() {
        assert!(CapError::Conflict("x".into()).is_retryable());
        assert!(!CapError::Schema("x".into()).is_retryable());
        assert!(!CapError::Storage("x".into()).is_retryable());
    }
}
