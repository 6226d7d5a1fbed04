//! Canonical status enums
//!
//! Wire strings match the display labels stored by the platform
//! ("Pass"/"Fail", "Functional"/"Non-Functional", ...). Evaluators branch on
//! the enums, never on cosmetic labels carried in schemas.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine verdict for one indicator response.
///
/// The engine only ever produces `Pass` or `Fail`. `Conditional` is applied
/// by an assessor override outside the engine and round-trips untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationStatus {
    Pass,
    Fail,
    Conditional,
}

impl ValidationStatus {
    /// Map an evaluation outcome to the canonical verdict.
    pub fn from_outcome(passed: bool) -> Self {
        if passed {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationStatus::Pass)
    }

    /// Keyword used for remark-schema lookup ("PASS"/"FAIL"/"CONDITIONAL").
    pub fn keyword(&self) -> &'static str {
        match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Fail => "FAIL",
            ValidationStatus::Conditional => "CONDITIONAL",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "Pass"),
            ValidationStatus::Fail => write!(f, "Fail"),
            ValidationStatus::Conditional => write!(f, "Conditional"),
        }
    }
}

/// Assessment workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentStatus {
    Draft,
    #[serde(rename = "Submitted for Review")]
    SubmittedForReview,
    Validated,
    #[serde(rename = "Needs Rework")]
    NeedsRework,
}

impl AssessmentStatus {
    /// States from which a field unit may submit.
    pub fn can_submit(&self) -> bool {
        matches!(self, AssessmentStatus::Draft | AssessmentStatus::NeedsRework)
    }

    /// States in which responses are read-only for the field unit.
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            AssessmentStatus::SubmittedForReview | AssessmentStatus::Validated
        )
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssessmentStatus::Draft => write!(f, "Draft"),
            AssessmentStatus::SubmittedForReview => write!(f, "Submitted for Review"),
            AssessmentStatus::Validated => write!(f, "Validated"),
            AssessmentStatus::NeedsRework => write!(f, "Needs Rework"),
        }
    }
}

/// Institutional functionality verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BbiStatus {
    Functional,
    #[serde(rename = "Non-Functional")]
    NonFunctional,
}

impl BbiStatus {
    pub fn from_outcome(functional: bool) -> Self {
        if functional {
            BbiStatus::Functional
        } else {
            BbiStatus::NonFunctional
        }
    }
}

impl fmt::Display for BbiStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BbiStatus::Functional => write!(f, "Functional"),
            BbiStatus::NonFunctional => write!(f, "Non-Functional"),
        }
    }
}

/// Lifecycle of an uploaded evidence (MOV) file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovStatus {
    Pending,
    Uploaded,
    Deleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_status_from_outcome() {
        assert_eq!(ValidationStatus::from_outcome(true), ValidationStatus::Pass);
        assert_eq!(ValidationStatus::from_outcome(false), ValidationStatus::Fail);
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(
            serde_json::to_string(&ValidationStatus::Pass).unwrap(),
            "\"Pass\""
        );
        assert_eq!(
            serde_json::to_string(&BbiStatus::NonFunctional).unwrap(),
            "\"Non-Functional\""
        );
        assert_eq!(
            serde_json::to_string(&AssessmentStatus::SubmittedForReview).unwrap(),
            "\"Submitted for Review\""
        );
        let parsed: AssessmentStatus = serde_json::from_str("\"Needs Rework\"").unwrap();
        assert_eq!(parsed, AssessmentStatus::NeedsRework);
    }

    #[test]
    fn test_submit_states() {
        assert!(AssessmentStatus::Draft.can_submit());
        assert!(AssessmentStatus::NeedsRework.can_submit());
        assert!(!AssessmentStatus::SubmittedForReview.can_submit());
        assert!(AssessmentStatus::Validated.is_locked());
    }

    #[test]
    fn test_remark_keywords() {
        assert_eq!(ValidationStatus::Pass.keyword(), "PASS");
        assert_eq!(ValidationStatus::Conditional.keyword(), "CONDITIONAL");
    }
}
