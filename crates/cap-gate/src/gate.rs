//! Submission validation and the submit transition
//!
//! Before an assessment may leave Draft (or Needs Rework), every active
//! indicator must have a structurally complete response and every indicator
//! demanding evidence must have at least one live upload. The two lists are
//! populated independently; an indicator can appear in both.

use cap_core::{AssessmentStatus, CapError};
use cap_forms::validate_completeness;
use cap_registry::{AssessmentStore, IndicatorStore, MovStore, ResponseStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Readiness report for one assessment. Computed on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionValidationResult {
    pub is_valid: bool,
    /// Names of indicators with a missing or incomplete response.
    pub incomplete_indicators: Vec<String>,
    /// Names of indicators missing required evidence uploads.
    pub missing_movs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Error, Debug)]
pub enum GateError {
    /// The assessment is not ready; the report carries the specifics.
    #[error("SUBMIT/{}", .0.error_message.as_deref().unwrap_or("assessment is not ready"))]
    Incomplete(SubmissionValidationResult),

    #[error(transparent)]
    Core(#[from] CapError),
}

/// Stateless gatekeeper for the submit workflow.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate;

impl SubmissionGate {
    pub fn new() -> Self {
        Self
    }

    /// Validate that an assessment is complete and ready for submission.
    /// Storage failures surface as errors; validation never fails open.
    pub fn validate_submission<S>(
        &self,
        store: &S,
        assessment_id: i64,
    ) -> Result<SubmissionValidationResult, CapError>
    where
        S: IndicatorStore + ResponseStore + MovStore,
    {
        let indicators = store.active_indicators()?;
        let responses = store.responses(assessment_id)?;
        let movs = store.movs(assessment_id)?;

        let response_map: std::collections::HashMap<i64, _> = responses
            .into_iter()
            .map(|r| (r.indicator_id, r))
            .collect();

        let mut incomplete_indicators = Vec::new();
        let mut missing_movs = Vec::new();

        for indicator in &indicators {
            let schema = match indicator.parsed_form_schema() {
                Some(Ok(schema)) => Some(schema),
                Some(Err(_)) => {
                    // Unreadable schema: the response cannot be judged
                    // complete, and evidence needs cannot be known.
                    warn!(
                        indicator_id = indicator.id,
                        "treating indicator with malformed form schema as incomplete"
                    );
                    incomplete_indicators.push(indicator.name.clone());
                    continue;
                }
                None => None,
            };

            match response_map.get(&indicator.id) {
                None => incomplete_indicators.push(indicator.name.clone()),
                Some(response) => {
                    if let Some(schema) = &schema {
                        let result = validate_completeness(
                            schema,
                            Some(&response.response_data),
                            &movs,
                            indicator.id,
                        );
                        if !result.is_complete {
                            debug!(
                                indicator_id = indicator.id,
                                missing = ?result.missing_fields,
                                "indicator incomplete"
                            );
                            incomplete_indicators.push(indicator.name.clone());
                        }
                    }
                }
            }

            if let Some(schema) = &schema {
                if schema.has_file_upload_fields()
                    && !movs
                        .iter()
                        .any(|m| m.is_active() && m.indicator_id == indicator.id)
                {
                    missing_movs.push(indicator.name.clone());
                }
            }
        }

        let is_valid = incomplete_indicators.is_empty() && missing_movs.is_empty();
        let error_message = if is_valid {
            None
        } else {
            let mut parts = Vec::new();
            if !incomplete_indicators.is_empty() {
                parts.push(format!(
                    "{} indicator(s) are incomplete",
                    incomplete_indicators.len()
                ));
            }
            if !missing_movs.is_empty() {
                parts.push(format!(
                    "{} indicator(s) are missing required file uploads",
                    missing_movs.len()
                ));
            }
            Some(parts.join(". "))
        };

        Ok(SubmissionValidationResult {
            is_valid,
            incomplete_indicators,
            missing_movs,
            error_message,
        })
    }

    /// Validate and, if ready, transition the assessment to Submitted for
    /// Review. The transition is compare-and-set: of concurrent submit
    /// attempts, at most one succeeds and the rest observe a conflict.
    pub fn submit<S>(&self, store: &S, assessment_id: i64) -> Result<AssessmentStatus, GateError>
    where
        S: IndicatorStore + ResponseStore + MovStore + AssessmentStore,
    {
        store
            .assessment(assessment_id)?
            .ok_or_else(|| CapError::NotFound(format!("assessment {}", assessment_id)))?;

        let result = self.validate_submission(store, assessment_id)?;
        if !result.is_valid {
            return Err(GateError::Incomplete(result));
        }

        let status = store.transition(
            assessment_id,
            &[AssessmentStatus::Draft, AssessmentStatus::NeedsRework],
            AssessmentStatus::SubmittedForReview,
        )?;
        Ok(status)
    }
}
