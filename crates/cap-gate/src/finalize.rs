//! Assessment finalization
//!
//! Moves a reviewed assessment to Validated and derives every active BBI's
//! functionality verdict from the assessment's per-indicator statuses. The
//! transition is compare-and-set, so only one finalizer computes and writes
//! the result set; the write itself is all-or-nothing.

use cap_bbi::{calculate_all, BbiResult, IndicatorStatuses};
use cap_core::{AssessmentStatus, CapError};
use cap_registry::{AssessmentStore, BbiStore, ResponseStore};
use tracing::info;

/// Finalize one assessment: Validated transition plus BBI result batch.
pub fn finalize_assessment<S>(store: &S, assessment_id: i64) -> Result<Vec<BbiResult>, CapError>
where
    S: AssessmentStore + ResponseStore + BbiStore,
{
    store.transition(
        assessment_id,
        &[AssessmentStatus::SubmittedForReview],
        AssessmentStatus::Validated,
    )?;

    let statuses: IndicatorStatuses = store
        .responses(assessment_id)?
        .into_iter()
        .filter_map(|r| {
            r.validation_status
                .map(|status| (r.indicator_id, status.to_string()))
        })
        .collect();

    let bbis = store.active_bbis()?;
    let results = calculate_all(&bbis, &statuses, assessment_id);
    store.insert_results(assessment_id, results.clone())?;

    info!(
        assessment_id,
        bbi_count = results.len(),
        "assessment finalized with BBI results"
    );
    Ok(results)
}
