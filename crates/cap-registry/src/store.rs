//! Storage interfaces and the in-memory store
//!
//! The evaluators consume persistence only through these traits; the HTTP
//! and ORM layers live elsewhere. `MemoryStore` backs tests and embedded
//! use with `Mutex`-guarded maps, and is where the two concurrency
//! disciplines are enforced: the compare-and-set workflow transition and the
//! (indicator_id, version) uniqueness backstop on history writes.

use crate::indicator::{Indicator, IndicatorUpdate};
use crate::snapshot::IndicatorSnapshot;
use crate::version::archive_if_schema_changed;
use cap_bbi::{Bbi, BbiResult};
use cap_core::{AssessmentStatus, CapError, MovFile, ResponseData, ValidationStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// One assessment instance moving through the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub status: AssessmentStatus,
}

impl Assessment {
    pub fn draft(id: i64) -> Self {
        Self {
            id,
            status: AssessmentStatus::Draft,
        }
    }
}

/// A field unit's answers for one indicator within one assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub assessment_id: i64,
    pub indicator_id: i64,
    pub response_data: ResponseData,
    /// Verdict attached once the calculation engine (or an assessor
    /// override) has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_status: Option<ValidationStatus>,
}

pub trait IndicatorStore {
    fn indicator(&self, id: i64) -> Result<Option<Indicator>, CapError>;
    fn active_indicators(&self) -> Result<Vec<Indicator>, CapError>;
    fn save_indicator(&self, indicator: Indicator) -> Result<(), CapError>;
}

pub trait HistoryStore {
    /// Insert an immutable snapshot. A duplicate (indicator_id, version)
    /// pair is a retryable conflict, never an overwrite.
    fn insert_snapshot(&self, snapshot: IndicatorSnapshot) -> Result<(), CapError>;
    /// Archived versions, newest first.
    fn history(&self, indicator_id: i64) -> Result<Vec<IndicatorSnapshot>, CapError>;
}

pub trait ResponseStore {
    fn responses(&self, assessment_id: i64) -> Result<Vec<AssessmentResponse>, CapError>;
    fn save_response(&self, response: AssessmentResponse) -> Result<(), CapError>;
}

pub trait MovStore {
    fn movs(&self, assessment_id: i64) -> Result<Vec<MovFile>, CapError>;
    fn add_mov(&self, mov: MovFile) -> Result<(), CapError>;
}

pub trait AssessmentStore {
    fn assessment(&self, id: i64) -> Result<Option<Assessment>, CapError>;
    fn save_assessment(&self, assessment: Assessment) -> Result<(), CapError>;
    /// Compare-and-set status transition: succeeds only if the current
    /// status is one of `expected` at write time. Of several concurrent
    /// attempts, at most one wins; the rest see a conflict.
    fn transition(
        &self,
        id: i64,
        expected: &[AssessmentStatus],
        next: AssessmentStatus,
    ) -> Result<AssessmentStatus, CapError>;
}

pub trait BbiStore {
    fn active_bbis(&self) -> Result<Vec<Bbi>, CapError>;
    fn save_bbi(&self, bbi: Bbi) -> Result<(), CapError>;
    /// Write one assessment's full result set all-or-nothing. A second
    /// finalize for the same assessment is a conflict.
    fn insert_results(&self, assessment_id: i64, results: Vec<BbiResult>) -> Result<(), CapError>;
    fn results(&self, assessment_id: i64) -> Result<Vec<BbiResult>, CapError>;
}

/// Update an indicator through the archive-before-overwrite discipline.
/// The snapshot is persisted before the updated indicator so a history
/// conflict leaves the current record untouched and the caller can retry.
pub fn update_indicator<S>(
    store: &S,
    indicator_id: i64,
    update: IndicatorUpdate,
    user_id: Option<i64>,
) -> Result<Indicator, CapError>
where
    S: IndicatorStore + HistoryStore,
{
    let mut indicator = store
        .indicator(indicator_id)?
        .ok_or_else(|| CapError::NotFound(format!("indicator {}", indicator_id)))?;

    let outcome = archive_if_schema_changed(&mut indicator, update, user_id);
    if let Some(snapshot) = outcome.snapshot {
        store.insert_snapshot(snapshot)?;
    }
    store.save_indicator(indicator.clone())?;
    Ok(indicator)
}

/// Soft delete: metadata-only, so neither version nor history moves.
pub fn deactivate_indicator<S>(store: &S, indicator_id: i64) -> Result<Indicator, CapError>
where
    S: IndicatorStore + HistoryStore,
{
    let update = IndicatorUpdate {
        is_active: Some(false),
        ..Default::default()
    };
    update_indicator(store, indicator_id, update, None)
}

#[derive(Default)]
struct MemoryInner {
    indicators: HashMap<i64, Indicator>,
    history: HashMap<(i64, u32), IndicatorSnapshot>,
    responses: HashMap<(i64, i64), AssessmentResponse>,
    movs: Vec<MovFile>,
    assessments: HashMap<i64, Assessment>,
    bbis: HashMap<i64, Bbi>,
    bbi_results: HashMap<i64, Vec<BbiResult>>,
}

/// In-memory implementation of every storage trait.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, CapError> {
        self.inner
            .lock()
            .map_err(|_| CapError::Storage("store lock poisoned".to_string()))
    }
}

impl IndicatorStore for MemoryStore {
    fn indicator(&self, id: i64) -> Result<Option<Indicator>, CapError> {
        Ok(self.locked()?.indicators.get(&id).cloned())
    }

    fn active_indicators(&self) -> Result<Vec<Indicator>, CapError> {
        let inner = self.locked()?;
        let mut active: Vec<Indicator> = inner
            .indicators
            .values()
            .filter(|i| i.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|i| i.id);
        Ok(active)
    }

    fn save_indicator(&self, indicator: Indicator) -> Result<(), CapError> {
        self.locked()?.indicators.insert(indicator.id, indicator);
        Ok(())
    }
}

impl HistoryStore for MemoryStore {
    fn insert_snapshot(&self, snapshot: IndicatorSnapshot) -> Result<(), CapError> {
        let mut inner = self.locked()?;
        let key = (snapshot.indicator_id, snapshot.version);
        if inner.history.contains_key(&key) {
            return Err(CapError::Conflict(format!(
                "snapshot for indicator {} version {} already archived",
                key.0, key.1
            )));
        }
        inner.history.insert(key, snapshot);
        Ok(())
    }

    fn history(&self, indicator_id: i64) -> Result<Vec<IndicatorSnapshot>, CapError> {
        let inner = self.locked()?;
        let mut snapshots: Vec<IndicatorSnapshot> = inner
            .history
            .values()
            .filter(|s| s.indicator_id == indicator_id)
            .cloned()
            .collect();
        snapshots.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(snapshots)
    }
}

impl ResponseStore for MemoryStore {
    fn responses(&self, assessment_id: i64) -> Result<Vec<AssessmentResponse>, CapError> {
        let inner = self.locked()?;
        let mut responses: Vec<AssessmentResponse> = inner
            .responses
            .values()
            .filter(|r| r.assessment_id == assessment_id)
            .cloned()
            .collect();
        responses.sort_by_key(|r| r.indicator_id);
        Ok(responses)
    }

    fn save_response(&self, response: AssessmentResponse) -> Result<(), CapError> {
        let key = (response.assessment_id, response.indicator_id);
        self.locked()?.responses.insert(key, response);
        Ok(())
    }
}

impl MovStore for MemoryStore {
    fn movs(&self, assessment_id: i64) -> Result<Vec<MovFile>, CapError> {
        Ok(self
            .locked()?
            .movs
            .iter()
            .filter(|m| m.assessment_id == assessment_id)
            .cloned()
            .collect())
    }

    fn add_mov(&self, mov: MovFile) -> Result<(), CapError> {
        self.locked()?.movs.push(mov);
        Ok(())
    }
}

impl AssessmentStore for MemoryStore {
    fn assessment(&self, id: i64) -> Result<Option<Assessment>, CapError> {
        Ok(self.locked()?.assessments.get(&id).cloned())
    }

    fn save_assessment(&self, assessment: Assessment) -> Result<(), CapError> {
        self.locked()?.assessments.insert(assessment.id, assessment);
        Ok(())
    }

    fn transition(
        &self,
        id: i64,
        expected: &[AssessmentStatus],
        next: AssessmentStatus,
    ) -> Result<AssessmentStatus, CapError> {
        let mut inner = self.locked()?;
        let assessment = inner
            .assessments
            .get_mut(&id)
            .ok_or_else(|| CapError::NotFound(format!("assessment {}", id)))?;

        if !expected.contains(&assessment.status) {
            return Err(CapError::Conflict(format!(
                "assessment {} is '{}', cannot transition to '{}'",
                id, assessment.status, next
            )));
        }
        assessment.status = next;
        info!(assessment_id = id, status = %next, "assessment transitioned");
        Ok(next)
    }
}

impl BbiStore for MemoryStore {
    fn active_bbis(&self) -> Result<Vec<Bbi>, CapError> {
        let inner = self.locked()?;
        let mut bbis: Vec<Bbi> = inner.bbis.values().filter(|b| b.is_active).cloned().collect();
        bbis.sort_by_key(|b| b.id);
        Ok(bbis)
    }

    fn save_bbi(&self, bbi: Bbi) -> Result<(), CapError> {
        self.locked()?.bbis.insert(bbi.id, bbi);
        Ok(())
    }

    fn insert_results(&self, assessment_id: i64, results: Vec<BbiResult>) -> Result<(), CapError> {
        let mut inner = self.locked()?;
        if inner.bbi_results.contains_key(&assessment_id) {
            return Err(CapError::Conflict(format!(
                "BBI results for assessment {} already finalized",
                assessment_id
            )));
        }
        inner.bbi_results.insert(assessment_id, results);
        Ok(())
    }

    fn results(&self, assessment_id: i64) -> Result<Vec<BbiResult>, CapError> {
        Ok(self
            .locked()?
            .bbi_results
            .get(&assessment_id)
            .cloned()
            .unwrap_or_default())
    }
}
