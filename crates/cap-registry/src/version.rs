//! Version manager
//!
//! Archive-before-overwrite discipline: when an update touches any schema
//! field whose content actually changes, the pre-update state is snapshotted
//! under the current version number and the version is incremented by
//! exactly one. Metadata-only updates touch neither version nor history.
//!
//! Change detection compares blake3 fingerprints of the canonical JSON of
//! each schema field, so re-submitting an identical schema is a no-op.

use crate::indicator::{Indicator, IndicatorUpdate};
use crate::snapshot::IndicatorSnapshot;
use serde_json::Value;
use tracing::info;

/// Fingerprint one JSON document. Absent documents hash as JSON null.
fn value_fingerprint(value: Option<&Value>) -> blake3::Hash {
    let bytes = match value {
        Some(v) => serde_json::to_vec(v).unwrap_or_default(),
        None => b"null".to_vec(),
    };
    blake3::hash(&bytes)
}

/// Combined fingerprint of the three schema fields, hex-encoded.
pub fn schema_fingerprint(
    form: Option<&Value>,
    calculation: Option<&Value>,
    remark: Option<&Value>,
) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(value_fingerprint(form).as_bytes());
    hasher.update(value_fingerprint(calculation).as_bytes());
    hasher.update(value_fingerprint(remark).as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// What an update did to the indicator.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// True when a schema field changed and the version was incremented.
    pub version_bumped: bool,
    /// Snapshot of the pre-update state, present iff the version was bumped.
    /// The caller must persist it before (or atomically with) the updated
    /// indicator.
    pub snapshot: Option<IndicatorSnapshot>,
}

/// Apply an update in place, archiving first when a schema field changes.
pub fn archive_if_schema_changed(
    indicator: &mut Indicator,
    update: IndicatorUpdate,
    archived_by: Option<i64>,
) -> UpdateOutcome {
    let schema_changed = update.touches_schema() && schema_content_changes(indicator, &update);

    let snapshot = if schema_changed {
        Some(IndicatorSnapshot::capture(indicator, archived_by))
    } else {
        None
    };

    apply_fields(indicator, update);

    if schema_changed {
        indicator.version += 1;
        info!(
            indicator_id = indicator.id,
            version = indicator.version,
            "schema changed, archived previous version"
        );
    }

    UpdateOutcome {
        version_bumped: schema_changed,
        snapshot,
    }
}

fn schema_content_changes(indicator: &Indicator, update: &IndicatorUpdate) -> bool {
    let field_changed = |current: Option<&Value>, proposed: Option<&Value>| match proposed {
        Some(new) => value_fingerprint(current) != value_fingerprint(Some(new)),
        None => false,
    };

    field_changed(indicator.form_schema.as_ref(), update.form_schema.as_ref())
        || field_changed(
            indicator.calculation_schema.as_ref(),
            update.calculation_schema.as_ref(),
        )
        || field_changed(
            indicator.remark_schema.as_ref(),
            update.remark_schema.as_ref(),
        )
}

fn apply_fields(indicator: &mut Indicator, update: IndicatorUpdate) {
    if let Some(name) = update.name {
        indicator.name = name;
    }
    if let Some(description) = update.description {
        indicator.description = Some(description);
    }
    if let Some(parent_id) = update.parent_id {
        indicator.parent_id = Some(parent_id);
    }
    if let Some(is_active) = update.is_active {
        indicator.is_active = is_active;
    }
    if let Some(is_auto_calculable) = update.is_auto_calculable {
        indicator.is_auto_calculable = is_auto_calculable;
    }
    if let Some(is_profiling_only) = update.is_profiling_only {
        indicator.is_profiling_only = is_profiling_only;
    }
    if let Some(form_schema) = update.form_schema {
        indicator.form_schema = Some(form_schema);
    }
    if let Some(calculation_schema) = update.calculation_schema {
        indicator.calculation_schema = Some(calculation_schema);
    }
    if let Some(remark_schema) = update.remark_schema {
        indicator.remark_schema = Some(remark_schema);
    }
    if let Some(technical_notes) = update.technical_notes {
        indicator.technical_notes = Some(technical_notes);
    }
}
