//! CAP Registry: indicator versioning and storage interfaces
//!
//! Owns the mutation discipline the evaluators rely on: any schema change
//! archives the replaced version first, so a stored verdict can always be
//! re-evaluated against the exact schema version that was live when the
//! response was answered.
//!
//! # Example
//!
//! ```
//! use cap_registry::{Indicator, IndicatorUpdate, MemoryStore};
//! use cap_registry::store::{update_indicator, HistoryStore, IndicatorStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.save_indicator(Indicator::new(1, "Budget posted").with_form_schema(json!({
//!     "fields": [{ "field_id": "posted", "type": "text", "required": true }]
//! }))).unwrap();
//!
//! let updated = update_indicator(&store, 1, IndicatorUpdate::replace_form_schema(json!({
//!     "fields": [{ "field_id": "posted", "type": "date", "required": true }]
//! })), None).unwrap();
//!
//! assert_eq!(updated.version, 2);
//! assert_eq!(store.history(1).unwrap().len(), 1);
//! ```

pub mod indicator;
pub mod snapshot;
pub mod store;
pub mod version;

pub use indicator::{Indicator, IndicatorUpdate};
pub use snapshot::IndicatorSnapshot;
pub use store::{
    deactivate_indicator, update_indicator, Assessment, AssessmentResponse, AssessmentStore,
    BbiStore, HistoryStore, IndicatorStore, MemoryStore, MovStore, ResponseStore,
};
pub use version::{archive_if_schema_changed, schema_fingerprint, UpdateOutcome};
