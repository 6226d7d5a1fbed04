//! CAP Core: canonical statuses, response data, and the unified error model
//!
//! Everything in this crate is plain data shared by the evaluator crates:
//! the canonical status enums, the `field_id -> value` response map, the
//! evidence (MOV) record, and `CapError`.

pub mod error;
pub mod mov;
pub mod status;
pub mod value;

pub use error::CapError;
pub use mov::MovFile;
pub use status::{AssessmentStatus, BbiStatus, MovStatus, ValidationStatus};
pub use value::{as_number, ResponseData};

/// Engine version, stamped into calculation details.
pub const CAP_VERSION: &str = "0.1.0";
