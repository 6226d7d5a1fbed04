//! CAP Forms: form schema model, integrity checks, completeness validation
//!
//! A form schema is the authored shape of one indicator's questionnaire.
//! This crate validates the schema's structure at authoring time (including
//! cycle detection over conditional-evidence references) and judges the
//! structural completeness of submitted responses. Neither check reveals
//! pass/fail compliance; that separation is deliberate.

pub mod completeness;
pub mod field;
pub mod integrity;
pub mod schema;

pub use completeness::{validate_completeness, CompletenessResult};
pub use field::{ConditionalMovRequirement, FieldType, FormField};
pub use integrity::generate_validation_errors;
pub use schema::FormSchema;
