//! CAP BBI: institutional functionality evaluation
//!
//! Combines several indicators' verdicts into one Functional/Non-Functional
//! verdict per institution, using the BBI's authored mapping rules. Sits one
//! layer above the calculation engine: it consumes verdict snapshots, never
//! raw response data.

pub mod mapping;
pub mod result;

pub use mapping::{evaluate_mapping, IndicatorStatuses, MappingCondition, MappingRules};
pub use result::{calculate_all, calculate_status, Bbi, BbiResult};
