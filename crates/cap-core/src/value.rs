//! Response data and value coercion
//!
//! A response is a plain `field_id -> JSON value` map with no ordering
//! guarantee. Coercion is deliberately narrow: only JSON numbers count as
//! numeric, so malformed submissions fall to the failing branch instead of
//! being reinterpreted.

use serde_json::Value;
use std::collections::HashMap;

/// Submitted answers for one indicator, keyed by field_id.
pub type ResponseData = HashMap<String, Value>;

/// Numeric view of a response value. `None` for anything that is not a JSON
/// number, including numeric-looking strings.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_coerce() {
        assert_eq!(as_number(&json!(85)), Some(85.0));
        assert_eq!(as_number(&json!(72.5)), Some(72.5));
    }

    #[test]
    fn test_non_numbers_do_not() {
        assert_eq!(as_number(&json!("85")), None);
        assert_eq!(as_number(&json!(true)), None);
        assert_eq!(as_number(&json!(null)), None);
        assert_eq!(as_number(&json!(["a"])), None);
    }
}
