//! Remark schema passthrough
//!
//! Maps canonical verdict keywords to human-readable remarks. No algorithmic
//! role; the engine resolves a remark for a verdict and carries it along.

use cap_core::ValidationStatus;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static DEFAULT_REMARKS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("PASS", "All requirements satisfied"),
        ("FAIL", "One or more requirements not satisfied"),
        ("CONDITIONAL", "Subject to assessor review"),
    ])
});

/// Verdict keyword -> remark text, as authored per indicator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemarkSchema(pub HashMap<String, String>);

impl RemarkSchema {
    /// Look up the remark for a verdict. Accepts both the keyword form
    /// ("PASS") and the display form ("Pass") as authored keys.
    pub fn remark_for(&self, status: ValidationStatus) -> Option<&str> {
        self.0
            .get(status.keyword())
            .or_else(|| self.0.get(&status.to_string()))
            .map(|s| s.as_str())
    }
}

/// Platform default remark when the indicator's schema has none.
pub fn default_remark(status: ValidationStatus) -> Option<&'static str> {
    DEFAULT_REMARKS.get(status.keyword()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyword_lookup() {
        let remarks: RemarkSchema =
            serde_json::from_value(json!({ "PASS": "ok", "FAIL": "not ok" })).unwrap();
        assert_eq!(remarks.remark_for(ValidationStatus::Pass), Some("ok"));
        assert_eq!(remarks.remark_for(ValidationStatus::Fail), Some("not ok"));
        assert_eq!(remarks.remark_for(ValidationStatus::Conditional), None);
    }

    #[test]
    fn test_display_form_keys_accepted() {
        let remarks: RemarkSchema =
            serde_json::from_value(json!({ "Pass": "looks good" })).unwrap();
        assert_eq!(remarks.remark_for(ValidationStatus::Pass), Some("looks good"));
    }

    #[test]
    fn test_defaults_cover_every_status() {
        assert!(default_remark(ValidationStatus::Pass).is_some());
        assert!(default_remark(ValidationStatus::Fail).is_some());
        assert!(default_remark(ValidationStatus::Conditional).is_some());
    }
}
