//! Diagnosis results.

use serde::{Deserialize, Serialize};

/// A structured diagnosis for one request.
///
/// Deserialization is lenient: unknown fields are ignored and missing fields
/// take their zero value, so any JSON object from a remote endpoint is
/// accepted as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagnosisResult {
    /// Human-readable fault name.
    pub issue_title: String,

    /// Severity from 1 (minor) to 10 (critical).
    pub severity_score: i64,

    /// Confidence in the diagnosis, 0.0 to 1.0.
    pub confidence_level: f64,

    pub description: String,
    pub recommended_action: String,

    /// Whether a skilled DIYer could fix this at home.
    pub diy_possible: bool,

    /// Free-text repair cost range, e.g. `"$150 - $300"`.
    pub estimated_cost_range_usd: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_ignored() {
        let result: DiagnosisResult = serde_json::from_str(
            r#"{"issue_title":"Loose Heat Shield","severity_score":2,"extra":[1,2,3]}"#,
        )
        .unwrap();
        assert_eq!(result.issue_title, "Loose Heat Shield");
        assert_eq!(result.severity_score, 2);
    }

    #[test]
    fn test_missing_fields_take_zero_values() {
        let result: DiagnosisResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, DiagnosisResult::default());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(serde_json::from_str::<DiagnosisResult>("\"oops\"").is_err());
        assert!(serde_json::from_str::<DiagnosisResult>("<html>").is_err());
    }
}
