//! Insight schema enforcement.
//!
//! Every insight leaving the advisory layer, generated or fallback, goes
//! through [`validate_insight`]. Risk tiers are already closed by
//! [`RiskLevel`]; this checks the narrative fields and the ETo value.

use crate::error::ValidationError;
use crate::insight::AgronomistInsight;

/// Risk tiers a generative backend is allowed to emit.
pub const BACKEND_RISK_LEVELS: [&str; 3] = ["Low", "Medium", "High"];

/// Required keys of a structured backend response.
pub const REQUIRED_FIELDS: [&str; 3] = ["summary", "advice", "risk_level"];

pub fn validate_insight(insight: &AgronomistInsight) -> Result<(), ValidationError> {
    if insight.summary.trim().is_empty() {
        return Err(ValidationError::EmptyField("summary"));
    }
    if insight.advice.trim().is_empty() {
        return Err(ValidationError::EmptyField("advice"));
    }
    if !insight.eto_value.is_finite() {
        return Err(ValidationError::NonFinite("eto_value"));
    }
    Ok(())
}

/// JSON schema handed to the generative backend to constrain its output.
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "summary": {"type": "string"},
            "advice": {"type": "string"},
            "risk_level": {"type": "string", "enum": BACKEND_RISK_LEVELS},
        },
        "required": REQUIRED_FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::RiskLevel;

    fn insight(summary: &str, advice: &str) -> AgronomistInsight {
        AgronomistInsight {
            summary: summary.to_string(),
            advice: advice.to_string(),
            risk_level: RiskLevel::Low,
            eto_value: 2.4,
        }
    }

    #[test]
    fn accepts_complete_insight() {
        assert!(validate_insight(&insight("Dry week.", "Irrigate lightly.")).is_ok());
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            validate_insight(&insight("  ", "x")),
            Err(ValidationError::EmptyField("summary"))
        );
        assert_eq!(
            validate_insight(&insight("x", "")),
            Err(ValidationError::EmptyField("advice"))
        );
    }

    #[test]
    fn rejects_nan_eto() {
        let mut bad = insight("x", "y");
        bad.eto_value = f64::NAN;
        assert_eq!(
            validate_insight(&bad),
            Err(ValidationError::NonFinite("eto_value"))
        );
    }

    #[test]
    fn schema_lists_three_required_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 3);
        assert_eq!(schema["properties"]["risk_level"]["enum"][2], "High");
    }
}
