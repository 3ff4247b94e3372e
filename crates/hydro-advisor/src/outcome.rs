use hydro_models::{validate_insight, AgronomistInsight, RiskLevel};
use tracing::warn;

use crate::error::AdvisorError;
use crate::fallback::{heuristic_risk, rule_based_insight};
use crate::parser::{parse_structured, StructuredAdvice};

const GENERATED_SUMMARY: &str = "Analysis generated.";

/// Terminal state of one advisory request.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryOutcome {
    /// Backend replied with a structured object.
    Success {
        advice: StructuredAdvice,
        raw: String,
    },
    /// Backend replied with prose.
    DegradedParse(String),
    Timeout,
    /// Backend failed, was filtered, or returned nothing usable.
    BackendError(String),
    Cancelled,
    /// No credential configured; names the variable the operator should set.
    NoCredential(String),
}

impl AdvisoryOutcome {
    /// Classify a backend reply.
    pub fn from_result(result: Result<String, AdvisorError>) -> Self {
        match result {
            Ok(raw) => match parse_structured(&raw) {
                Some(advice) => AdvisoryOutcome::Success { advice, raw },
                None => AdvisoryOutcome::DegradedParse(raw),
            },
            Err(AdvisorError::Timeout(_)) => AdvisoryOutcome::Timeout,
            Err(AdvisorError::Cancelled) => AdvisoryOutcome::Cancelled,
            Err(AdvisorError::Blocked(_)) => {
                AdvisoryOutcome::BackendError("content filtered".to_string())
            }
            Err(AdvisorError::EmptyCandidate(_)) => {
                AdvisoryOutcome::BackendError("empty response".to_string())
            }
            Err(_) => AdvisoryOutcome::BackendError("API error".to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdvisoryOutcome::Success { .. } => "success",
            AdvisoryOutcome::DegradedParse(_) => "degraded_parse",
            AdvisoryOutcome::Timeout => "timeout",
            AdvisoryOutcome::BackendError(_) => "backend_error",
            AdvisoryOutcome::Cancelled => "cancelled",
            AdvisoryOutcome::NoCredential(_) => "no_credential",
        }
    }

    /// Fold the outcome into an insight carrying `eto`. The result always
    /// passes [`validate_insight`] unless `eto` itself is not finite.
    pub fn into_insight(self, eto: f64) -> AgronomistInsight {
        let from_backend = matches!(
            self,
            AdvisoryOutcome::Success { .. } | AdvisoryOutcome::DegradedParse(_)
        );

        let insight = match self {
            AdvisoryOutcome::Success { advice, raw } => AgronomistInsight {
                summary: non_blank(advice.summary).unwrap_or_else(|| GENERATED_SUMMARY.to_string()),
                advice: non_blank(advice.advice).unwrap_or(raw),
                risk_level: advice
                    .risk_level
                    .map(|r| RiskLevel::normalize(&r))
                    .unwrap_or(RiskLevel::Medium),
                eto_value: eto,
            },
            AdvisoryOutcome::DegradedParse(raw) => AgronomistInsight {
                summary: GENERATED_SUMMARY.to_string(),
                risk_level: heuristic_risk(&raw),
                advice: raw,
                eto_value: eto,
            },
            AdvisoryOutcome::Timeout => AgronomistInsight {
                summary: "Insight generation timed out.".to_string(),
                advice: "Try again or reduce request load.".to_string(),
                risk_level: RiskLevel::Medium,
                eto_value: eto,
            },
            AdvisoryOutcome::BackendError(reason) => rule_based_insight(eto, &reason),
            AdvisoryOutcome::Cancelled => rule_based_insight(eto, "cancelled"),
            AdvisoryOutcome::NoCredential(env_var) => AgronomistInsight {
                summary: "API key missing".to_string(),
                advice: format!("Set {env_var} to enable generated insights."),
                risk_level: RiskLevel::Unknown,
                eto_value: eto,
            },
        };

        match validate_insight(&insight) {
            Ok(()) => insight,
            Err(e) if from_backend => {
                warn!(error = %e, "Generated insight failed validation, using rule-based fallback");
                rule_based_insight(eto, "invalid response")
            }
            Err(e) => {
                warn!(error = %e, "Fallback insight failed validation");
                insight
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(summary: Option<&str>, advice: Option<&str>, risk: Option<&str>) -> StructuredAdvice {
        StructuredAdvice {
            summary: summary.map(String::from),
            advice: advice.map(String::from),
            risk_level: risk.map(String::from),
        }
    }

    #[test]
    fn classify_structured_and_prose() {
        let ok = AdvisoryOutcome::from_result(Ok(
            r#"{"summary":"s","advice":"a","risk_level":"Low"}"#.to_string(),
        ));
        assert_eq!(ok.kind(), "success");

        let prose = AdvisoryOutcome::from_result(Ok("Irrigate tomorrow.".to_string()));
        assert_eq!(prose, AdvisoryOutcome::DegradedParse("Irrigate tomorrow.".to_string()));
    }

    #[test]
    fn prose_with_embedded_object_uses_heuristic() {
        let raw = r#"Risk is HIGH today. Template: {"note": "x"}"#;
        let outcome = AdvisoryOutcome::from_result(Ok(raw.to_string()));
        assert_eq!(outcome.kind(), "degraded_parse");

        let insight = outcome.into_insight(2.0);
        assert_eq!(insight.summary, "Analysis generated.");
        assert_eq!(insight.advice, raw);
        assert_eq!(insight.risk_level, RiskLevel::High);
    }

    #[test]
    fn classify_errors() {
        assert_eq!(
            AdvisoryOutcome::from_result(Err(AdvisorError::Timeout(15_000))),
            AdvisoryOutcome::Timeout
        );
        assert_eq!(
            AdvisoryOutcome::from_result(Err(AdvisorError::Blocked("SAFETY".into()))),
            AdvisoryOutcome::BackendError("content filtered".into())
        );
        assert_eq!(
            AdvisoryOutcome::from_result(Err(AdvisorError::Status {
                status: 429,
                body: String::new()
            })),
            AdvisoryOutcome::BackendError("API error".into())
        );
    }

    #[test]
    fn success_fills_blank_fields() {
        let raw = r#"{"summary":" ","advice":""}"#.to_string();
        let insight = AdvisoryOutcome::Success {
            advice: structured(Some(" "), Some(""), None),
            raw: raw.clone(),
        }
        .into_insight(3.3);

        assert_eq!(insight.summary, "Analysis generated.");
        assert_eq!(insight.advice, raw);
        assert_eq!(insight.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn success_normalizes_risk() {
        let insight = AdvisoryOutcome::Success {
            advice: structured(Some("Hot."), Some("Water daily."), Some("SEVERE")),
            raw: String::new(),
        }
        .into_insight(6.0);
        assert_eq!(insight.risk_level, RiskLevel::High);

        let insight = AdvisoryOutcome::Success {
            advice: structured(Some("Hot."), Some("Water daily."), Some("catastrophic")),
            raw: String::new(),
        }
        .into_insight(6.0);
        assert_eq!(insight.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn degraded_parse_uses_raw_text() {
        let insight = AdvisoryOutcome::DegradedParse("LOW risk overall".into()).into_insight(2.0);
        assert_eq!(insight.summary, "Analysis generated.");
        assert_eq!(insight.advice, "LOW risk overall");
        assert_eq!(insight.risk_level, RiskLevel::Low);
    }

    #[test]
    fn blank_degraded_text_falls_back_to_rules() {
        let insight = AdvisoryOutcome::DegradedParse("   ".into()).into_insight(4.0);
        assert_eq!(insight.summary, "Automated analysis (invalid response).");
        assert_eq!(insight.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn fixed_terminal_messages() {
        let timeout = AdvisoryOutcome::Timeout.into_insight(7.1);
        assert_eq!(timeout.summary, "Insight generation timed out.");
        assert_eq!(timeout.risk_level, RiskLevel::Medium);

        let missing = AdvisoryOutcome::NoCredential("GOOGLE_API_KEY".into()).into_insight(7.1);
        assert_eq!(missing.summary, "API key missing");
        assert_eq!(missing.advice, "Set GOOGLE_API_KEY to enable generated insights.");
        assert_eq!(missing.risk_level, RiskLevel::Unknown);

        let cancelled = AdvisoryOutcome::Cancelled.into_insight(1.0);
        assert_eq!(cancelled.summary, "Automated analysis (cancelled).");
        assert_eq!(cancelled.risk_level, RiskLevel::Low);
    }
}
