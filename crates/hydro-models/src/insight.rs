use std::fmt;

use serde::{Deserialize, Serialize};

/// Irrigation risk tier.
///
/// Deserialization never fails: unrecognised strings normalize to
/// [`RiskLevel::Unknown`], so the type can never hold an out-of-set value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Unknown => "Unknown",
        }
    }

    /// Map free-form backend output onto the closest tier.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" | "minimal" | "low risk" => RiskLevel::Low,
            "medium" | "moderate" | "med" | "medium risk" => RiskLevel::Medium,
            "high" | "severe" | "critical" | "high risk" => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        RiskLevel::normalize(&raw)
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrative advisory derived from one ETo value. Terminal output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgronomistInsight {
    pub summary: String,
    pub advice: String,
    pub risk_level: RiskLevel,
    pub eto_value: f64,
}
