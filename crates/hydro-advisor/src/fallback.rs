//! Deterministic advisory used whenever the generative backend cannot be
//! trusted. Depends on the ETo value alone.

use hydro_models::{AgronomistInsight, RiskLevel};

/// ETo (mm/day) below which demand is low.
pub const LOW_DEMAND_CEILING: f64 = 3.0;
/// ETo (mm/day) at or above which demand is high.
pub const HIGH_DEMAND_FLOOR: f64 = 5.0;

/// Half-open ladder: [.., 3.0) Low, [3.0, 5.0) Medium, [5.0, ..) High.
pub fn risk_for_eto(eto: f64) -> RiskLevel {
    if eto < LOW_DEMAND_CEILING {
        RiskLevel::Low
    } else if eto < HIGH_DEMAND_FLOOR {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn advice_for(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "Low water demand. Standard irrigation schedule is adequate.",
        RiskLevel::Medium => "Moderate demand. Consider irrigation every 2-3 days.",
        _ => "High evapotranspiration. Daily irrigation recommended.",
    }
}

pub fn rule_based_insight(eto: f64, reason: &str) -> AgronomistInsight {
    let risk_level = risk_for_eto(eto);
    AgronomistInsight {
        summary: format!("Automated analysis ({reason})."),
        advice: advice_for(risk_level).to_string(),
        risk_level,
        eto_value: eto,
    }
}

/// Risk guess for unstructured prose: a case-insensitive "HIGH" wins over
/// "LOW", anything else is Medium.
pub fn heuristic_risk(text: &str) -> RiskLevel {
    let upper = text.to_uppercase();
    if upper.contains("HIGH") {
        RiskLevel::High
    } else if upper.contains("LOW") {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    }
}
