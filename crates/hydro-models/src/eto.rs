use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::climate::ClimateRecord;

/// Formula variant used to produce an [`EToResult`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EtoMethod {
    /// FAO-56 Hargreaves-Samani, temperature range plus extraterrestrial radiation.
    #[serde(rename = "Hargreaves-Samani (FAO-56)")]
    HargreavesSamani,
}

impl EtoMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtoMethod::HargreavesSamani => "Hargreaves-Samani (FAO-56)",
        }
    }
}

/// Reference evapotranspiration for one day, with the record it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EToResult {
    pub date: NaiveDate,
    /// mm/day. Not clamped.
    #[serde(alias = "eto")]
    pub eto_mm_per_day: f64,
    pub method: EtoMethod,
    #[serde(alias = "input_data")]
    pub source_record: ClimateRecord,
}
