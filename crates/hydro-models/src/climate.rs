use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which source produced a [`ClimateRecord`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    /// Single-day request to the reanalysis archive.
    #[serde(alias = "API")]
    Remote,
    /// One element of a multi-day archive request.
    RemoteRange,
    /// Row from the static local fallback table.
    #[serde(alias = "CSV")]
    Local,
}

/// Canonical daily weather observation for one location.
///
/// `tmean` is the provider's 24-sample mean and is not expected to equal
/// `(tmax + tmin) / 2`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateRecord {
    pub date: NaiveDate,
    /// Daily minimum air temperature, °C.
    pub tmin: f64,
    /// Daily maximum air temperature, °C.
    pub tmax: f64,
    /// Daily mean air temperature, °C.
    pub tmean: f64,
    /// Signed decimal degrees.
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Daily precipitation sum, mm.
    #[serde(default)]
    pub precipitation: f64,
    /// Daily mean relative humidity, %.
    #[serde(default, alias = "humidity")]
    pub relative_humidity: f64,
    #[serde(alias = "source")]
    pub provenance: Provenance,
}

impl ClimateRecord {
    /// Check the record's invariants without correcting anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("tmin", self.tmin),
            ("tmax", self.tmax),
            ("tmean", self.tmean),
            ("latitude", self.latitude),
            ("precipitation", self.precipitation),
            ("relative_humidity", self.relative_humidity),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite(name));
            }
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::Latitude(self.latitude));
        }
        if self.tmax < self.tmin {
            return Err(ValidationError::TemperatureOrder {
                date: self.date,
                tmin: self.tmin,
                tmax: self.tmax,
            });
        }
        Ok(())
    }

    /// Daily temperature range, floored at zero.
    pub fn temperature_range(&self) -> f64 {
        (self.tmax - self.tmin).max(0.0)
    }
}
