use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Latitude {0} outside [-90, 90]")]
    Latitude(f64),

    #[error("Longitude {0} outside [-180, 180]")]
    Longitude(f64),

    #[error("Malformed date '{0}', expected YYYY-MM-DD")]
    Date(String),

    #[error("tmax ({tmax}) is below tmin ({tmin}) on {date}")]
    TemperatureOrder { date: NaiveDate, tmin: f64, tmax: f64 },

    #[error("Field '{0}' is not a finite number")]
    NonFinite(&'static str),

    #[error("Insight field '{0}' is empty")]
    EmptyField(&'static str),
}
