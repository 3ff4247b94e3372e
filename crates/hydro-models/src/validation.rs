use chrono::NaiveDate;

use crate::error::ValidationError;

/// Reject coordinates outside the valid geographic range.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::Latitude(lat));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::Longitude(lon));
    }
    Ok(())
}

/// Parse a strict `YYYY-MM-DD` calendar day.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    // chrono accepts unpadded fields; the wire format does not
    if trimmed.len() != 10 {
        return Err(ValidationError::Date(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::Date(raw.to_string()))
}
