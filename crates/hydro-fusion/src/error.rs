use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    #[error("Archive request failed: {0}")]
    Http(String),

    #[error("Archive returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Archive response parse error: {0}")]
    Parse(String),

    #[error("Archive response missing field: {0}")]
    MissingField(&'static str),

    #[error("Local fallback table not found at {0}")]
    LocalTableMissing(String),

    #[error("Local fallback table error: {0}")]
    LocalTable(String),

    #[error("No local row for {0}")]
    NoLocalRow(NaiveDate),

    #[error("Climate data unavailable for {date} (remote: {remote}; local: {local})")]
    DataUnavailable {
        date: NaiveDate,
        remote: String,
        local: String,
    },
}
