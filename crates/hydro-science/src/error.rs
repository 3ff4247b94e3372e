use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScienceError {
    #[error("Invalid climate record: {0}")]
    InvalidClimateRecord(#[from] hydro_models::ValidationError),
}
