use hydro_fusion::FusionError;
use hydro_models::ValidationError;
use hydro_science::ScienceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydroError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error(transparent)]
    Fusion(#[from] FusionError),

    #[error(transparent)]
    Science(#[from] ScienceError),
}
