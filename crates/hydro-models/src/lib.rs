pub mod climate;
pub mod config;
pub mod error;
pub mod eto;
pub mod insight;
pub mod schema;
pub mod validation;

pub use climate::{ClimateRecord, Provenance};
pub use config::{AdvisorConfig, FusionConfig, HydroConfig, PipelineConfig};
pub use error::ValidationError;
pub use eto::{EToResult, EtoMethod};
pub use insight::{AgronomistInsight, RiskLevel};
pub use schema::validate_insight;
pub use validation::{parse_date, validate_coordinates};
