//! Hydro - daily reference evapotranspiration and irrigation advisory
//!
//! Resolves a daily climate record (reanalysis archive first, local station
//! table second), computes Hargreaves-Samani ETo, and turns the result into
//! a schema-validated agronomic insight.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use hydro::models::HydroConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = HydroConfig::default();
//! let pipeline = hydro::build_pipeline(&config, hydro::read_credential(&config.advisor.api_key_env));
//! let date = hydro::models::parse_date("2023-01-01")?;
//! let analysis = pipeline.analyze(12.0, -85.0, date).await?;
//! if let Some(eto) = &analysis.eto {
//!     let insight = pipeline.advise(eto).await;
//!     println!("{}", insight.summary);
//! }
//! # Ok(())
//! # }
//! ```

pub use hydro_advisor as advisor;
pub use hydro_fusion as fusion;
pub use hydro_models as models;
pub use hydro_science as science;

pub mod error;
pub mod health;
pub mod pipeline;

pub use error::HydroError;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hydro_advisor::AdvisoryGenerator;
use hydro_fusion::{FusionResolver, LocalTable, OpenMeteoArchive};
use hydro_models::HydroConfig;
use pipeline::Pipeline;
use tracing::info;

/// Load configuration from TOML. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<HydroConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(HydroConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Read the advisory credential from `env_var`. Blank values count as absent.
pub fn read_credential(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Build a FusionResolver backed by the Open-Meteo archive and the
/// configured local table.
pub fn build_resolver(config: &HydroConfig) -> FusionResolver {
    FusionResolver::new(
        Arc::new(OpenMeteoArchive::new(&config.fusion)),
        LocalTable::new(&config.fusion.local_table_path),
        &config.fusion,
    )
}

pub fn build_generator(config: &HydroConfig, credential: Option<String>) -> AdvisoryGenerator {
    AdvisoryGenerator::from_credential(credential, &config.advisor)
}

pub fn build_pipeline(config: &HydroConfig, credential: Option<String>) -> Pipeline {
    Pipeline::new(
        build_resolver(config),
        build_generator(config, credential),
        config,
    )
}
