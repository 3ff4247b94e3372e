pub mod error;
pub mod local;
pub mod open_meteo;
pub mod provider;
pub mod resolver;

pub use error::FusionError;
pub use local::LocalTable;
pub use open_meteo::{DailySeries, OpenMeteoArchive};
pub use provider::{ClimateProvider, DailyQuery};
pub use resolver::FusionResolver;
