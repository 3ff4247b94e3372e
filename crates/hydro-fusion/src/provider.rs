use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::FusionError;
use crate::open_meteo::DailySeries;

/// One request for daily series over an inclusive date window.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub timeout: Duration,
}

/// Remote source of daily reanalysis series. Mockable for testing.
#[async_trait]
pub trait ClimateProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_daily(&self, query: &DailyQuery) -> Result<DailySeries, FusionError>;
}
