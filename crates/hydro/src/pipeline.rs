//! The fetch, compute, advise flow behind the dashboard, without the UI.

use std::time::Duration;

use chrono::{Days, NaiveDate};
use hydro_advisor::AdvisoryGenerator;
use hydro_fusion::FusionResolver;
use hydro_models::{
    validate_coordinates, AgronomistInsight, ClimateRecord, EToResult, HydroConfig,
    PipelineConfig,
};
use hydro_science::compute_eto;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::HydroError;

/// One day of the trend window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub eto: f64,
    pub precipitation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HydroAnalysis {
    pub target_date: NaiveDate,
    /// `None` when neither source had the target day.
    pub day: Option<ClimateRecord>,
    pub eto: Option<EToResult>,
    /// Ascending by date.
    pub trend: Vec<TrendPoint>,
}

pub struct Pipeline {
    resolver: FusionResolver,
    generator: AdvisoryGenerator,
    config: PipelineConfig,
    sequential_pause: Duration,
}

impl Pipeline {
    pub fn new(resolver: FusionResolver, generator: AdvisoryGenerator, config: &HydroConfig) -> Self {
        Self {
            resolver,
            generator,
            config: config.pipeline.clone(),
            sequential_pause: Duration::from_millis(config.fusion.sequential_pause_ms),
        }
    }

    pub fn generator(&self) -> &AdvisoryGenerator {
        &self.generator
    }

    /// Single-day record, rejecting bad coordinates before any I/O.
    pub async fn climate(&self, lat: f64, lon: f64, date: NaiveDate) -> Result<ClimateRecord, HydroError> {
        validate_coordinates(lat, lon)?;
        Ok(self.resolver.resolve_day(lat, lon, date).await?)
    }

    /// Inclusive window; empty on upstream failure.
    pub async fn range(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ClimateRecord>, HydroError> {
        validate_coordinates(lat, lon)?;
        Ok(self.resolver.resolve_range(lat, lon, start, end).await)
    }

    /// Resolve the trailing window ending at `date`, compute ETo for the
    /// target day and for every window day.
    pub async fn analyze(&self, lat: f64, lon: f64, date: NaiveDate) -> Result<HydroAnalysis, HydroError> {
        validate_coordinates(lat, lon)?;

        let span = u64::from(self.config.window_days.max(1) - 1);
        let start = date.checked_sub_days(Days::new(span)).unwrap_or(date);

        let mut window = self.resolver.resolve_range(lat, lon, start, date).await;
        let mut walked = false;
        if window.is_empty() && self.config.sequential_fallback {
            info!(%start, end = %date, "Range empty, walking window day by day");
            window = self
                .resolver
                .resolve_days_sequential(lat, lon, start, date, self.sequential_pause)
                .await;
            walked = true;
        }

        let day = match window.iter().find(|r| r.date == date).or(window.last()) {
            Some(record) => Some(record.clone()),
            None if walked => None,
            None => match self.resolver.resolve_day(lat, lon, date).await {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(%date, error = %e, "No climate data for target day");
                    None
                }
            },
        };

        let eto = day.as_ref().map(compute_eto).transpose()?;

        let mut trend: Vec<TrendPoint> = window
            .iter()
            .map(|record| TrendPoint {
                date: record.date,
                eto: compute_eto(record)
                    .map(|result| result.eto_mm_per_day)
                    .unwrap_or_else(|e| {
                        warn!(date = %record.date, error = %e, "ETo failed for trend point, recording 0.0");
                        0.0
                    }),
                precipitation: record.precipitation,
            })
            .collect();
        trend.sort_by_key(|point| point.date);

        info!(
            %date,
            has_day = day.is_some(),
            trend_days = trend.len(),
            "Analysis complete"
        );

        Ok(HydroAnalysis {
            target_date: date,
            day,
            eto,
            trend,
        })
    }

    /// Never fails; see [`AdvisoryGenerator::generate_insight`].
    pub async fn advise(&self, eto: &EToResult) -> AgronomistInsight {
        self.generator.generate_insight(eto).await
    }
}
