//! Open-Meteo archive client (ERA5 reanalysis).
//!
//! API: `https://archive-api.open-meteo.com/v1/archive`
//!
//! The archive returns one array per requested daily variable, aligned with a
//! `time` array of ISO dates.

use async_trait::async_trait;
use chrono::NaiveDate;
use hydro_models::{ClimateRecord, FusionConfig, Provenance};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FusionError;
use crate::provider::{ClimateProvider, DailyQuery};

/// Daily variables requested from the archive.
pub const DAILY_VARIABLES: [&str; 5] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "precipitation_sum",
    "relative_humidity_2m_mean",
];

type Column = Option<Vec<Option<f64>>>;

/// The `daily` block of an archive response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Column,
    #[serde(default)]
    pub temperature_2m_min: Column,
    #[serde(default)]
    pub temperature_2m_mean: Column,
    #[serde(default, alias = "precipitation")]
    pub precipitation_sum: Column,
    #[serde(default, alias = "relativehumidity_2m_mean")]
    pub relative_humidity_2m_mean: Column,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailySeries>,
}

fn required(column: &Column, name: &'static str, index: usize) -> Result<f64, FusionError> {
    column
        .as_ref()
        .and_then(|values| values.get(index).copied().flatten())
        .ok_or(FusionError::MissingField(name))
}

fn optional(column: &Column, index: usize) -> f64 {
    column
        .as_ref()
        .and_then(|values| values.get(index).copied().flatten())
        .unwrap_or(0.0)
}

impl DailySeries {
    /// Build the record at `index`. Temperatures are mandatory; precipitation
    /// and humidity default to 0.0.
    pub fn record_at(
        &self,
        index: usize,
        date: NaiveDate,
        latitude: f64,
        provenance: Provenance,
    ) -> Result<ClimateRecord, FusionError> {
        Ok(ClimateRecord {
            date,
            tmin: required(&self.temperature_2m_min, "temperature_2m_min", index)?,
            tmax: required(&self.temperature_2m_max, "temperature_2m_max", index)?,
            tmean: required(&self.temperature_2m_mean, "temperature_2m_mean", index)?,
            latitude,
            precipitation: optional(&self.precipitation_sum, index),
            relative_humidity: optional(&self.relative_humidity_2m_mean, index),
            provenance,
        })
    }

    /// One record per `time` entry, in provider order.
    pub fn into_range_records(self, latitude: f64) -> Result<Vec<ClimateRecord>, FusionError> {
        self.time
            .iter()
            .enumerate()
            .map(|(index, raw_date)| {
                let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                    .map_err(|e| FusionError::Parse(format!("time[{index}] '{raw_date}': {e}")))?;
                self.record_at(index, date, latitude, Provenance::RemoteRange)
            })
            .collect()
    }
}

/// HTTP client for the Open-Meteo archive.
#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    client: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoArchive {
    pub fn new(config: &FusionConfig) -> Self {
        Self::with_client(Client::new(), config.archive_url.clone(), config.timezone.clone())
    }

    /// Use a caller-supplied HTTP client and endpoint (e.g. a local test server).
    pub fn with_client(client: Client, base_url: String, timezone: String) -> Self {
        Self {
            client,
            base_url,
            timezone,
        }
    }
}

#[async_trait]
impl ClimateProvider for OpenMeteoArchive {
    fn name(&self) -> &str {
        "open-meteo-archive"
    }

    async fn fetch_daily(&self, query: &DailyQuery) -> Result<DailySeries, FusionError> {
        debug!(
            lat = query.latitude,
            lon = query.longitude,
            start = %query.start,
            end = %query.end,
            "Requesting archive daily series"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", query.latitude.to_string()),
                ("longitude", query.longitude.to_string()),
                ("start_date", query.start.format("%Y-%m-%d").to_string()),
                ("end_date", query.end.format("%Y-%m-%d").to_string()),
                ("daily", DAILY_VARIABLES.join(",")),
                ("timezone", self.timezone.clone()),
            ])
            .timeout(query.timeout)
            .send()
            .await
            .map_err(|e| FusionError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FusionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| FusionError::Parse(e.to_string()))?;

        payload.daily.ok_or(FusionError::MissingField("daily"))
    }
}
