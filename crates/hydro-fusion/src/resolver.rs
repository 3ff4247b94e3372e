use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use hydro_models::{ClimateRecord, FusionConfig, Provenance};
use tracing::{info, warn};

use crate::error::FusionError;
use crate::local::LocalTable;
use crate::provider::{ClimateProvider, DailyQuery};

/// Resolves daily climate records: remote archive first, local table second.
///
/// Stateless apart from the read-only local table; safe to share across
/// concurrent callers.
pub struct FusionResolver {
    remote: Arc<dyn ClimateProvider>,
    local: LocalTable,
    day_timeout: Duration,
    range_timeout: Duration,
}

impl FusionResolver {
    pub fn new(remote: Arc<dyn ClimateProvider>, local: LocalTable, config: &FusionConfig) -> Self {
        Self {
            remote,
            local,
            day_timeout: Duration::from_secs(config.day_timeout_seconds),
            range_timeout: Duration::from_secs(config.range_timeout_seconds),
        }
    }

    /// Resolve one day. Any remote failure falls through to the local table;
    /// only when both fail does the caller see [`FusionError::DataUnavailable`].
    pub async fn resolve_day(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<ClimateRecord, FusionError> {
        // Stage 1: remote archive
        let remote_err = match self.fetch_remote_day(lat, lon, date).await {
            Ok(record) => {
                info!(%date, provider = self.remote.name(), "Resolved day from remote archive");
                return Ok(record);
            }
            Err(e) => e,
        };
        warn!(%date, error = %remote_err, "Remote fetch failed, switching to local fallback");

        // Stage 2: local table
        match self.local.lookup(date, lat) {
            Ok(record) => {
                info!(%date, path = %self.local.path().display(), "Resolved day from local table");
                Ok(record)
            }
            Err(local_err) => {
                warn!(%date, error = %local_err, "Local fallback failed");
                Err(FusionError::DataUnavailable {
                    date,
                    remote: remote_err.to_string(),
                    local: local_err.to_string(),
                })
            }
        }
    }

    async fn fetch_remote_day(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<ClimateRecord, FusionError> {
        let query = DailyQuery {
            latitude: lat,
            longitude: lon,
            start: date,
            end: date,
            timeout: self.day_timeout,
        };
        let series = self.remote.fetch_daily(&query).await?;
        series.record_at(0, date, lat, Provenance::Remote)
    }

    /// Resolve an inclusive window with a single remote request.
    ///
    /// Fails soft: any error yields an empty vector, since no range-capable
    /// local fallback exists. Records keep the provider's order.
    pub async fn resolve_range(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<ClimateRecord> {
        if start > end {
            warn!(%start, %end, "Range start is after end");
            return Vec::new();
        }

        let query = DailyQuery {
            latitude: lat,
            longitude: lon,
            start,
            end,
            timeout: self.range_timeout,
        };

        let result = self
            .remote
            .fetch_daily(&query)
            .await
            .and_then(|series| series.into_range_records(lat));

        match result {
            Ok(records) => {
                info!(%start, %end, days = records.len(), "Resolved range from remote archive");
                records
            }
            Err(e) => {
                warn!(%start, %end, error = %e, "Range fetch failed, returning empty range");
                Vec::new()
            }
        }
    }

    /// Walk an inclusive window one day at a time, pausing between requests
    /// to stay within provider rate limits. Unavailable days are skipped.
    pub async fn resolve_days_sequential(
        &self,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
        pause: Duration,
    ) -> Vec<ClimateRecord> {
        let mut records = Vec::new();
        for (i, date) in start.iter_days().take_while(|d| *d <= end).enumerate() {
            if i > 0 && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            match self.resolve_day(lat, lon, date).await {
                Ok(record) => records.push(record),
                Err(e) => warn!(%date, error = %e, "Skipping unavailable day"),
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_meteo::DailySeries;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock archive returning a canned series or a canned error.
    struct MockArchive {
        response: Result<DailySeries, FusionError>,
        queries: Mutex<Vec<DailyQuery>>,
        calls: AtomicUsize,
    }

    impl MockArchive {
        fn ok(series: DailySeries) -> Self {
            Self {
                response: Ok(series),
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: FusionError) -> Self {
            Self {
                response: Err(error),
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ClimateProvider for MockArchive {
        fn name(&self) -> &str {
            "mock"
        }

        async fn fetch_daily(&self, query: &DailyQuery) -> Result<DailySeries, FusionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            self.response.clone()
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series(days: &[(&str, f64, f64, f64)]) -> DailySeries {
        DailySeries {
            time: days.iter().map(|d| d.0.to_string()).collect(),
            temperature_2m_min: Some(days.iter().map(|d| Some(d.1)).collect()),
            temperature_2m_max: Some(days.iter().map(|d| Some(d.2)).collect()),
            temperature_2m_mean: Some(days.iter().map(|d| Some(d.3)).collect()),
            precipitation_sum: None,
            relative_humidity_2m_mean: Some(days.iter().map(|_| Some(65.0)).collect()),
        }
    }

    fn station_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"date,tmin,tmax,tmean,precipitation,humidity\n\
              2023-01-01,18.5,28.2,23.4,0.0,72.0\n\
              2023-01-03,19.0,29.0,24.0,3.1,75.0\n",
        )
        .unwrap();
        file
    }

    fn resolver(archive: Arc<MockArchive>, table: &tempfile::NamedTempFile) -> FusionResolver {
        FusionResolver::new(
            archive,
            LocalTable::new(table.path()),
            &FusionConfig::default(),
        )
    }

    #[tokio::test]
    async fn remote_success_is_tagged_remote() {
        let archive = Arc::new(MockArchive::ok(series(&[("2023-01-01", 18.0, 29.0, 22.7)])));
        let file = station_file();
        let record = resolver(archive.clone(), &file)
            .resolve_day(12.0, -85.0, day("2023-01-01"))
            .await
            .unwrap();

        assert_eq!(record.provenance, Provenance::Remote);
        assert_eq!(record.tmean, 22.7);
        assert_eq!(record.relative_humidity, 65.0);

        let queries = archive.queries.lock().unwrap();
        assert_eq!(queries[0].start, queries[0].end);
        assert_eq!(queries[0].timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_local() {
        let archive = Arc::new(MockArchive::failing(FusionError::Status {
            status: 500,
            body: String::new(),
        }));
        let file = station_file();
        let record = resolver(archive, &file)
            .resolve_day(12.0, -85.0, day("2023-01-01"))
            .await
            .unwrap();

        assert_eq!(record.provenance, Provenance::Local);
        assert_eq!(record.tmean, 23.4);
        assert_eq!(record.date, day("2023-01-01"));
    }

    #[tokio::test]
    async fn incomplete_remote_payload_falls_back_to_local() {
        let mut partial = series(&[("2023-01-01", 18.0, 29.0, 22.7)]);
        partial.temperature_2m_mean = None;
        let archive = Arc::new(MockArchive::ok(partial));
        let file = station_file();
        let record = resolver(archive, &file)
            .resolve_day(12.0, -85.0, day("2023-01-01"))
            .await
            .unwrap();
        assert_eq!(record.provenance, Provenance::Local);
    }

    #[tokio::test]
    async fn corrupt_station_row_does_not_hide_later_days() {
        let archive = Arc::new(MockArchive::failing(FusionError::Http("down".into())));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"date,tmin,tmax,tmean\n\
              2022-12-31,n/a,28.0,23.0\n\
              2023-01-01,18.5,28.2,23.4\n",
        )
        .unwrap();

        let record = resolver(archive, &file)
            .resolve_day(12.0, -85.0, day("2023-01-01"))
            .await
            .unwrap();
        assert_eq!(record.provenance, Provenance::Local);
        assert_eq!(record.tmin, 18.5);
    }

    #[tokio::test]
    async fn both_sources_failing_is_data_unavailable() {
        let archive = Arc::new(MockArchive::failing(FusionError::Http("refused".into())));
        let file = station_file();
        let err = resolver(archive, &file)
            .resolve_day(12.0, -85.0, day("2023-06-15"))
            .await
            .unwrap_err();

        match err {
            FusionError::DataUnavailable { date, remote, local } => {
                assert_eq!(date, day("2023-06-15"));
                assert!(remote.contains("refused"));
                assert!(local.contains("2023-06-15"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn range_is_a_single_request() {
        let archive = Arc::new(MockArchive::ok(series(&[
            ("2023-01-01", 18.0, 29.0, 22.7),
            ("2023-01-02", 18.4, 29.6, 23.1),
            ("2023-01-03", 18.9, 30.2, 23.8),
        ])));
        let file = station_file();
        let records = resolver(archive.clone(), &file)
            .resolve_range(12.0, -85.0, day("2023-01-01"), day("2023-01-03"))
            .await;

        assert_eq!(records.len(), 3);
        assert_eq!(archive.calls.load(Ordering::SeqCst), 1);
        assert!(records.iter().all(|r| r.provenance == Provenance::RemoteRange));
        assert!(records.iter().all(|r| r.precipitation == 0.0));
        assert_eq!(records[2].date, day("2023-01-03"));
        assert_eq!(
            archive.queries.lock().unwrap()[0].timeout,
            Duration::from_secs(8)
        );
    }

    #[tokio::test]
    async fn range_failure_is_empty_not_local() {
        let archive = Arc::new(MockArchive::failing(FusionError::Http("timeout".into())));
        let file = station_file();
        let records = resolver(archive, &file)
            .resolve_range(12.0, -85.0, day("2023-01-01"), day("2023-01-03"))
            .await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn inverted_range_is_empty_without_request() {
        let archive = Arc::new(MockArchive::ok(DailySeries::default()));
        let file = station_file();
        let records = resolver(archive.clone(), &file)
            .resolve_range(12.0, -85.0, day("2023-01-05"), day("2023-01-01"))
            .await;
        assert!(records.is_empty());
        assert_eq!(archive.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sequential_walk_skips_unavailable_days_and_pauses() {
        let archive = Arc::new(MockArchive::failing(FusionError::Http("down".into())));
        let file = station_file();
        let start = std::time::Instant::now();
        let records = resolver(archive.clone(), &file)
            .resolve_days_sequential(
                12.0,
                -85.0,
                day("2023-01-01"),
                day("2023-01-03"),
                Duration::from_millis(20),
            )
            .await;

        // 2023-01-02 is in neither source
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, day("2023-01-01"));
        assert_eq!(records[1].date, day("2023-01-03"));
        assert!(records.iter().all(|r| r.provenance == Provenance::Local));
        assert_eq!(archive.calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
