use std::path::Path;
use std::time::Instant;

use hydro_models::HydroConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: String,
    pub uptime_seconds: f64,
    /// True when the local fallback table is present, i.e. single-day
    /// resolution can succeed without the archive.
    pub tools_ready: bool,
}

impl HealthReport {
    pub fn probe(started: Instant, config: &HydroConfig) -> Self {
        let tools_ready = Path::new(&config.fusion.local_table_path).is_file();
        let report = Self {
            status: if tools_ready { "ok" } else { "degraded" }.to_string(),
            uptime_seconds: started.elapsed().as_secs_f64(),
            tools_ready,
        };
        debug!(?report, "Health probe resolved");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_when_local_table_exists() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = HydroConfig::default();
        config.fusion.local_table_path = file.path().display().to_string();

        let report = HealthReport::probe(Instant::now(), &config);
        assert_eq!(report.status, "ok");
        assert!(report.tools_ready);
        assert!(report.uptime_seconds >= 0.0);
    }

    #[test]
    fn degraded_without_local_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HydroConfig::default();
        config.fusion.local_table_path = dir.path().join("none.csv").display().to_string();

        let report = HealthReport::probe(Instant::now(), &config);
        assert_eq!(report.status, "degraded");
        assert!(!report.tools_ready);
    }
}
