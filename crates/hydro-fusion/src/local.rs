use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hydro_models::{ClimateRecord, Provenance};
use serde::Deserialize;
use tracing::debug;

use crate::error::FusionError;

#[derive(Debug, Deserialize)]
struct LocalRow {
    date: String,
    tmin: f64,
    tmax: f64,
    tmean: f64,
    #[serde(default)]
    precipitation: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
}

/// Static station table used when the archive is unreachable.
///
/// Read-only at runtime. The file is read on each lookup so an absent or
/// replaced file is reported rather than masked by stale contents.
#[derive(Debug, Clone)]
pub struct LocalTable {
    path: PathBuf,
}

impl LocalTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exact date-string match; the first matching row wins.
    ///
    /// Only the matching row is parsed, so a malformed row for another date
    /// does not hide the one requested.
    pub fn lookup(&self, date: NaiveDate, latitude: f64) -> Result<ClimateRecord, FusionError> {
        if !self.path.exists() {
            return Err(FusionError::LocalTableMissing(
                self.path.display().to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| FusionError::LocalTable(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| FusionError::LocalTable(e.to_string()))?
            .clone();
        let date_column = headers
            .iter()
            .position(|name| name == "date")
            .ok_or_else(|| FusionError::LocalTable("missing 'date' column".to_string()))?;

        let wanted = date.format("%Y-%m-%d").to_string();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    debug!(path = %self.path.display(), error = %e, "Skipping unreadable row");
                    continue;
                }
            };
            if row.get(date_column) != Some(wanted.as_str()) {
                continue;
            }

            let parsed: LocalRow = row
                .deserialize(Some(&headers))
                .map_err(|e| FusionError::LocalTable(format!("row for {wanted}: {e}")))?;
            debug!(date = %wanted, path = %self.path.display(), "Local table hit");
            return Ok(ClimateRecord {
                date,
                tmin: parsed.tmin,
                tmax: parsed.tmax,
                tmean: parsed.tmean,
                latitude,
                precipitation: parsed.precipitation.unwrap_or(0.0),
                relative_humidity: parsed.humidity.unwrap_or(0.0),
                provenance: Provenance::Local,
            });
        }

        Err(FusionError::NoLocalRow(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(contents: &str) -> (tempfile::NamedTempFile, LocalTable) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let table = LocalTable::new(file.path());
        (file, table)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn lookup_matching_row() {
        let (_file, table) = write_table(
            "date,tmin,tmax,tmean,precipitation,humidity\n\
             2023-01-01,18.5,28.2,23.4,0.0,72.0\n\
             2023-01-02,18.9,29.1,23.8,1.2,70.5\n",
        );
        let record = table.lookup(day("2023-01-02"), 12.0).unwrap();
        assert_eq!(record.tmean, 23.8);
        assert_eq!(record.precipitation, 1.2);
        assert_eq!(record.relative_humidity, 70.5);
        assert_eq!(record.latitude, 12.0);
        assert_eq!(record.provenance, Provenance::Local);
    }

    #[test]
    fn optional_columns_may_be_absent_or_blank() {
        let (_file, table) = write_table("date,tmin,tmax,tmean\n2023-01-01,18.5,28.2,23.4\n");
        let record = table.lookup(day("2023-01-01"), -3.0).unwrap();
        assert_eq!(record.precipitation, 0.0);
        assert_eq!(record.relative_humidity, 0.0);

        let (_file, table) = write_table(
            "date,tmin,tmax,tmean,precipitation,humidity\n2023-01-01,18.5,28.2,23.4,,\n",
        );
        let record = table.lookup(day("2023-01-01"), -3.0).unwrap();
        assert_eq!(record.precipitation, 0.0);
    }

    #[test]
    fn first_duplicate_row_wins() {
        let (_file, table) = write_table(
            "date,tmin,tmax,tmean\n2023-01-01,18.5,28.2,23.4\n2023-01-01,10.0,20.0,15.0\n",
        );
        assert_eq!(table.lookup(day("2023-01-01"), 12.0).unwrap().tmean, 23.4);
    }

    #[test]
    fn missing_row_is_reported() {
        let (_file, table) = write_table("date,tmin,tmax,tmean\n2023-01-01,18.5,28.2,23.4\n");
        assert_eq!(
            table.lookup(day("2024-07-04"), 12.0),
            Err(FusionError::NoLocalRow(day("2024-07-04")))
        );
    }

    #[test]
    fn corrupt_unrelated_row_does_not_block_lookup() {
        let (_file, table) = write_table(
            "date,tmin,tmax,tmean\n\
             2022-12-31,n/a,28.0,23.0\n\
             2023-01-01,18.5,28.2,23.4\n",
        );
        let record = table.lookup(day("2023-01-01"), 12.0).unwrap();
        assert_eq!(record.tmin, 18.5);
        assert_eq!(record.tmean, 23.4);
    }

    #[test]
    fn ragged_unrelated_row_does_not_block_lookup() {
        let (_file, table) = write_table(
            "date,tmin,tmax,tmean\n2022-12-30,17.0\n2023-01-01,18.5,28.2,23.4\n",
        );
        assert_eq!(table.lookup(day("2023-01-01"), 12.0).unwrap().tmax, 28.2);
    }

    #[test]
    fn missing_date_column_is_reported() {
        let (_file, table) = write_table("day,tmin,tmax,tmean\n2023-01-01,18.5,28.2,23.4\n");
        assert!(matches!(
            table.lookup(day("2023-01-01"), 12.0),
            Err(FusionError::LocalTable(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let table = LocalTable::new(dir.path().join("absent.csv"));
        assert!(matches!(
            table.lookup(day("2023-01-01"), 12.0),
            Err(FusionError::LocalTableMissing(_))
        ));
    }

    #[test]
    fn malformed_row_is_reported() {
        let (_file, table) = write_table("date,tmin,tmax,tmean\n2023-01-01,cold,28.2,23.4\n");
        assert!(matches!(
            table.lookup(day("2023-01-01"), 12.0),
            Err(FusionError::LocalTable(_))
        ));
    }
}
