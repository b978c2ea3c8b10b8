pub mod csv_loader;
pub mod polygon;

pub use polygon::PolygonClient;

use async_trait::async_trait;
use chrono::Duration;
use screener_core::{DataError, Mode, PricePoint, PriceSource};
use std::path::PathBuf;

/// A CSV-file-based price source reading `<directory>/<SYMBOL>.csv`.
pub struct CsvDataProvider {
    pub directory: PathBuf,
}

impl CsvDataProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl PriceSource for CsvDataProvider {
    /// Rows older than the mode's lookback, measured back from the newest
    /// row, are dropped.
    async fn load_points(&self, symbol: &str, mode: Mode) -> Result<Vec<PricePoint>, DataError> {
        let file_path = self.directory.join(format!("{}.csv", symbol.trim().to_uppercase()));
        if !file_path.exists() {
            return Err(DataError::NotFound(format!(
                "CSV file not found: {}",
                file_path.display()
            )));
        }

        let points = csv_loader::load_points_from_csv(&file_path)?;
        // A header-only file is an empty series, not a missing one.
        let Some(newest) = points.iter().map(|p| p.timestamp).max() else {
            return Ok(points);
        };

        let cutoff = newest - Duration::days(mode.lookback_days());
        let filtered: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.timestamp >= cutoff)
            .collect();
        Ok(filtered)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("screener-data-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let provider = CsvDataProvider::new(scratch_dir("missing"));
        let err = provider.load_points("NOPE", Mode::Stock).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_option_mode_keeps_last_90_days() {
        let dir = scratch_dir("lookback");
        let mut csv = String::from("date,close\n");
        for (date, close) in [
            ("2024-01-01", 10.0),
            ("2024-03-01", 11.0),
            ("2024-03-31", 12.0),
            ("2024-06-29", 13.0),
        ] {
            csv.push_str(&format!("{},{}\n", date, close));
        }
        fs::write(dir.join("ACME.csv"), csv).unwrap();

        let provider = CsvDataProvider::new(&dir);
        let option = provider.load_points("acme", Mode::OptionContract).await.unwrap();
        assert_eq!(option.len(), 2);
        assert_eq!(option[0].timestamp, Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap());

        let stock = provider.load_points("ACME", Mode::Stock).await.unwrap();
        assert_eq!(stock.len(), 4);

        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_header_only_file_is_empty() {
        let dir = scratch_dir("empty");
        fs::write(dir.join("EMPTY.csv"), "date,close\n").unwrap();
        let provider = CsvDataProvider::new(&dir);
        let points = provider.load_points("EMPTY", Mode::Stock).await.unwrap();
        assert!(points.is_empty());
        fs::remove_dir_all(dir).ok();
    }
}
