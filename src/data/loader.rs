use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::candle::Candle;

use super::provider::CandleProvider;

/// Naive layouts accepted for the time column (interpreted as UTC).
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One row of a stored history. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "datetime", alias = "timestamp")]
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

/// Reads a persisted 1-minute history from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CandleProvider for CsvProvider {
    async fn fetch_candles(&self) -> Result<Vec<Candle>, AppError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_csv(&path))
            .await
            .map_err(|e| AppError::Internal(format!("CSV loader task failed: {}", e)))?
    }

    fn describe(&self) -> String {
        format!("csv({})", self.path.display())
    }
}

/// Load a CSV history with a header of `time,open,high,low,close`.
pub fn load_csv(path: &Path) -> Result<Vec<Candle>, AppError> {
    if !path.exists() {
        return Err(AppError::FileNotFound(format!(
            "Historical CSV not found at {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AppError::FileRead(format!("Cannot open {}: {}", path.display(), e)))?;

    let mut candles = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row_num = i + 1;
        let row = result.map_err(|e| AppError::CsvParseError {
            row: row_num,
            message: e.to_string(),
        })?;
        let datetime = parse_timestamp(&row.time).ok_or_else(|| AppError::CsvParseError {
            row: row_num,
            message: format!("unrecognized timestamp '{}'", row.time),
        })?;
        candles.push(Candle {
            datetime,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
        });
    }

    info!("Loaded {} candles from {}", candles.len(), path.display());
    Ok(candles)
}

/// Parse RFC 3339, a naive `YYYY-MM-DD HH:MM[:SS]` form, or epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}
