use std::path::Path;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::result::SetupRecord;

/// Write the per-setup backtest log to a CSV file.
pub fn write_setups_csv(setups: &[SetupRecord], path: &Path) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::FileWrite(format!("Cannot create CSV: {}", e)))?;

    wtr.write_record([
        "Time",
        "Direction",
        "Entry",
        "Take Profit",
        "Loss Threshold",
        "Hit Target",
        "Hit Loss",
    ])
    .map_err(|e| AppError::FileWrite(e.to_string()))?;

    for s in setups {
        wtr.write_record([
            &s.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            &format!("{:?}", s.direction),
            &format!("{:.2}", s.entry),
            &format!("{:.2}", s.take_profit),
            &format!("{:.2}", s.loss_threshold),
            &s.hit_target.to_string(),
            &s.hit_loss.to_string(),
        ])
        .map_err(|e| AppError::FileWrite(e.to_string()))?;
    }

    wtr.flush().map_err(|e| AppError::FileWrite(e.to_string()))?;
    Ok(())
}

/// Write any response body as pretty-printed JSON.
pub fn write_report_json<T: Serialize>(value: &T, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)
        .map_err(|e| AppError::FileWrite(format!("Cannot write {}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::signal::TradeDirection;

    fn record() -> SetupRecord {
        SetupRecord {
            datetime: Utc.with_ymd_and_hms(2024, 3, 1, 0, 59, 0).unwrap(),
            direction: TradeDirection::Long,
            entry: 101.0,
            take_profit: 176.0,
            loss_threshold: 47.0,
            hit_target: true,
            hit_loss: false,
        }
    }

    #[test]
    fn test_write_setups_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setups.csv");
        write_setups_csv(&[record()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("Time,Direction,Entry,Take Profit,Loss Threshold,Hit Target,Hit Loss")
        );
        assert_eq!(
            lines.next(),
            Some("2024-03-01 00:59:00,Long,101.00,176.00,47.00,true,false")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&record(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["direction"], "Long");
        assert_eq!(value["hit_target"], true);
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let err = write_setups_csv(&[], Path::new("/nonexistent/dir/setups.csv")).unwrap_err();
        assert!(matches!(err, AppError::FileWrite(_)));
    }
}
