use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::data::provider::CandleProvider;
use crate::data::validator::validate_candles;
use crate::engine::{executor, strategy};
use crate::errors::AppError;
use crate::models::candle::Candle;
use crate::models::config::StrategyConfig;
use crate::utils::export;
use crate::utils::report::{self, BacktestResponse, SignalResponse, StatusResponse};

// ── Status ──

/// Health check for the root route.
pub fn status() -> StatusResponse {
    report::status_response()
}

// ── Signal ──

/// Fetch the most recent window and evaluate the wick-rejection rule on it.
pub async fn signal(
    provider: &dyn CandleProvider,
    config: &StrategyConfig,
) -> Result<SignalResponse, AppError> {
    let candles = load(provider).await?;
    let signal = strategy::compute_signal(&candles, config)?;
    info!(
        "Signal {} from {} ({} candles)",
        signal.direction_label(),
        provider.describe(),
        candles.len()
    );
    Ok(report::signal_response(&signal, Utc::now()))
}

// ── Backtest ──

/// Replay the rule over a stored history.
pub async fn backtest(
    provider: &dyn CandleProvider,
    config: &StrategyConfig,
) -> Result<BacktestResponse, AppError> {
    let candles = load(provider).await?;
    let outcome = executor::run_backtest(&candles, config)?;
    info!(
        "Backtest complete: {} trades, {} wins, {} losses, win rate {:.2}%",
        outcome.trades, outcome.wins, outcome.losses, outcome.win_rate
    );
    Ok(BacktestResponse::from(&outcome))
}

/// Backtest and write the per-setup log to `export_path` as CSV.
pub async fn backtest_with_export(
    provider: &dyn CandleProvider,
    config: &StrategyConfig,
    export_path: &Path,
) -> Result<BacktestResponse, AppError> {
    let candles = load(provider).await?;
    let report = executor::run_backtest_detailed(&candles, config)?;
    export::write_setups_csv(&report.setups, export_path)?;
    info!(
        "Backtest complete: {} setups exported to {}",
        report.setups.len(),
        export_path.display()
    );
    Ok(BacktestResponse::from(&report.outcome))
}

// ── Reports ──

/// Persist a response body as pretty JSON at `path`.
pub fn save_report<T: Serialize>(response: &T, path: &Path) -> Result<(), AppError> {
    export::write_report_json(response, path)?;
    info!("Report written to {}", path.display());
    Ok(())
}

async fn load(provider: &dyn CandleProvider) -> Result<Vec<Candle>, AppError> {
    let candles = provider.fetch_candles().await.map_err(|e| {
        warn!("Provider {} failed: {}", provider.describe(), e);
        e
    })?;
    validate_candles(&candles)?;
    Ok(candles)
}
