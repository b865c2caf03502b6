use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::TradeDirection;

/// Aggregate win/loss counters of a backtest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    /// Always `wins + losses`; a bar that fires both conditions counts twice.
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage rounded to 2 decimals, 0 when there are no trades.
    pub win_rate: f64,
}

/// One detected setup and how its resolution bar scored it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupRecord {
    /// Open time of the resolution bar.
    pub datetime: DateTime<Utc>,
    pub direction: TradeDirection,
    pub entry: f64,
    pub take_profit: f64,
    /// Loss threshold keyed off the reference bar's extreme.
    pub loss_threshold: f64,
    pub hit_target: bool,
    pub hit_loss: bool,
}

/// Outcome plus the per-setup log used for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub outcome: BacktestOutcome,
    pub setups: Vec<SetupRecord>,
}
