use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::result::BacktestOutcome;
use crate::models::signal::Signal;

pub const STATUS_LIVE: &str = "btcw-api live";
pub const NO_SIGNAL_MSG: &str = "no valid wick now";

/// Body of the health route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

/// Body of the signal route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignalResponse {
    /// `BUY`, `SELL` or `NONE`.
    pub direction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Open time of the bar the position would be opened in.
    pub bar_time: DateTime<Utc>,
    /// When the response was generated.
    pub timestamp: DateTime<Utc>,
}

/// Body of the backtest route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BacktestResponse {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
}

pub fn status_response() -> StatusResponse {
    StatusResponse {
        status: STATUS_LIVE.to_string(),
    }
}

pub fn signal_response(signal: &Signal, generated_at: DateTime<Utc>) -> SignalResponse {
    let direction = signal.direction_label().to_string();
    let bar_time = signal.timestamp();
    match *signal {
        Signal::Buy {
            entry,
            stop_loss,
            take_profit,
            ..
        }
        | Signal::Sell {
            entry,
            stop_loss,
            take_profit,
            ..
        } => SignalResponse {
            direction,
            entry: Some(entry),
            sl: Some(stop_loss),
            tp: Some(take_profit),
            msg: None,
            bar_time,
            timestamp: generated_at,
        },
        Signal::None { .. } => SignalResponse {
            direction,
            entry: None,
            sl: None,
            tp: None,
            msg: Some(NO_SIGNAL_MSG.to_string()),
            bar_time,
            timestamp: generated_at,
        },
    }
}

impl From<&BacktestOutcome> for BacktestResponse {
    fn from(outcome: &BacktestOutcome) -> Self {
        BacktestResponse {
            trades: outcome.trades,
            wins: outcome.wins,
            losses: outcome.losses,
            win_rate: outcome.win_rate,
        }
    }
}
