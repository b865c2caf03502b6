use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a detected setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Long,
    Short,
}

/// Unrounded trade levels produced by the detector for one bar pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setup {
    pub direction: TradeDirection,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Outcome of evaluating the most recent bar pair. Prices are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Buy {
        entry: f64,
        stop_loss: f64,
        take_profit: f64,
        timestamp: DateTime<Utc>,
    },
    Sell {
        entry: f64,
        stop_loss: f64,
        take_profit: f64,
        timestamp: DateTime<Utc>,
    },
    None {
        timestamp: DateTime<Utc>,
    },
}

impl Signal {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Signal::Buy { timestamp, .. }
            | Signal::Sell { timestamp, .. }
            | Signal::None { timestamp } => *timestamp,
        }
    }

    pub fn direction_label(&self) -> &'static str {
        match self {
            Signal::Buy { .. } => "BUY",
            Signal::Sell { .. } => "SELL",
            Signal::None { .. } => "NONE",
        }
    }
}
