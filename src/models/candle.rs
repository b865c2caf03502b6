use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLC candle/bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A candle together with the EMA of closes computed over its window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorCandle {
    pub candle: Candle,
    pub ema: f64,
}
