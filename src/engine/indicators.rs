use crate::errors::AppError;
use crate::models::candle::{Candle, IndicatorCandle};

/// Added to the body so a doji never divides by zero.
pub const WICK_EPSILON: f64 = 1e-6;

/// Attach an EMA of closes to every candle of the window.
pub fn with_ema(candles: &[Candle], span: usize) -> Result<Vec<IndicatorCandle>, AppError> {
    check_data_len(candles.len(), 1)?;
    if span == 0 {
        return Err(AppError::InvalidConfig("ema_span must be > 0".into()));
    }

    let close: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let values = ema(&close, span);

    Ok(candles
        .iter()
        .zip(values)
        .map(|(candle, ema)| IndicatorCandle {
            candle: *candle,
            ema,
        })
        .collect())
}

pub(crate) fn check_data_len(available: usize, needed: usize) -> Result<(), AppError> {
    if available < needed {
        return Err(AppError::InsufficientData { needed, available });
    }
    Ok(())
}

// ── EMA ──

/// Exponential Moving Average, seeded with the first value and no
/// warm-up period: `ema[0] = data[0]`, `ema[i] = data[i]*α + ema[i-1]*(1-α)`
/// with `α = 2/(span+1)`. Empty input or `span == 0` yields an empty vector.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return Vec::new();
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    let mut prev = data[0];
    result.push(prev);
    for &value in &data[1..] {
        prev = value * alpha + prev * (1.0 - alpha);
        result.push(prev);
    }
    result
}

// ── Wick geometry ──

/// Absolute body size plus [`WICK_EPSILON`].
pub fn body(c: &Candle) -> f64 {
    (c.close - c.open).abs() + WICK_EPSILON
}

pub fn upper_wick(c: &Candle) -> f64 {
    c.high - c.open.max(c.close)
}

pub fn lower_wick(c: &Candle) -> f64 {
    c.open.min(c.close) - c.low
}

pub fn trend_up(bar: &IndicatorCandle) -> bool {
    bar.candle.close > bar.ema
}

pub fn trend_down(bar: &IndicatorCandle) -> bool {
    bar.candle.close < bar.ema
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════
