use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::candle::{Candle, IndicatorCandle};
use crate::models::config::StrategyConfig;
use crate::models::signal::{Setup, Signal, TradeDirection};

use super::indicators::{body, check_data_len, lower_wick, trend_down, trend_up, upper_wick, with_ema};
use super::round2;

/// Minimum wick-to-body ratio for a rejection candle.
pub const WICK_BODY_RATIO: f64 = 0.5;

/// Bars needed to evaluate one `(prev, cur)` pair.
pub const MIN_BARS: usize = 2;

/// Uptrend bar whose lower wick pierced the EMA and closed back above it.
pub fn is_long_setup(prev: &IndicatorCandle) -> bool {
    let c = &prev.candle;
    trend_up(prev)
        && lower_wick(c) / body(c) > WICK_BODY_RATIO
        && c.low < prev.ema
        && prev.ema <= c.close
}

/// Downtrend bar whose upper wick pierced the EMA and closed back below it.
pub fn is_short_setup(prev: &IndicatorCandle) -> bool {
    let c = &prev.candle;
    trend_down(prev)
        && upper_wick(c) / body(c) > WICK_BODY_RATIO
        && c.high > prev.ema
        && prev.ema >= c.close
}

/// Classify the reference bar. Long is checked before short.
///
/// A close sitting exactly on the EMA is neither trend, so it never
/// produces a setup.
pub fn classify(prev: &IndicatorCandle) -> Option<TradeDirection> {
    if is_long_setup(prev) {
        Some(TradeDirection::Long)
    } else if is_short_setup(prev) {
        Some(TradeDirection::Short)
    } else {
        None
    }
}

/// Detect a setup on `prev` and price it at the open of `cur`.
pub fn detect_setup(
    prev: &IndicatorCandle,
    cur: &Candle,
    config: &StrategyConfig,
) -> Option<Setup> {
    let direction = classify(prev)?;
    let entry = cur.open;
    let reward = config.stop_usd * config.take_profit_factor;
    let (stop_loss, take_profit) = match direction {
        TradeDirection::Long => (entry - config.stop_usd, entry + reward),
        TradeDirection::Short => (entry + config.stop_usd, entry - reward),
    };
    Some(Setup {
        direction,
        entry,
        stop_loss,
        take_profit,
    })
}

/// Turn a detection result into a cent-rounded [`Signal`].
pub fn to_signal(setup: Option<Setup>, timestamp: DateTime<Utc>) -> Signal {
    match setup {
        Some(s) => {
            let entry = round2(s.entry);
            let stop_loss = round2(s.stop_loss);
            let take_profit = round2(s.take_profit);
            match s.direction {
                TradeDirection::Long => Signal::Buy {
                    entry,
                    stop_loss,
                    take_profit,
                    timestamp,
                },
                TradeDirection::Short => Signal::Sell {
                    entry,
                    stop_loss,
                    take_profit,
                    timestamp,
                },
            }
        }
        None => Signal::None { timestamp },
    }
}

/// Evaluate the last two bars of `candles`.
///
/// The EMA is computed over the whole window; the second-to-last bar is the
/// reference bar and the last bar supplies the entry price and timestamp.
pub fn compute_signal(candles: &[Candle], config: &StrategyConfig) -> Result<Signal, AppError> {
    config.validate()?;
    check_data_len(candles.len(), MIN_BARS)?;

    let bars = with_ema(candles, config.ema_span)?;
    let prev = &bars[bars.len() - 2];
    let cur = &bars[bars.len() - 1];

    let setup = detect_setup(prev, &cur.candle, config);
    Ok(to_signal(setup, cur.candle.datetime))
}
