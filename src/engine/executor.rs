use crate::errors::AppError;
use crate::models::candle::Candle;
use crate::models::config::StrategyConfig;
use crate::models::result::{BacktestOutcome, BacktestReport, SetupRecord};
use crate::models::signal::TradeDirection;

use super::indicators::{check_data_len, with_ema};
use super::round2;
use super::strategy::{detect_setup, MIN_BARS};

/// Replay the detector over a stored history and tally wins and losses.
pub fn run_backtest(candles: &[Candle], config: &StrategyConfig) -> Result<BacktestOutcome, AppError> {
    simulate(candles, config, |_| {})
}

/// Same as [`run_backtest`], also returning one record per detected setup.
pub fn run_backtest_detailed(
    candles: &[Candle],
    config: &StrategyConfig,
) -> Result<BacktestReport, AppError> {
    let mut setups = Vec::new();
    let outcome = simulate(candles, config, |record| setups.push(record))?;
    Ok(BacktestReport { outcome, setups })
}

/// Every adjacent pair `(bar[i-1], bar[i])` is evaluated independently.
///
/// The resolution bar is `bar[i]` itself, the same bar that supplies the
/// entry. The loss threshold is keyed off the reference bar's extreme
/// (`low - stop` for longs, `high + stop` for shorts), not off the entry.
/// Target and loss are scored separately, so one bar can add to both.
fn simulate(
    candles: &[Candle],
    config: &StrategyConfig,
    mut on_setup: impl FnMut(SetupRecord),
) -> Result<BacktestOutcome, AppError> {
    config.validate()?;
    check_data_len(candles.len(), MIN_BARS)?;

    let bars = with_ema(candles, config.ema_span)?;

    let mut wins = 0usize;
    let mut losses = 0usize;

    for pair in bars.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1].candle);
        let Some(setup) = detect_setup(prev, cur, config) else {
            continue;
        };

        let (loss_threshold, hit_target, hit_loss) = match setup.direction {
            TradeDirection::Long => {
                let threshold = prev.candle.low - config.stop_usd;
                (threshold, cur.low <= setup.take_profit, cur.low >= threshold)
            }
            TradeDirection::Short => {
                let threshold = prev.candle.high + config.stop_usd;
                (threshold, cur.high >= setup.take_profit, cur.high <= threshold)
            }
        };

        wins += usize::from(hit_target);
        losses += usize::from(hit_loss);

        on_setup(SetupRecord {
            datetime: cur.datetime,
            direction: setup.direction,
            entry: setup.entry,
            take_profit: setup.take_profit,
            loss_threshold,
            hit_target,
            hit_loss,
        });
    }

    Ok(finalize(wins, losses))
}

fn finalize(wins: usize, losses: usize) -> BacktestOutcome {
    let trades = wins + losses;
    let win_rate = if trades > 0 {
        round2(wins as f64 / trades as f64 * 100.0)
    } else {
        0.0
    };
    BacktestOutcome {
        trades,
        wins,
        losses,
        win_rate,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn series(bars: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
        bars.iter()
            .enumerate()
            .map(|(i, &(o, h, l, c))| Candle {
                datetime: t0() + Duration::minutes(i as i64),
                open: o,
                high: h,
                low: l,
                close: c,
            })
            .collect()
    }

    /// Flat history followed by a long rejection bar, ready for a resolution bar.
    fn long_history() -> Vec<(f64, f64, f64, f64)> {
        let mut bars = vec![(98.9, 98.9, 98.9, 98.9); 58];
        bars.push((100.0, 101.0, 97.0, 100.5));
        bars
    }

    fn short_history() -> Vec<(f64, f64, f64, f64)> {
        let mut bars = vec![(101.1, 101.1, 101.1, 101.1); 58];
        bars.push((100.0, 103.0, 99.5, 99.5));
        bars
    }

    #[test]
    fn test_flat_series_has_no_trades() {
        for len in [2usize, 3, 60, 500] {
            let candles = series(&vec![(100.0, 100.0, 100.0, 100.0); len]);
            let outcome = run_backtest(&candles, &StrategyConfig::default()).unwrap();
            assert_eq!(outcome, BacktestOutcome::default(), "len {}", len);
            assert_eq!(outcome.win_rate, 0.0);
        }
    }

    #[test]
    fn test_long_resolution_bar_counts_both() {
        let mut bars = long_history();
        bars.push((101.0, 102.0, 100.0, 101.5));
        let candles = series(&bars);

        let outcome = run_backtest(&candles, &StrategyConfig::default()).unwrap();
        assert_eq!(outcome.wins, 1);
        assert_eq!(outcome.losses, 1);
        assert_eq!(outcome.trades, 2);
        assert_eq!(outcome.win_rate, 50.0);
    }

    #[test]
    fn test_long_loss_threshold_uses_reference_low() {
        // Low of 46 breaches the live stop (entry 101 - 50 = 51) and the
        // reference-bar threshold (97 - 50 = 47), so no loss is scored.
        let mut bars = long_history();
        bars.push((101.0, 102.0, 46.0, 101.5));
        let candles = series(&bars);

        let report = run_backtest_detailed(&candles, &StrategyConfig::default()).unwrap();
        assert_eq!(report.outcome.wins, 1);
        assert_eq!(report.outcome.losses, 0);
        assert_eq!(report.outcome.win_rate, 100.0);

        let record = &report.setups[0];
        assert_eq!(record.direction, TradeDirection::Long);
        assert_eq!(record.entry, 101.0);
        assert_eq!(record.take_profit, 176.0);
        assert_eq!(record.loss_threshold, 47.0);
        assert!(record.hit_target);
        assert!(!record.hit_loss);
        assert_eq!(record.datetime, candles[59].datetime);
    }

    #[test]
    fn test_short_resolution_bar_counts_both() {
        let mut bars = short_history();
        bars.push((99.0, 99.5, 98.0, 98.5));
        let candles = series(&bars);

        let report = run_backtest_detailed(&candles, &StrategyConfig::default()).unwrap();
        assert_eq!(report.outcome.wins, 1);
        assert_eq!(report.outcome.losses, 1);

        let record = &report.setups[0];
        assert_eq!(record.direction, TradeDirection::Short);
        assert_eq!(record.take_profit, 24.0);
        assert_eq!(record.loss_threshold, 153.0);
    }

    #[test]
    fn test_short_loss_threshold_uses_reference_high() {
        let mut bars = short_history();
        bars.push((99.0, 160.0, 98.0, 98.5));
        let candles = series(&bars);

        let outcome = run_backtest(&candles, &StrategyConfig::default()).unwrap();
        assert_eq!(outcome.wins, 1);
        assert_eq!(outcome.losses, 0);
    }

    #[test]
    fn test_win_rate_rounded() {
        let mut bars = long_history();
        bars.push((101.0, 102.0, 100.0, 101.5));
        bars.push((101.5, 102.0, 98.0, 101.8));
        bars.push((102.0, 103.0, 40.0, 102.5));
        let candles = series(&bars);

        let report = run_backtest_detailed(&candles, &StrategyConfig::default()).unwrap();
        assert_eq!(report.setups.len(), 2);
        assert_eq!(report.outcome.wins, 2);
        assert_eq!(report.outcome.losses, 1);
        assert_eq!(report.outcome.trades, 3);
        assert_eq!(report.outcome.win_rate, 66.67);
    }

    #[test]
    fn test_detailed_matches_plain_outcome() {
        let mut bars = short_history();
        bars.push((99.0, 99.5, 98.0, 98.5));
        bars.extend(long_history());
        bars.push((101.0, 102.0, 100.0, 101.5));
        let candles = series(&bars);
        let cfg = StrategyConfig::default();

        let plain = run_backtest(&candles, &cfg).unwrap();
        let detailed = run_backtest_detailed(&candles, &cfg).unwrap();
        assert_eq!(plain, detailed.outcome);
    }

    #[test]
    fn test_requires_two_bars() {
        let one = series(&[(100.0, 101.0, 99.0, 100.0)]);
        assert!(matches!(
            run_backtest(&one, &StrategyConfig::default()),
            Err(AppError::InsufficientData { needed: 2, available: 1 })
        ));
        assert!(matches!(
            run_backtest(&[], &StrategyConfig::default()),
            Err(AppError::InsufficientData { needed: 2, available: 0 })
        ));
    }
}
