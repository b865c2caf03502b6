use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Parameters of the wick-rejection rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Span of the EMA of closes.
    pub ema_span: usize,
    /// Stop distance in quote currency.
    pub stop_usd: f64,
    /// Reward multiple of the stop distance.
    pub take_profit_factor: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            ema_span: 50,
            stop_usd: 50.0,
            take_profit_factor: 1.5,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.ema_span == 0 {
            return Err(AppError::InvalidConfig("ema_span must be > 0".into()));
        }
        if !(self.stop_usd.is_finite() && self.stop_usd > 0.0) {
            return Err(AppError::InvalidConfig(format!(
                "stop_usd must be a positive number, got {}",
                self.stop_usd
            )));
        }
        if !(self.take_profit_factor.is_finite() && self.take_profit_factor > 0.0) {
            return Err(AppError::InvalidConfig(format!(
                "take_profit_factor must be a positive number, got {}",
                self.take_profit_factor
            )));
        }
        Ok(())
    }
}

/// Where and how recent candles are downloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Kline endpoint; symbol, interval and limit are sent as query params.
    pub base_url: String,
    pub symbol: String,
    pub interval: String,
    /// Number of most recent candles to request.
    pub limit: u32,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data.binance.com/api/v3/klines".into(),
            symbol: "BTCUSDT".into(),
            interval: "1m".into(),
            limit: 60,
            timeout_secs: 10,
        }
    }
}

/// Full application configuration, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub strategy: StrategyConfig,
    pub source: SourceConfig,
    /// Stored 1-minute history used by the backtest.
    pub history_csv: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::default(),
            source: SourceConfig::default(),
            history_csv: PathBuf::from("/app/btc_m1.csv"),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(AppError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.strategy.validate()?;
        if self.source.limit < 2 {
            return Err(AppError::InvalidConfig(format!(
                "source.limit must be at least 2, got {}",
                self.source.limit
            )));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "source.timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }
}
