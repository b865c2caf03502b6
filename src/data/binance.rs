use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::candle::Candle;
use crate::models::config::SourceConfig;

use super::provider::CandleProvider;

/// Downloads the most recent klines from a Binance-compatible REST endpoint.
/// Public market data, no API key.
pub struct BinanceProvider {
    client: Client,
    source: SourceConfig,
}

impl BinanceProvider {
    pub fn new(source: SourceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(source.timeout_secs))
            .build()?;
        Ok(Self { client, source })
    }

    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("symbol", self.source.symbol.clone()),
            ("interval", self.source.interval.clone()),
            ("limit", self.source.limit.to_string()),
        ]
    }
}

#[async_trait]
impl CandleProvider for BinanceProvider {
    async fn fetch_candles(&self) -> Result<Vec<Candle>, AppError> {
        info!(
            "Fetching {} {} klines for {}",
            self.source.limit, self.source.interval, self.source.symbol
        );

        let response = self
            .client
            .get(&self.source.base_url)
            .query(&self.query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(AppError::UpstreamUnavailable(format!(
                "kline request returned {}: {}",
                status, body
            )));
        }

        let rows: Vec<Value> = response.json().await?;
        let candles = parse_klines(&rows)?;
        debug!("Received {} klines", candles.len());
        Ok(candles)
    }

    fn describe(&self) -> String {
        format!("binance({} {})", self.source.symbol, self.source.interval)
    }
}

/// Parse kline rows: `[open_time_ms, "open", "high", "low", "close", ...]`.
pub fn parse_klines(rows: &[Value]) -> Result<Vec<Candle>, AppError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            parse_kline(row).ok_or_else(|| {
                AppError::UpstreamUnavailable(format!("malformed kline at position {}: {}", i, row))
            })
        })
        .collect()
}

fn parse_kline(row: &Value) -> Option<Candle> {
    let arr = row.as_array()?;
    if arr.len() < 5 {
        return None;
    }
    let open_time_ms = arr[0].as_i64()?;
    Some(Candle {
        datetime: DateTime::<Utc>::from_timestamp_millis(open_time_ms)?,
        open: price_field(&arr[1])?,
        high: price_field(&arr[2])?,
        low: price_field(&arr[3])?,
        close: price_field(&arr[4])?,
    })
}

/// Binance quotes prices as strings; plain numbers are accepted too.
fn price_field(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
