//! Suppliers of ordered candle sequences.
//!
//! The engine never performs I/O itself; handlers obtain candles through a
//! [`CandleProvider`] and pass the resulting slice on. The trait is object
//! safe, so handlers take `&dyn CandleProvider` and tests substitute
//! in-memory fakes.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::candle::Candle;

#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// Candles ordered by ascending open time.
    async fn fetch_candles(&self) -> Result<Vec<Candle>, AppError>;

    /// Short label used in logs.
    fn describe(&self) -> String;
}

/// Fixed in-memory sequence, handy for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    candles: Vec<Candle>,
}

impl StaticProvider {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }
}

#[async_trait]
impl CandleProvider for StaticProvider {
    async fn fetch_candles(&self) -> Result<Vec<Candle>, AppError> {
        Ok(self.candles.clone())
    }

    fn describe(&self) -> String {
        format!("static({} candles)", self.candles.len())
    }
}
