use crate::errors::AppError;
use crate::models::candle::Candle;

/// Reject candles the engine cannot reason about.
///
/// Every price must be finite and positive and open times must be strictly
/// increasing. High/low against the body is not checked; such bars only
/// produce meaningless wick ratios.
pub fn validate_candles(candles: &[Candle]) -> Result<(), AppError> {
    for (index, c) in candles.iter().enumerate() {
        for (field, value) in [
            ("open", c.open),
            ("high", c.high),
            ("low", c.low),
            ("close", c.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::MalformedBar {
                    index,
                    reason: format!("{} price {} is not a positive number", field, value),
                });
            }
        }

        if index > 0 && c.datetime <= candles[index - 1].datetime {
            return Err(AppError::MalformedBar {
                index,
                reason: format!(
                    "timestamp {} does not follow {}",
                    c.datetime,
                    candles[index - 1].datetime
                ),
            });
        }
    }
    Ok(())
}
