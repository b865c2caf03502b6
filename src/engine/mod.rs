pub mod executor;
pub mod indicators;
pub mod strategy;

/// Round to cents (2 decimals), half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
