//! Exponential moving average.
//!
//! Smoothing factor alpha = 2 / (period + 1). The first value is seeded
//! from the first observation, not from a simple-average window, so the
//! series is defined from bar 0 with no lookahead.

use crate::IndicatorSeries;
use core_types::Candle;
use rust_decimal::Decimal;

pub fn ema(candles: &[Candle], period: usize) -> IndicatorSeries {
    assert!(period >= 1, "EMA period must be >= 1");
    let mut result = Vec::with_capacity(candles.len());
    if candles.is_empty() {
        return result;
    }

    let alpha = Decimal::from(2) / Decimal::from(period as u64 + 1);
    let mut current = candles[0].close;
    result.push(Some(current));

    for candle in &candles[1..] {
        current = alpha * candle.close + (Decimal::ONE - alpha) * current;
        result.push(Some(current));
    }

    result
}
