//! Average true range.
//!
//! True range = max(high - low, |high - prev_close|, |low - prev_close|);
//! the first bar has no previous close and uses high - low alone. ATR is
//! the exponential average (alpha = 1/period) of the true range, seeded
//! from the first bar's range and clamped to >= 0.

use crate::IndicatorSeries;
use core_types::Candle;
use rust_decimal::Decimal;

pub fn atr(candles: &[Candle], period: usize) -> IndicatorSeries {
    assert!(period >= 1, "ATR period must be >= 1");
    let mut result = Vec::with_capacity(candles.len());
    if candles.is_empty() {
        return result;
    }

    let alpha = Decimal::ONE / Decimal::from(period as u64);
    let mut current = true_range(&candles[0], None);
    result.push(Some(current.max(Decimal::ZERO)));

    for i in 1..candles.len() {
        let tr = true_range(&candles[i], Some(candles[i - 1].close));
        current = alpha * tr + (Decimal::ONE - alpha) * current;
        result.push(Some(current.max(Decimal::ZERO)));
    }

    result
}

fn true_range(candle: &Candle, prev_close: Option<Decimal>) -> Decimal {
    let range = candle.high - candle.low;
    match prev_close {
        Some(prev) => range
            .max((candle.high - prev).abs())
            .max((candle.low - prev).abs()),
        None => range,
    }
}
