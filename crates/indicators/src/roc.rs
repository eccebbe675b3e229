//! Rate of change.
//!
//! ROC(t) = (close_t / close_{t-period} - 1) * 100, in percent.
//! Undefined for the first `period` bars.

use crate::IndicatorSeries;
use core_types::Candle;
use rust_decimal::Decimal;

pub fn roc(candles: &[Candle], period: usize) -> IndicatorSeries {
    assert!(period >= 1, "ROC period must be >= 1");
    let hundred = Decimal::from(100);

    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            if i < period {
                return None;
            }
            let base = candles[i - period].close;
            if base.is_zero() {
                return None;
            }
            Some((candle.close / base - Decimal::ONE) * hundred)
        })
        .collect()
}
