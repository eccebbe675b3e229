//! Rolling mean volume.
//!
//! Mean of the trailing `window` volumes, using whatever partial window is
//! available at the start of the series so there is no warm-up gap.

use crate::IndicatorSeries;
use core_types::Candle;
use rust_decimal::Decimal;

pub fn rolling_mean_volume(candles: &[Candle], window: usize) -> IndicatorSeries {
    assert!(window >= 1, "volume window must be >= 1");
    let mut result = Vec::with_capacity(candles.len());
    let mut sum = Decimal::ZERO;

    for (i, candle) in candles.iter().enumerate() {
        sum += candle.volume;
        if i >= window {
            sum -= candles[i - window].volume;
        }
        let count = Decimal::from(i.min(window - 1) as u64 + 1);
        result.push(Some(sum / count));
    }

    result
}
