//! Relative Strength Index.
//!
//! Gains and losses are smoothed with an exponential average
//! (alpha = 1/period), not a simple moving average. The smoothed averages
//! are seeded from the first delta and considered defined only once
//! `period` deltas have been observed; RSI is `None` before that.
//!
//! Edge cases, in priority order:
//! - smoothed averages undefined -> RSI undefined
//! - avg_loss == 0 and avg_gain > 0 -> 100
//! - avg_loss == 0 and avg_gain == 0 -> 50
//! - avg_gain == 0 -> 0
//! - otherwise 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! The result is clamped to [0, 100] as a final safety net.

use crate::IndicatorSeries;
use core_types::Candle;
use rust_decimal::Decimal;

pub fn rsi(candles: &[Candle], period: usize) -> IndicatorSeries {
    assert!(period >= 1, "RSI period must be >= 1");
    let n = candles.len();
    let mut result = vec![None; n];
    if n < 2 {
        return result;
    }

    let alpha = Decimal::ONE / Decimal::from(period as u64);
    let mut avg_gain: Option<Decimal> = None;
    let mut avg_loss: Option<Decimal> = None;

    for i in 1..n {
        let delta = candles[i].close - candles[i - 1].close;
        let gain = delta.max(Decimal::ZERO);
        let loss = (-delta).max(Decimal::ZERO);

        avg_gain = Some(match avg_gain {
            Some(prev) => alpha * gain + (Decimal::ONE - alpha) * prev,
            None => gain,
        });
        avg_loss = Some(match avg_loss {
            Some(prev) => alpha * loss + (Decimal::ONE - alpha) * prev,
            None => loss,
        });

        // `period` deltas are needed before the smoothed averages count as
        // defined.
        if i < period {
            continue;
        }

        if let (Some(gain_avg), Some(loss_avg)) = (avg_gain, avg_loss) {
            result[i] = Some(rsi_value(gain_avg, loss_avg));
        }
    }

    result
}

fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    let hundred = Decimal::from(100);
    let value = if avg_loss.is_zero() && avg_gain > Decimal::ZERO {
        hundred
    } else if avg_loss.is_zero() && avg_gain.is_zero() {
        Decimal::from(50)
    } else if avg_gain.is_zero() {
        Decimal::ZERO
    } else {
        hundred - hundred / (Decimal::ONE + avg_gain / avg_loss)
    };
    value.clamp(Decimal::ZERO, hundred)
}
