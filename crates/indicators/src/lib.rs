//! Indicator computation over candle series.
//!
//! Every function here is pure: it reads a `CandleSeries` and produces a new
//! vector aligned 1:1 with the source candles, never mutating the source.
//! A value that cannot be computed yet (insufficient history) is `None`,
//! and stays `None` for consumers — it is never coerced to zero.

pub mod atr;
pub mod ema;
pub mod error;
pub mod merge;
pub mod roc;
pub mod rsi;
pub mod volume;

pub use atr::atr;
pub use ema::ema;
pub use error::IndicatorError;
pub use merge::merge_asof;
pub use roc::roc;
pub use rsi::rsi;
pub use volume::rolling_mean_volume;

use configuration::IndicatorSettings;
use core_types::CandleSeries;
use rust_decimal::Decimal;

/// A series of indicator values aligned to a candle series.
pub type IndicatorSeries = Vec<Option<Decimal>>;

/// The full indicator bundle for one candle series, computed in a single
/// pass per refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub ema: IndicatorSeries,
    pub roc: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub atr: IndicatorSeries,
    pub volume_mean: IndicatorSeries,
}

impl IndicatorSet {
    /// Computes all indicator columns for `series`.
    pub fn compute(
        series: &CandleSeries,
        settings: &IndicatorSettings,
    ) -> Result<Self, IndicatorError> {
        for (name, period) in [
            ("ema_period", settings.ema_period),
            ("roc_period", settings.roc_period),
            ("rsi_period", settings.rsi_period),
            ("atr_period", settings.atr_period),
            ("volume_window", settings.volume_window),
        ] {
            if period == 0 {
                return Err(IndicatorError::InvalidPeriod(name.to_string()));
            }
        }

        let candles = series.candles();
        Ok(Self {
            ema: ema(candles, settings.ema_period),
            roc: roc(candles, settings.roc_period),
            rsi: rsi(candles, settings.rsi_period),
            atr: atr(candles, settings.atr_period),
            volume_mean: rolling_mean_volume(candles, settings.volume_window),
        })
    }

    pub fn len(&self) -> usize {
        self.ema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema.is_empty()
    }
}
