use crate::enums::{ExitReason, Timeframe};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// An ordered-by-time candle sequence for one (pair, timeframe).
///
/// Immutable once produced; indicator computation copies from it and
/// never writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub pair: String,
    pub timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Builds a series, rejecting candles that are not in ascending time order.
    pub fn new(
        pair: impl Into<String>,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> Result<Self, CoreError> {
        let pair = pair.into();
        if candles.windows(2).any(|w| w[1].open_time <= w[0].open_time) {
            return Err(CoreError::UnsortedSeries(pair));
        }
        Ok(Self {
            pair,
            timeframe,
            candles,
        })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.candles.iter().map(|c| c.open_time)
    }
}

/// The minimal snapshot the entry signal generator needs for one evaluation.
///
/// Indicator-derived fields are `None` while there is insufficient history;
/// consumers must treat `None` as "condition not met", never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Higher-timeframe close and EMA50, as-of joined onto the base bar.
    pub htf_close: Option<Decimal>,
    pub htf_ema: Option<Decimal>,
    /// Base-timeframe close and EMA50.
    pub close: Decimal,
    pub ema: Option<Decimal>,
    pub roc: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub volume: Decimal,
    /// Rolling 24h mean volume.
    pub volume_mean_24h: Option<Decimal>,
}

/// One exchange snapshot row for a tradable pair, consumed by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairData {
    pub symbol: String,
    pub price: Decimal,
    /// (ask - bid) / ask, as a fraction.
    pub spread_ratio: Decimal,
    pub quote_volume: Decimal,
    /// Recent high/low range relative to price, as a percentage.
    pub volatility: Decimal,
    /// Return over the last 60 minutes, as a percentage.
    pub return_60m: Decimal,
}

/// An open trade, owned by the strategy runtime and mutated each bar by
/// the risk managers until it is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub pair: String,
    pub entry_time: DateTime<Utc>,
    pub entry_price: Decimal,
    /// Quote-currency stake debited at entry.
    pub stake: Decimal,
    /// Base-currency amount actually held after fees.
    pub amount: Decimal,
    pub stop_loss: Decimal,
    /// `Some` once the trailing stop has activated. The level only ratchets
    /// upward for the life of the position.
    pub trailing_stop: Option<Decimal>,
}

impl Position {
    pub fn trailing_active(&self) -> bool {
        self.trailing_stop.is_some()
    }
}

/// A trade record. `exit_*` fields are `None` while the trade is open and
/// are set exactly once when the exit is recorded; the record is never
/// mutated after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: Uuid,
    pub pair: String,
    pub entry_time: DateTime<Utc>,
    pub entry_price: Decimal,
    pub stake: Decimal,
    pub amount: Decimal,
    pub exit_time: Option<DateTime<Utc>>,
    pub exit_price: Option<Decimal>,
    pub exit_reason: Option<ExitReason>,
    /// Total entry + exit fees in quote currency.
    pub fees: Decimal,
    /// Estimated cost of slippage in quote currency.
    pub slippage: Decimal,
    pub profit_loss: Decimal,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_time.is_some()
    }

    pub fn is_win(&self) -> bool {
        self.profit_loss > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn candle(ts: i64, close: Decimal) -> Candle {
        Candle {
            open_time: Utc.timestamp_opt(ts, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: dec!(1),
        }
    }

    #[test]
    fn series_rejects_unsorted_candles() {
        let candles = vec![candle(200, dec!(1)), candle(100, dec!(2))];
        let result = CandleSeries::new("BTC/USDT", Timeframe::M5, candles);
        assert!(matches!(result, Err(CoreError::UnsortedSeries(_))));
    }

    #[test]
    fn series_rejects_duplicate_timestamps() {
        let candles = vec![candle(100, dec!(1)), candle(100, dec!(2))];
        let result = CandleSeries::new("BTC/USDT", Timeframe::M5, candles);
        assert!(result.is_err());
    }

    #[test]
    fn series_accepts_sorted_candles() {
        let candles = vec![candle(100, dec!(1)), candle(200, dec!(2))];
        let series = CandleSeries::new("BTC/USDT", Timeframe::M5, candles).unwrap();
        assert_eq!(series.len(), 2);
    }
}
