use serde::{Deserialize, Serialize};

/// Coarse market-trend classification derived from BTC versus its EMA50.
///
/// The regime gates overall risk exposure: it decides how many trades may
/// be open at once, and can widen or narrow the RSI pullback band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    Bull,
    Bear,
}

/// Why a position was closed.
///
/// Downstream reporting and the Kelly trade-history classification depend
/// on the reason, so this is a real enum rather than a "stop hit" boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TrailingStop,
    TrendBreak,
    /// The simulation ran out of candles while the position was open; the
    /// position was force-closed at the last available price.
    EndOfData,
}

/// The candle intervals the engine works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    M5,
    H1,
    D1,
}

impl Timeframe {
    /// The interval string as the exchange spells it (e.g. "5m").
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::H1 => "1h",
            Timeframe::D1 => "1d",
        }
    }
}
