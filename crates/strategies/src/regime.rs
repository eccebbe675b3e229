//! Market-regime classification.
//!
//! The regime is a pure function of BTC's close versus its EMA50: strictly
//! above is Bull, anything else (including equality) is Bear. The
//! tie-break to Bear is a deliberate contract, not an accident.

use configuration::RegimeSettings;
use core_types::Regime;
use rust_decimal::Decimal;

/// `Bull` iff `btc_close > btc_ema50`; equality resolves to `Bear`.
pub fn classify(btc_close: Decimal, btc_ema50: Decimal) -> Regime {
    if btc_close > btc_ema50 {
        Regime::Bull
    } else {
        Regime::Bear
    }
}

/// Maps the regime onto the configured concurrent-open-trade ceiling.
#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    settings: RegimeSettings,
}

impl RegimeClassifier {
    pub fn new(settings: RegimeSettings) -> Self {
        Self { settings }
    }

    pub fn max_open_trades(&self, regime: Regime) -> usize {
        match regime {
            Regime::Bull => self.settings.bull_max_open_trades,
            Regime::Bear => self.settings.bear_max_open_trades,
        }
    }

    /// Strict comparison: at the ceiling no further trade may open.
    pub fn can_open_trade(&self, regime: Regime, open_count: usize) -> bool {
        open_count < self.max_open_trades(regime)
    }
}
