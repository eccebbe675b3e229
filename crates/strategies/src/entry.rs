//! Entry signal generation.
//!
//! An entry is the conjunction of six independent predicates; all must
//! hold. Indicator inputs that are still undefined fail their predicate —
//! missing data never counts as a pass.

use crate::error::StrategyError;
use crate::regime::RegimeClassifier;
use configuration::{EntrySettings, RegimeSettings};
use core_types::{MarketState, Regime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// The RSI pullback-zone policy, queried with the current RSI and regime.
///
/// Selected once at construction; callers go through the one uniform call
/// signature instead of branching on the policy kind themselves.
pub trait RsiZonePolicy: Send + Sync {
    /// True when `rsi` sits strictly inside the pullback band for `regime`.
    fn in_pullback_zone(&self, rsi: Decimal, regime: Regime) -> bool;
}

/// One fixed band regardless of regime.
#[derive(Debug, Clone)]
pub struct FixedRsiZone {
    pub lower: Decimal,
    pub upper: Decimal,
}

impl RsiZonePolicy for FixedRsiZone {
    fn in_pullback_zone(&self, rsi: Decimal, _regime: Regime) -> bool {
        rsi > self.lower && rsi < self.upper
    }
}

/// A wider band in a bull regime, a narrower one in a bear regime.
#[derive(Debug, Clone)]
pub struct RegimeRsiZone {
    pub bull: (Decimal, Decimal),
    pub bear: (Decimal, Decimal),
}

impl RsiZonePolicy for RegimeRsiZone {
    fn in_pullback_zone(&self, rsi: Decimal, regime: Regime) -> bool {
        let (lower, upper) = match regime {
            Regime::Bull => self.bull,
            Regime::Bear => self.bear,
        };
        rsi > lower && rsi < upper
    }
}

/// The individual result of each entry predicate.
///
/// This is the observability view: `should_enter` is defined as
/// `analyze(..).all()`, so there is exactly one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryAnalysis {
    /// Higher-timeframe close above its EMA50.
    pub macro_trend: bool,
    /// Base-timeframe close above its EMA50.
    pub micro_trend: bool,
    /// ROC above the configured threshold.
    pub momentum: bool,
    /// RSI strictly inside the pullback band.
    pub pullback_zone: bool,
    /// Current volume above the 24h mean.
    pub volume_confirmed: bool,
    /// Open-trade count below the regime ceiling.
    pub capacity: bool,
}

impl EntryAnalysis {
    pub fn all(&self) -> bool {
        self.macro_trend
            && self.micro_trend
            && self.momentum
            && self.pullback_zone
            && self.volume_confirmed
            && self.capacity
    }
}

pub struct EntrySignalGenerator {
    settings: EntrySettings,
    classifier: RegimeClassifier,
    rsi_policy: Box<dyn RsiZonePolicy>,
}

impl EntrySignalGenerator {
    /// Builds the generator, selecting the RSI-zone policy from the
    /// configuration switch. The bands the selected policy will query are
    /// validated here; an inverted band can never produce an entry, so it
    /// is rejected up front.
    pub fn new(
        settings: EntrySettings,
        regime_settings: RegimeSettings,
    ) -> Result<Self, StrategyError> {
        let bands = if settings.regime_aware_rsi {
            vec![
                ("bull_rsi", settings.bull_rsi_lower, settings.bull_rsi_upper),
                ("bear_rsi", settings.bear_rsi_lower, settings.bear_rsi_upper),
            ]
        } else {
            vec![("rsi", settings.rsi_lower, settings.rsi_upper)]
        };
        for (name, lower, upper) in bands {
            if lower >= upper {
                return Err(StrategyError::InvalidParameters(format!(
                    "entry.{name}_lower ({lower}) must be below entry.{name}_upper ({upper})"
                )));
            }
        }

        let rsi_policy: Box<dyn RsiZonePolicy> = if settings.regime_aware_rsi {
            Box::new(RegimeRsiZone {
                bull: (settings.bull_rsi_lower, settings.bull_rsi_upper),
                bear: (settings.bear_rsi_lower, settings.bear_rsi_upper),
            })
        } else {
            Box::new(FixedRsiZone {
                lower: settings.rsi_lower,
                upper: settings.rsi_upper,
            })
        };

        Ok(Self {
            settings,
            classifier: RegimeClassifier::new(regime_settings),
            rsi_policy,
        })
    }

    /// Evaluates every predicate against one market snapshot.
    pub fn analyze(
        &self,
        state: &MarketState,
        regime: Regime,
        open_trades: usize,
    ) -> EntryAnalysis {
        let macro_trend = match (state.htf_close, state.htf_ema) {
            (Some(close), Some(ema)) => close > ema,
            _ => false,
        };
        let micro_trend = state.ema.is_some_and(|ema| state.close > ema);
        let momentum = state
            .roc
            .is_some_and(|roc| roc > self.settings.roc_threshold);
        let pullback_zone = state
            .rsi
            .is_some_and(|rsi| self.rsi_policy.in_pullback_zone(rsi, regime));
        let volume_confirmed = state
            .volume_mean_24h
            .is_some_and(|mean| state.volume > mean);
        let capacity = self.classifier.can_open_trade(regime, open_trades);

        let analysis = EntryAnalysis {
            macro_trend,
            micro_trend,
            momentum,
            pullback_zone,
            volume_confirmed,
            capacity,
        };
        debug!(?analysis, ?regime, open_trades, "entry analysis");
        analysis
    }

    pub fn should_enter(&self, state: &MarketState, regime: Regime, open_trades: usize) -> bool {
        self.analyze(state, regime, open_trades).all()
    }
}
