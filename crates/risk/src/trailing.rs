//! Trailing-stop state machine.
//!
//! A position starts with the trail inactive. Once unrealized profit
//! reaches the activation threshold the trail switches on at
//! `current_price - multiplier * ATR` and from then on only ratchets
//! upward: a falling price or widening ATR never lowers the stored level.
//! The multiplier is dynamic: wide below the tighten threshold, narrow at
//! or above it.

use crate::error::RiskError;
use configuration::TrailingStopSettings;
use core_types::Position;
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TrailingStopManager {
    settings: TrailingStopSettings,
}

impl TrailingStopManager {
    pub fn new(settings: TrailingStopSettings) -> Result<Self, RiskError> {
        if settings.activation_profit_pct <= Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "trailing_stop.activation_profit_pct must be greater than 0".to_string(),
            ));
        }
        if settings.wide_multiplier <= Decimal::ZERO || settings.tight_multiplier <= Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "trailing_stop multipliers must be greater than 0".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    /// Unrealized profit of a long position, in percent. Zero entry price
    /// degenerates to 0 rather than dividing.
    pub fn profit_pct(entry_price: Decimal, current_price: Decimal) -> Decimal {
        if entry_price.is_zero() {
            return Decimal::ZERO;
        }
        (current_price / entry_price - Decimal::ONE) * Decimal::from(100)
    }

    pub fn should_activate(&self, profit_pct: Decimal) -> bool {
        profit_pct >= self.settings.activation_profit_pct
    }

    /// Wide multiplier below the tighten threshold, tight at or above it.
    pub fn multiplier(&self, profit_pct: Decimal) -> Decimal {
        if profit_pct >= self.settings.tighten_profit_pct {
            self.settings.tight_multiplier
        } else {
            self.settings.wide_multiplier
        }
    }

    pub fn candidate_level(&self, current_price: Decimal, atr: Decimal, profit_pct: Decimal) -> Decimal {
        current_price - self.multiplier(profit_pct) * atr
    }

    /// The monotonic ratchet: the stored level never decreases.
    pub fn update_stop_if_higher(new_level: Decimal, current_level: Decimal) -> Decimal {
        new_level.max(current_level)
    }

    /// Advances the trailing state of `position` for one bar. Returns the
    /// active level, if any.
    pub fn update(
        &self,
        position: &mut Position,
        current_price: Decimal,
        atr: Decimal,
    ) -> Option<Decimal> {
        let profit = Self::profit_pct(position.entry_price, current_price);

        match position.trailing_stop {
            Some(level) => {
                let candidate = self.candidate_level(current_price, atr, profit);
                let updated = Self::update_stop_if_higher(candidate, level);
                if updated > level {
                    debug!(pair = %position.pair, %updated, "trailing stop raised");
                }
                position.trailing_stop = Some(updated);
                Some(updated)
            }
            None if self.should_activate(profit) => {
                let level = self.candidate_level(current_price, atr, profit);
                debug!(pair = %position.pair, %level, profit_pct = %profit, "trailing stop activated");
                position.trailing_stop = Some(level);
                Some(level)
            }
            None => None,
        }
    }
}
