//! ATR-based initial stop-loss.
//!
//! stop = entry_price - multiplier * ATR. With a positive ATR the stop is
//! always below the entry.

use crate::error::RiskError;
use configuration::StopLossSettings;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct StopLossManager {
    multiplier: Decimal,
}

impl StopLossManager {
    pub fn new(settings: StopLossSettings) -> Result<Self, RiskError> {
        if settings.atr_multiplier <= Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "stop_loss.atr_multiplier must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            multiplier: settings.atr_multiplier,
        })
    }

    pub fn stop_loss(&self, entry_price: Decimal, atr: Decimal) -> Decimal {
        entry_price - self.multiplier * atr
    }

    /// The stop distance as a percentage of the entry price, <= 0 by
    /// construction. An entry price of zero yields 0 instead of dividing.
    pub fn stop_loss_pct(&self, stop: Decimal, entry_price: Decimal) -> Decimal {
        if entry_price.is_zero() {
            return Decimal::ZERO;
        }
        (stop - entry_price) / entry_price * Decimal::from(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn manager() -> StopLossManager {
        StopLossManager::new(StopLossSettings::default()).unwrap()
    }

    #[test]
    fn default_multiplier_is_two_atr() {
        let stop = manager().stop_loss(dec!(100), dec!(5));
        assert_eq!(stop, dec!(90));
    }

    #[test]
    fn stop_is_below_entry_when_atr_positive() {
        let manager = manager();
        for atr in [dec!(0.1), dec!(1), dec!(25)] {
            assert!(manager.stop_loss(dec!(100), atr) < dec!(100));
        }
    }

    #[test]
    fn percentage_form_is_non_positive() {
        let manager = manager();
        let stop = manager.stop_loss(dec!(100), dec!(5));
        assert_eq!(manager.stop_loss_pct(stop, dec!(100)), dec!(-10));
    }

    #[test]
    fn zero_entry_price_yields_zero_pct() {
        let manager = manager();
        assert_eq!(manager.stop_loss_pct(dec!(-10), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let settings = StopLossSettings {
            atr_multiplier: Decimal::ZERO,
        };
        assert!(StopLossManager::new(settings).is_err());
    }
}
