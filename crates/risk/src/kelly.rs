//! Kelly-criterion position sizing.
//!
//! The stake percentage is derived from the realized win rate over the
//! most recent closed trades for the pair: f = win_rate - (1 - win_rate)
//! / reward_risk_ratio, optionally halved (half-Kelly), then clamped to
//! the configured stake bounds. With too little history the fixed default
//! stake percentage applies.

use crate::error::RiskError;
use configuration::KellySettings;
use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct KellySizer {
    settings: KellySettings,
}

impl KellySizer {
    pub fn new(settings: KellySettings) -> Result<Self, RiskError> {
        if settings.reward_risk_ratio <= Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "kelly.reward_risk_ratio must be greater than 0".to_string(),
            ));
        }
        if settings.lookback_trades == 0 {
            return Err(RiskError::InvalidParameters(
                "kelly.lookback_trades must be greater than 0".to_string(),
            ));
        }
        if settings.min_stake_pct > settings.max_stake_pct {
            return Err(RiskError::InvalidParameters(format!(
                "kelly.min_stake_pct ({}) exceeds max_stake_pct ({})",
                settings.min_stake_pct, settings.max_stake_pct
            )));
        }
        Ok(Self { settings })
    }

    /// The raw Kelly fraction for a win rate, before half-Kelly scaling and
    /// clamping. A non-positive reward/risk ratio is degenerate input and
    /// yields 0; construction already rejects it, this keeps the math total.
    pub fn kelly_fraction(&self, win_rate: Decimal) -> Decimal {
        if self.settings.reward_risk_ratio <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        win_rate - (Decimal::ONE - win_rate) / self.settings.reward_risk_ratio
    }

    /// The stake percentage for `pair` given the closed-trade history.
    pub fn stake_pct(&self, pair: &str, trade_history: &[Trade]) -> Decimal {
        let mut closed: Vec<&Trade> = trade_history
            .iter()
            .filter(|t| t.pair == pair && t.exit_time.is_some())
            .collect();
        closed.sort_by(|a, b| b.exit_time.cmp(&a.exit_time));
        closed.truncate(self.settings.lookback_trades);

        if closed.len() < self.settings.min_trades_for_kelly {
            debug!(
                pair,
                trades = closed.len(),
                "insufficient history, using default stake"
            );
            return self.clamp(self.settings.default_stake_pct);
        }

        let wins = closed.iter().filter(|t| t.is_win()).count();
        let win_rate = Decimal::from(wins as u64) / Decimal::from(closed.len() as u64);

        let mut fraction = self.kelly_fraction(win_rate);
        if self.settings.half_kelly {
            fraction *= dec!(0.5);
        }

        let pct = self.clamp(fraction * Decimal::from(100));
        debug!(pair, %win_rate, %pct, "kelly stake");
        pct
    }

    /// The stake amount in quote currency.
    pub fn calculate_stake(
        &self,
        pair: &str,
        available_balance: Decimal,
        trade_history: &[Trade],
    ) -> Decimal {
        available_balance * self.stake_pct(pair, trade_history) / Decimal::from(100)
    }

    fn clamp(&self, pct: Decimal) -> Decimal {
        pct.clamp(self.settings.min_stake_pct, self.settings.max_stake_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn trade(pair: &str, exit_ts: Option<i64>, profit_loss: Decimal) -> Trade {
        Trade {
            trade_id: Uuid::new_v4(),
            pair: pair.to_string(),
            entry_time: Utc.timestamp_opt(0, 0).unwrap(),
            entry_price: dec!(100),
            stake: dec!(100),
            amount: dec!(1),
            exit_time: exit_ts.map(|ts| Utc.timestamp_opt(ts, 0).unwrap()),
            exit_price: Some(dec!(110)),
            exit_reason: None,
            fees: Decimal::ZERO,
            slippage: Decimal::ZERO,
            profit_loss,
        }
    }

    fn settings() -> KellySettings {
        KellySettings {
            min_trades_for_kelly: 5,
            half_kelly: false,
            ..KellySettings::default()
        }
    }

    #[test]
    fn full_kelly_fraction_formula() {
        // rrr = 2.0, win_rate = 0.6 -> 0.6 - 0.4/2 = 0.4
        let sizer = KellySizer::new(settings()).unwrap();
        assert_eq!(sizer.kelly_fraction(dec!(0.6)), dec!(0.4));
    }

    #[test]
    fn half_kelly_halves_then_clamps() {
        let mut s = settings();
        s.half_kelly = true;
        let sizer = KellySizer::new(s).unwrap();

        // 6 wins / 10 trades -> full Kelly 40%, half Kelly 20%, max clamp 20.
        let mut history = Vec::new();
        for i in 0..6 {
            history.push(trade("BTC/USDT", Some(i), dec!(10)));
        }
        for i in 6..10 {
            history.push(trade("BTC/USDT", Some(i), dec!(-10)));
        }
        assert_eq!(sizer.stake_pct("BTC/USDT", &history), dec!(20.0));
    }

    #[test]
    fn cold_start_uses_default_stake() {
        let sizer = KellySizer::new(settings()).unwrap();
        let history = vec![trade("BTC/USDT", Some(1), dec!(10))];
        assert_eq!(sizer.stake_pct("BTC/USDT", &history), dec!(5.0));
        assert_eq!(
            sizer.calculate_stake("BTC/USDT", dec!(10000), &history),
            dec!(500.0)
        );
    }

    #[test]
    fn losing_history_clamps_to_min_stake() {
        let sizer = KellySizer::new(settings()).unwrap();
        let history: Vec<Trade> = (0..10)
            .map(|i| trade("BTC/USDT", Some(i), dec!(-10)))
            .collect();
        // win_rate 0 -> fraction -0.5 -> clamped to min 1%.
        assert_eq!(sizer.stake_pct("BTC/USDT", &history), dec!(1.0));
    }

    #[test]
    fn open_trades_and_other_pairs_are_excluded() {
        let sizer = KellySizer::new(settings()).unwrap();
        let mut history: Vec<Trade> = (0..4)
            .map(|i| trade("BTC/USDT", Some(i), dec!(10)))
            .collect();
        history.push(trade("BTC/USDT", None, dec!(10))); // still open
        history.push(trade("ETH/USDT", Some(9), dec!(10))); // other pair
        // Only 4 closed BTC trades -> below min_trades_for_kelly.
        assert_eq!(sizer.stake_pct("BTC/USDT", &history), dec!(5.0));
    }

    #[test]
    fn lookback_keeps_only_most_recent_trades() {
        let mut s = settings();
        s.lookback_trades = 10;
        s.min_trades_for_kelly = 10;
        let sizer = KellySizer::new(s).unwrap();

        // 10 old losses followed by 10 recent wins; only the recent window
        // should count, giving a win rate of 1.0 -> clamped to max.
        let mut history: Vec<Trade> = (0..10)
            .map(|i| trade("BTC/USDT", Some(i), dec!(-10)))
            .collect();
        history.extend((100..110).map(|i| trade("BTC/USDT", Some(i), dec!(10))));
        assert_eq!(sizer.stake_pct("BTC/USDT", &history), dec!(20.0));
    }

    #[test]
    fn rejects_degenerate_reward_risk_ratio() {
        let mut s = settings();
        s.reward_risk_ratio = Decimal::ZERO;
        assert!(KellySizer::new(s).is_err());
    }
}
