//! The simulation ledger.
//!
//! Tracks running balance, peak balance and maximum drawdown across a
//! sequence of simulated entries and exits, applying slippage and taker
//! fees on both sides of every trade. One trade lifecycle at a time, in
//! monotonic time order.

use crate::error::BacktestError;
use crate::report::{BacktestReport, sharpe_ratio};
use chrono::{DateTime, Utc};
use configuration::BacktestSettings;
use core_types::{ExitReason, Position, Trade};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SimulationLedger {
    settings: BacktestSettings,
    balance: Decimal,
    peak_balance: Decimal,
    /// Running maximum of (peak - balance) / peak, as a fraction.
    max_drawdown: Decimal,
    trades: Vec<Trade>,
}

impl SimulationLedger {
    pub fn new(settings: BacktestSettings) -> Self {
        let balance = settings.initial_balance;
        Self {
            settings,
            balance,
            peak_balance: balance,
            max_drawdown: Decimal::ZERO,
            trades: Vec::new(),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn peak_balance(&self) -> Decimal {
        self.peak_balance
    }

    /// Maximum drawdown observed so far, as a fraction.
    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Opens a simulated long position.
    ///
    /// Slippage moves the fill against the buyer; the entry fee is charged
    /// on the post-slippage notional; the full stake is debited
    /// immediately.
    pub fn simulate_entry(
        &mut self,
        pair: &str,
        price: Decimal,
        stake: Decimal,
        stop_loss: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Position, BacktestError> {
        if price <= Decimal::ZERO {
            return Err(BacktestError::InvalidPrice(price));
        }
        if stake > self.balance {
            return Err(BacktestError::InsufficientBalance {
                stake,
                balance: self.balance,
            });
        }

        let hundred = Decimal::from(100);
        let adjusted_price = price * (Decimal::ONE + self.settings.slippage_pct / hundred);
        let fee = stake * self.settings.fee_pct / hundred;
        let amount = (stake - fee) / adjusted_price;

        self.balance -= stake;
        debug!(pair, %adjusted_price, %stake, %amount, "simulated entry");

        Ok(Position {
            pair: pair.to_string(),
            entry_time: timestamp,
            entry_price: adjusted_price,
            stake,
            amount,
            stop_loss,
            trailing_stop: None,
        })
    }

    /// Closes a simulated position and appends the resulting trade record.
    ///
    /// Slippage moves the fill against the seller; the exit fee is charged
    /// on the exit notional; the net exit value is credited back and the
    /// peak/drawdown state is updated.
    pub fn simulate_exit(
        &mut self,
        position: Position,
        price: Decimal,
        timestamp: DateTime<Utc>,
        reason: ExitReason,
    ) -> Result<&Trade, BacktestError> {
        if price <= Decimal::ZERO {
            return Err(BacktestError::InvalidPrice(price));
        }

        let hundred = Decimal::from(100);
        let slip_factor = Decimal::ONE + self.settings.slippage_pct / hundred;
        let adjusted_price = price / slip_factor;
        let exit_value = position.amount * adjusted_price;
        let exit_fee = exit_value * self.settings.fee_pct / hundred;
        let net_exit_value = exit_value - exit_fee;
        let profit_loss = net_exit_value - position.stake;

        self.balance += net_exit_value;
        if self.balance > self.peak_balance {
            self.peak_balance = self.balance;
        }
        if self.peak_balance > Decimal::ZERO {
            let drawdown = (self.peak_balance - self.balance) / self.peak_balance;
            if drawdown > self.max_drawdown {
                self.max_drawdown = drawdown;
            }
        }

        // Fees and slippage are reconstructed from the fill prices: the
        // entry fee is the part of the stake that never became position
        // amount, and each side's slippage is the gap to the unslipped
        // price.
        let entry_fee = position.stake - position.amount * position.entry_price;
        let entry_slippage =
            position.amount * (position.entry_price - position.entry_price / slip_factor);
        let exit_slippage = position.amount * (price - adjusted_price);

        debug!(
            pair = %position.pair,
            %adjusted_price,
            %profit_loss,
            ?reason,
            "simulated exit"
        );

        let index = self.trades.len();
        self.trades.push(Trade {
            trade_id: Uuid::new_v4(),
            pair: position.pair,
            entry_time: position.entry_time,
            entry_price: position.entry_price,
            stake: position.stake,
            amount: position.amount,
            exit_time: Some(timestamp),
            exit_price: Some(adjusted_price),
            exit_reason: Some(reason),
            fees: entry_fee + exit_fee,
            slippage: entry_slippage + exit_slippage,
            profit_loss,
        });
        Ok(&self.trades[index])
    }

    /// Builds the aggregate report over all closed trades.
    pub fn report(&self) -> BacktestReport {
        if self.trades.is_empty() {
            return BacktestReport::empty();
        }

        let winning_trades = self.trades.iter().filter(|t| t.is_win()).count();
        let total_return_pct = (self.balance - self.settings.initial_balance)
            / self.settings.initial_balance
            * Decimal::from(100);

        let returns: Vec<Decimal> = self
            .trades
            .iter()
            .filter(|t| !t.stake.is_zero())
            .map(|t| t.profit_loss / t.stake)
            .collect();

        BacktestReport {
            total_trades: self.trades.len(),
            winning_trades,
            losing_trades: self.trades.len() - winning_trades,
            total_return_pct,
            max_drawdown_pct: self.max_drawdown * Decimal::from(100),
            sharpe_ratio: sharpe_ratio(&returns, self.settings.risk_free_rate_annual),
            trades: self.trades.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn frictionless() -> BacktestSettings {
        BacktestSettings {
            initial_balance: dec!(10000),
            fee_pct: Decimal::ZERO,
            slippage_pct: Decimal::ZERO,
            risk_free_rate_annual: Decimal::ZERO,
        }
    }

    #[test]
    fn single_frictionless_trade_matches_hand_math() {
        let mut ledger = SimulationLedger::new(frictionless());
        let position = ledger
            .simulate_entry("BTC/USDT", dec!(100), dec!(1000), dec!(90), Utc::now())
            .unwrap();
        assert_eq!(ledger.balance(), dec!(9000));
        assert_eq!(position.amount, dec!(10));

        ledger
            .simulate_exit(position, dec!(110), Utc::now(), ExitReason::TrendBreak)
            .unwrap();
        // profit = 1000 * (110/100 - 1) = 100
        assert_eq!(ledger.balance(), dec!(10100));
        let report = ledger.report();
        assert_eq!(report.total_trades, 1);
        assert_eq!(report.winning_trades, 1);
        assert_eq!(report.trades[0].profit_loss, dec!(100));
        assert_eq!(report.total_return_pct, dec!(1.00));
    }

    #[test]
    fn slippage_raises_entry_fill_and_lowers_exit_fill() {
        let mut settings = frictionless();
        settings.slippage_pct = dec!(1);
        let mut ledger = SimulationLedger::new(settings);

        let position = ledger
            .simulate_entry("BTC/USDT", dec!(100), dec!(1010), dec!(90), Utc::now())
            .unwrap();
        assert_eq!(position.entry_price, dec!(101.00));
        assert_eq!(position.amount, dec!(10));

        let trade = ledger
            .simulate_exit(position, dec!(101), Utc::now(), ExitReason::StopLoss)
            .unwrap();
        assert_eq!(trade.exit_price, Some(dec!(100)));
        // Round trip at an unchanged mid price loses the slippage both ways.
        assert_eq!(trade.profit_loss, dec!(-10.00));
    }

    #[test]
    fn fees_are_charged_on_both_notionals() {
        let mut settings = frictionless();
        settings.fee_pct = dec!(0.1);
        let mut ledger = SimulationLedger::new(settings);

        let position = ledger
            .simulate_entry("BTC/USDT", dec!(100), dec!(1000), dec!(90), Utc::now())
            .unwrap();
        // entry fee = 1, amount = 999 / 100 = 9.99
        assert_eq!(position.amount, dec!(9.99));

        let trade = ledger
            .simulate_exit(position, dec!(100), Utc::now(), ExitReason::TrendBreak)
            .unwrap();
        // exit value 999, exit fee 0.999 -> pnl = 998.001 - 1000
        assert_eq!(trade.profit_loss, dec!(-1.999000));
        assert_eq!(trade.fees, dec!(1.999000));
    }

    #[test]
    fn drawdown_tracks_peak_to_balance_decline() {
        let mut ledger = SimulationLedger::new(frictionless());

        // Win: balance 11000, peak 11000.
        let position = ledger
            .simulate_entry("A/USDT", dec!(100), dec!(1000), dec!(90), Utc::now())
            .unwrap();
        ledger
            .simulate_exit(position, dec!(200), Utc::now(), ExitReason::TrendBreak)
            .unwrap();
        assert_eq!(ledger.peak_balance(), dec!(11000));

        // Loss: balance 10450, drawdown (11000 - 10450) / 11000 = 5%.
        let position = ledger
            .simulate_entry("A/USDT", dec!(100), dec!(1100), dec!(90), Utc::now())
            .unwrap();
        ledger
            .simulate_exit(position, dec!(50), Utc::now(), ExitReason::StopLoss)
            .unwrap();
        assert_eq!(ledger.balance(), dec!(10450));
        assert_eq!(ledger.max_drawdown(), dec!(0.05));
        assert_eq!(ledger.report().max_drawdown_pct, dec!(5.00));
    }

    #[test]
    fn stake_larger_than_balance_is_rejected() {
        let mut ledger = SimulationLedger::new(frictionless());
        let result =
            ledger.simulate_entry("BTC/USDT", dec!(100), dec!(20000), dec!(90), Utc::now());
        assert!(matches!(
            result,
            Err(BacktestError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn report_without_trades_is_zeroed() {
        let ledger = SimulationLedger::new(frictionless());
        let report = ledger.report();
        assert_eq!(report, BacktestReport::empty());
    }
}
