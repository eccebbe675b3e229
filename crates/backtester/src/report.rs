use core_types::Trade;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// The aggregate result of one backtest run. Produced once, read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Total return relative to the initial balance, in percent.
    pub total_return_pct: Decimal,
    /// Worst peak-to-balance decline observed, in percent.
    pub max_drawdown_pct: Decimal,
    /// Annualized Sharpe ratio over per-trade returns.
    pub sharpe_ratio: Decimal,
    pub trades: Vec<Trade>,
}

impl BacktestReport {
    /// A zeroed report, returned when no trades have closed.
    pub fn empty() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            total_return_pct: Decimal::ZERO,
            max_drawdown_pct: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            trades: Vec::new(),
        }
    }
}

impl Default for BacktestReport {
    fn default() -> Self {
        Self::empty()
    }
}

/// Annualized Sharpe ratio of a per-period returns series.
///
/// The per-period excess return is the mean return minus the annual
/// risk-free rate divided by 365, and the denominator is the population
/// standard deviation. Fewer than 2 samples or zero deviation yields 0.
pub fn sharpe_ratio(returns: &[Decimal], annual_risk_free_rate: Decimal) -> Decimal {
    if returns.len() < 2 {
        return Decimal::ZERO;
    }

    let n = Decimal::from(returns.len() as u64);
    let mean = returns.iter().sum::<Decimal>() / n;
    let variance = returns
        .iter()
        .map(|r| (*r - mean) * (*r - mean))
        .sum::<Decimal>()
        / n;

    let std_dev = match variance.sqrt() {
        Some(value) if value > Decimal::ZERO => value,
        _ => return Decimal::ZERO,
    };

    let periods_per_year = Decimal::from(365);
    let risk_free_per_period = annual_risk_free_rate / periods_per_year;
    let annualization = periods_per_year.sqrt().unwrap_or(Decimal::ONE);

    (mean - risk_free_per_period) / std_dev * annualization
}
