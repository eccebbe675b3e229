use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("No candle data available for the requested range")]
    DataUnavailable,

    #[error("Stake {stake} exceeds available balance {balance}")]
    InsufficientBalance { stake: Decimal, balance: Decimal },

    #[error("Simulated fill price must be positive, got {0}")]
    InvalidPrice(Decimal),

    #[error(transparent)]
    Indicator(#[from] indicators::IndicatorError),

    #[error(transparent)]
    Strategy(#[from] strategies::StrategyError),

    #[error(transparent)]
    Risk(#[from] risk::RiskError),
}
