use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the decision engine.
///
/// Constructed once (from `config.toml` or `Config::default()`) and handed
/// by value into each component's constructor; no component reads ambient
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub indicators: IndicatorSettings,
    pub regime: RegimeSettings,
    pub scanner: ScannerSettings,
    pub entry: EntrySettings,
    pub stop_loss: StopLossSettings,
    pub trailing_stop: TrailingStopSettings,
    pub kelly: KellySettings,
    pub backtest: BacktestSettings,
}

impl Config {
    /// Fail-fast validation of every section.
    ///
    /// Components validate their own parameters again in their
    /// constructors; this catches a broken file at load time, before any
    /// component is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.regime.validate()?;
        self.scanner.validate()?;
        self.entry.validate()?;
        self.stop_loss.validate()?;
        self.trailing_stop.validate()?;
        self.kelly.validate()?;
        self.backtest.validate()?;
        Ok(())
    }
}

fn require_positive(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be greater than 0, got {value}"),
        });
    }
    Ok(())
}

fn require_nonzero(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(())
}

/// Lookback periods for the indicator calculator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// EMA smoothing period. Default 50.
    pub ema_period: usize,
    /// Rate-of-change lookback in bars. Default 12.
    pub roc_period: usize,
    /// RSI smoothing period. Default 14.
    pub rsi_period: usize,
    /// ATR smoothing period. Default 14.
    pub atr_period: usize,
    /// Rolling mean-volume window in bars. Default 288 (24h of 5m bars).
    pub volume_window: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            ema_period: 50,
            roc_period: 12,
            rsi_period: 14,
            atr_period: 14,
            volume_window: 288,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("indicators.ema_period", self.ema_period)?;
        require_nonzero("indicators.roc_period", self.roc_period)?;
        require_nonzero("indicators.rsi_period", self.rsi_period)?;
        require_nonzero("indicators.atr_period", self.atr_period)?;
        require_nonzero("indicators.volume_window", self.volume_window)?;
        Ok(())
    }
}

/// Regime-specific exposure ceilings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegimeSettings {
    /// Maximum concurrent open trades while BTC trades above its EMA50.
    /// Default 20.
    pub bull_max_open_trades: usize,
    /// Maximum concurrent open trades in a bear regime. Default 3.
    pub bear_max_open_trades: usize,
}

impl Default for RegimeSettings {
    fn default() -> Self {
        Self {
            bull_max_open_trades: 20,
            bear_max_open_trades: 3,
        }
    }
}

impl RegimeSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("regime.bull_max_open_trades", self.bull_max_open_trades)?;
        require_nonzero("regime.bear_max_open_trades", self.bear_max_open_trades)?;
        Ok(())
    }
}

/// Parameters for the pair-filter pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Keep only the top-N pairs by quote volume before filtering. Default 70.
    pub min_volume_rank: usize,
    /// Regex patterns for symbols that must never be traded. An invalid
    /// pattern is a configuration error raised when the scanner is built.
    pub blacklist: Vec<String>,
    /// Maximum acceptable spread ratio. Default 0.0025 (0.25%).
    pub max_spread: Decimal,
    /// Minimum acceptable last price. Default 0.01.
    pub min_price: Decimal,
    /// Inclusive volatility band, in percent. Defaults 2.0 ..= 15.0.
    pub volatility_min: Decimal,
    pub volatility_max: Decimal,
    /// Final cap on the number of pairs returned. Default 20.
    pub max_pairs: usize,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            min_volume_rank: 70,
            blacklist: Vec::new(),
            max_spread: dec!(0.0025),
            min_price: dec!(0.01),
            volatility_min: dec!(2.0),
            volatility_max: dec!(15.0),
            max_pairs: 20,
        }
    }
}

impl ScannerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("scanner.min_volume_rank", self.min_volume_rank)?;
        require_nonzero("scanner.max_pairs", self.max_pairs)?;
        require_positive("scanner.max_spread", self.max_spread)?;
        require_positive("scanner.min_price", self.min_price)?;
        if self.volatility_min > self.volatility_max {
            return Err(ConfigError::InvalidValue {
                field: "scanner.volatility_min".to_string(),
                reason: format!(
                    "({}) exceeds volatility_max ({})",
                    self.volatility_min, self.volatility_max
                ),
            });
        }
        Ok(())
    }
}

/// Thresholds for the entry signal generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntrySettings {
    /// Minimum rate-of-change, in percent. Default 1.5.
    pub roc_threshold: Decimal,
    /// RSI pullback band when the fixed policy is in use (exclusive bounds).
    pub rsi_lower: Decimal,
    pub rsi_upper: Decimal,
    /// Switch to the regime-aware RSI band policy.
    pub regime_aware_rsi: bool,
    /// Wider band applied in a bull regime by the regime-aware policy.
    pub bull_rsi_lower: Decimal,
    pub bull_rsi_upper: Decimal,
    /// Narrower band applied in a bear regime.
    pub bear_rsi_lower: Decimal,
    pub bear_rsi_upper: Decimal,
}

impl Default for EntrySettings {
    fn default() -> Self {
        Self {
            roc_threshold: dec!(1.5),
            rsi_lower: dec!(30),
            rsi_upper: dec!(70),
            regime_aware_rsi: false,
            bull_rsi_lower: dec!(25),
            bull_rsi_upper: dec!(75),
            bear_rsi_lower: dec!(35),
            bear_rsi_upper: dec!(65),
        }
    }
}

impl EntrySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, lower, upper) in [
            ("entry.rsi", self.rsi_lower, self.rsi_upper),
            ("entry.bull_rsi", self.bull_rsi_lower, self.bull_rsi_upper),
            ("entry.bear_rsi", self.bear_rsi_lower, self.bear_rsi_upper),
        ] {
            if lower >= upper {
                return Err(ConfigError::InvalidValue {
                    field: format!("{name}_lower"),
                    reason: format!("({lower}) must be below {name}_upper ({upper})"),
                });
            }
        }
        Ok(())
    }
}

/// ATR-based initial stop-loss parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StopLossSettings {
    /// Stop distance in ATR multiples below the entry. Default 2.0.
    pub atr_multiplier: Decimal,
}

impl Default for StopLossSettings {
    fn default() -> Self {
        Self {
            atr_multiplier: dec!(2.0),
        }
    }
}

impl StopLossSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("stop_loss.atr_multiplier", self.atr_multiplier)
    }
}

/// Trailing-stop activation and ratchet parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrailingStopSettings {
    /// Unrealized profit (percent) at which the trail activates. Default 1.5.
    pub activation_profit_pct: Decimal,
    /// Profit (percent) at which the trail tightens. Default 3.0.
    pub tighten_profit_pct: Decimal,
    /// ATR multiplier below the tighten threshold. Default 1.5.
    pub wide_multiplier: Decimal,
    /// ATR multiplier at or above the tighten threshold. Default 1.0.
    pub tight_multiplier: Decimal,
}

impl Default for TrailingStopSettings {
    fn default() -> Self {
        Self {
            activation_profit_pct: dec!(1.5),
            tighten_profit_pct: dec!(3.0),
            wide_multiplier: dec!(1.5),
            tight_multiplier: dec!(1.0),
        }
    }
}

impl TrailingStopSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive(
            "trailing_stop.activation_profit_pct",
            self.activation_profit_pct,
        )?;
        require_positive("trailing_stop.wide_multiplier", self.wide_multiplier)?;
        require_positive("trailing_stop.tight_multiplier", self.tight_multiplier)?;
        if self.tighten_profit_pct < self.activation_profit_pct {
            return Err(ConfigError::InvalidValue {
                field: "trailing_stop.tighten_profit_pct".to_string(),
                reason: format!(
                    "({}) is below activation_profit_pct ({})",
                    self.tighten_profit_pct, self.activation_profit_pct
                ),
            });
        }
        Ok(())
    }
}

/// Kelly-criterion position sizing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KellySettings {
    /// Number of most-recent closed trades per pair to look at. Default 30.
    pub lookback_trades: usize,
    /// Below this many closed trades, use the fixed default stake. Default 10.
    pub min_trades_for_kelly: usize,
    /// Assumed reward-to-risk ratio of a trade. Must be positive. Default 2.0.
    pub reward_risk_ratio: Decimal,
    /// Scale the Kelly fraction by 0.5 to reduce variance. Default true.
    pub half_kelly: bool,
    /// Stake percentage used during the cold start. Default 5.0.
    pub default_stake_pct: Decimal,
    /// Clamp bounds for the stake percentage. Defaults 1.0 ..= 20.0.
    pub min_stake_pct: Decimal,
    pub max_stake_pct: Decimal,
}

impl Default for KellySettings {
    fn default() -> Self {
        Self {
            lookback_trades: 30,
            min_trades_for_kelly: 10,
            reward_risk_ratio: dec!(2.0),
            half_kelly: true,
            default_stake_pct: dec!(5.0),
            min_stake_pct: dec!(1.0),
            max_stake_pct: dec!(20.0),
        }
    }
}

impl KellySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("kelly.lookback_trades", self.lookback_trades)?;
        require_positive("kelly.reward_risk_ratio", self.reward_risk_ratio)?;
        require_positive("kelly.default_stake_pct", self.default_stake_pct)?;
        require_positive("kelly.min_stake_pct", self.min_stake_pct)?;
        if self.min_stake_pct > self.max_stake_pct {
            return Err(ConfigError::InvalidValue {
                field: "kelly.min_stake_pct".to_string(),
                reason: format!(
                    "({}) exceeds max_stake_pct ({})",
                    self.min_stake_pct, self.max_stake_pct
                ),
            });
        }
        Ok(())
    }
}

/// Parameters for the backtest simulation ledger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// Starting balance in quote currency. Default 10000.
    pub initial_balance: Decimal,
    /// Taker fee per side, in percent. Default 0.04.
    pub fee_pct: Decimal,
    /// Assumed slippage per market order, in percent. Default 0.05.
    pub slippage_pct: Decimal,
    /// Annual risk-free rate used by the Sharpe ratio. Default 0.
    pub risk_free_rate_annual: Decimal,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            initial_balance: dec!(10000),
            fee_pct: dec!(0.04),
            slippage_pct: dec!(0.05),
            risk_free_rate_annual: Decimal::ZERO,
        }
    }
}

impl BacktestSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("backtest.initial_balance", self.initial_balance)?;
        if self.fee_pct < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "backtest.fee_pct".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        if self.slippage_pct < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "backtest.slippage_pct".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
