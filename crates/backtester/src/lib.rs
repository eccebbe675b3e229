//! Historical replay of the full decision pipeline.
//!
//! The `Backtester` runs candles through indicators, regime
//! classification, entry/exit evaluation and the risk managers, settling
//! every fill against the `SimulationLedger`. The replay is
//! single-threaded and deterministic: one bar at a time, one trade
//! lifecycle at a time.

pub mod error;
pub mod ledger;
pub mod report;

pub use error::BacktestError;
pub use ledger::SimulationLedger;
pub use report::{BacktestReport, sharpe_ratio};

use configuration::Config;
use core_types::{Candle, CandleSeries, EmergencyStop, ExitReason, MarketState, Regime, Trade};
use events::{BotMessage, StatusSummary, TradeClosed, TradeOpened};
use indicatif::ProgressBar;
use indicators::{IndicatorSet, ema, merge_asof};
use risk::{KellySizer, StopLossManager, TrailingStopManager};
use rust_decimal::Decimal;
use strategies::{EntrySignalGenerator, ExitSignalGenerator, classify};
use tracing::info;

/// The historical inputs for one backtest run: the traded pair on its base
/// and higher timeframes, plus the BTC series the regime is read from.
#[derive(Debug, Clone)]
pub struct BacktestData {
    pub base: CandleSeries,
    pub higher: CandleSeries,
    pub btc: CandleSeries,
}

pub struct Backtester {
    config: Config,
    entry_generator: EntrySignalGenerator,
    exit_generator: ExitSignalGenerator,
    stop_loss_manager: StopLossManager,
    trailing_manager: TrailingStopManager,
    kelly_sizer: KellySizer,
    emergency_stop: EmergencyStop,
    /// Notification outbox: structured messages a delivery layer would
    /// format and send. The backtester only collects them.
    messages: Vec<BotMessage>,
}

impl Backtester {
    pub fn new(config: Config, emergency_stop: EmergencyStop) -> Result<Self, BacktestError> {
        let entry_generator =
            EntrySignalGenerator::new(config.entry.clone(), config.regime.clone())?;
        let stop_loss_manager = StopLossManager::new(config.stop_loss.clone())?;
        let trailing_manager = TrailingStopManager::new(config.trailing_stop.clone())?;
        let kelly_sizer = KellySizer::new(config.kelly.clone())?;

        Ok(Self {
            config,
            entry_generator,
            exit_generator: ExitSignalGenerator::new(),
            stop_loss_manager,
            trailing_manager,
            kelly_sizer,
            emergency_stop,
            messages: Vec::new(),
        })
    }

    /// The messages collected during the last run.
    pub fn messages(&self) -> &[BotMessage] {
        &self.messages
    }

    /// Replays the pipeline over the historical data and returns the
    /// aggregate report.
    pub fn run(&mut self, data: &BacktestData) -> Result<BacktestReport, BacktestError> {
        let base = data.base.candles();
        if base.is_empty() {
            return Err(BacktestError::DataUnavailable);
        }
        self.messages.clear();

        let set = IndicatorSet::compute(&data.base, &self.config.indicators)?;
        let columns = self.align_context(data)?;

        let mut ledger = SimulationLedger::new(self.config.backtest.clone());
        let mut open_position = None;

        let progress_bar = ProgressBar::new(base.len() as u64);
        for (i, candle) in base.iter().enumerate() {
            let state = market_state(candle, &set, &columns, i);

            // Regime is read from BTC; a bar with no BTC context yet is
            // treated as Bear, the conservative ceiling.
            let regime = match (columns.btc_close[i], columns.btc_ema[i]) {
                (Some(close), Some(ema50)) => classify(close, ema50),
                _ => Regime::Bear,
            };

            if let Some(mut position) = open_position.take() {
                if let Some(atr) = set.atr[i] {
                    self.trailing_manager
                        .update(&mut position, candle.close, atr);
                }

                let decision = self.exit_generator.evaluate(&position, &state);
                if let Some(reason) = decision.reason() {
                    let trade = ledger.simulate_exit(
                        position,
                        candle.close,
                        candle.open_time,
                        reason,
                    )?;
                    self.messages
                        .push(BotMessage::TradeClosed(TradeClosed::from(trade)));
                } else {
                    open_position = Some(position);
                }
            } else if !self.emergency_stop.is_triggered()
                && self.entry_generator.should_enter(&state, regime, 0)
            {
                // An entry needs a defined ATR for the initial stop.
                if let Some(atr) = set.atr[i] {
                    let stake = self.kelly_sizer.calculate_stake(
                        &data.base.pair,
                        ledger.balance(),
                        ledger.trades(),
                    );
                    if stake > Decimal::ZERO && stake <= ledger.balance() {
                        let stop_loss = self.stop_loss_manager.stop_loss(candle.close, atr);
                        let position = ledger.simulate_entry(
                            &data.base.pair,
                            candle.close,
                            stake,
                            stop_loss,
                            candle.open_time,
                        )?;
                        self.messages
                            .push(BotMessage::TradeOpened(TradeOpened::from(&position)));
                        open_position = Some(position);
                    }
                }
            }

            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        if let Some(last) = base.last() {
            // A position still open when the data ends would leave its
            // stake debited but unreported; force-close it at the final
            // close so the report reconciles with the ledger balance.
            if let Some(position) = open_position.take() {
                let trade = ledger.simulate_exit(
                    position,
                    last.close,
                    last.open_time,
                    ExitReason::EndOfData,
                )?;
                self.messages
                    .push(BotMessage::TradeClosed(TradeClosed::from(trade)));
            }

            self.messages.push(BotMessage::Status(StatusSummary {
                timestamp: last.open_time,
                balance: ledger.balance(),
                open_trades: 0,
                closed_trades: ledger.trades().len(),
                total_profit: ledger.balance() - self.config.backtest.initial_balance,
            }));
        }

        let report = ledger.report();
        info!(
            pair = %data.base.pair,
            trades = report.total_trades,
            total_return_pct = %report.total_return_pct,
            "backtest complete"
        );
        Ok(report)
    }

    /// Computes the higher-timeframe and BTC columns, as-of aligned onto
    /// the base timestamps.
    fn align_context(&self, data: &BacktestData) -> Result<ContextColumns, BacktestError> {
        let base_ts: Vec<_> = data.base.timestamps().collect();

        let htf_ts: Vec<_> = data.higher.timestamps().collect();
        let htf_closes: Vec<Option<Decimal>> = data
            .higher
            .candles()
            .iter()
            .map(|c| Some(c.close))
            .collect();
        let htf_ema_series = ema(data.higher.candles(), self.config.indicators.ema_period);

        let btc_ts: Vec<_> = data.btc.timestamps().collect();
        let btc_closes: Vec<Option<Decimal>> =
            data.btc.candles().iter().map(|c| Some(c.close)).collect();
        let btc_ema_series = ema(data.btc.candles(), self.config.indicators.ema_period);

        Ok(ContextColumns {
            htf_close: merge_asof(&base_ts, &htf_ts, &htf_closes)?,
            htf_ema: merge_asof(&base_ts, &htf_ts, &htf_ema_series)?,
            btc_close: merge_asof(&base_ts, &btc_ts, &btc_closes)?,
            btc_ema: merge_asof(&base_ts, &btc_ts, &btc_ema_series)?,
        })
    }
}

/// Higher-timeframe and BTC indicator columns aligned to the base series.
struct ContextColumns {
    htf_close: Vec<Option<Decimal>>,
    htf_ema: Vec<Option<Decimal>>,
    btc_close: Vec<Option<Decimal>>,
    btc_ema: Vec<Option<Decimal>>,
}

fn market_state(
    candle: &Candle,
    set: &IndicatorSet,
    columns: &ContextColumns,
    i: usize,
) -> MarketState {
    MarketState {
        htf_close: columns.htf_close[i],
        htf_ema: columns.htf_ema[i],
        close: candle.close,
        ema: set.ema[i],
        roc: set.roc[i],
        rsi: set.rsi[i],
        volume: candle.volume,
        volume_mean_24h: set.volume_mean[i],
    }
}

/// Builds the per-trade notification stream for an externally supplied
/// trade list, e.g. to replay a session summary through the delivery
/// layer.
pub fn trade_messages(trades: &[Trade]) -> Vec<BotMessage> {
    trades
        .iter()
        .map(|trade| BotMessage::TradeClosed(TradeClosed::from(trade)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::Timeframe;
    use rust_decimal_macros::dec;

    fn candle(ts: i64, close: Decimal, volume: Decimal) -> Candle {
        Candle {
            open_time: Utc.timestamp_opt(ts, 0).unwrap(),
            open: close,
            high: close + dec!(1),
            low: close - dec!(1),
            close,
            volume,
        }
    }

    fn series(pair: &str, timeframe: Timeframe, step: i64, closes: &[(Decimal, Decimal)]) -> CandleSeries {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &(close, volume))| candle(i as i64 * step, close, volume))
            .collect();
        CandleSeries::new(pair, timeframe, candles).unwrap()
    }

    fn flat_data(bars: usize) -> BacktestData {
        let base: Vec<(Decimal, Decimal)> = (0..bars).map(|_| (dec!(100), dec!(10))).collect();
        let higher: Vec<(Decimal, Decimal)> = (0..bars / 12 + 1)
            .map(|_| (dec!(100), dec!(10)))
            .collect();
        BacktestData {
            base: series("ETH/USDT", Timeframe::M5, 300, &base),
            higher: series("ETH/USDT", Timeframe::H1, 3600, &higher),
            btc: series("BTC/USDT", Timeframe::M5, 300, &base),
        }
    }

    #[test]
    fn empty_data_is_an_error() {
        let mut backtester =
            Backtester::new(Config::default(), EmergencyStop::new()).unwrap();
        let mut data = flat_data(10);
        data.base = CandleSeries::new("ETH/USDT", Timeframe::M5, Vec::new()).unwrap();
        assert!(matches!(
            backtester.run(&data),
            Err(BacktestError::DataUnavailable)
        ));
    }

    fn status_of(messages: &[BotMessage]) -> &StatusSummary {
        messages
            .iter()
            .find_map(|m| match m {
                BotMessage::Status(status) => Some(status),
                _ => None,
            })
            .expect("run always emits a final status")
    }

    fn trade_message_count(messages: &[BotMessage]) -> usize {
        messages
            .iter()
            .filter(|m| !matches!(m, BotMessage::Status(_)))
            .count()
    }

    #[test]
    fn flat_market_produces_no_trades() {
        let mut backtester =
            Backtester::new(Config::default(), EmergencyStop::new()).unwrap();
        let report = backtester.run(&flat_data(100)).unwrap();
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.total_return_pct, Decimal::ZERO);
        assert_eq!(trade_message_count(backtester.messages()), 0);
        let status = status_of(backtester.messages());
        assert_eq!(status.balance, dec!(10000));
        assert_eq!(status.total_profit, Decimal::ZERO);
    }

    fn trending_data(collapse: bool) -> BacktestData {
        // A zigzag uptrend (+3 / -2) keeps RSI inside the pullback band
        // while the closes stay above the EMA and ROC stays positive. The
        // volume spike lets the entry fire; the optional collapse hits the
        // stop.
        let mut base: Vec<(Decimal, Decimal)> = Vec::new();
        let mut close = dec!(100);
        for i in 0..85 {
            close += if i % 2 == 0 { dec!(3) } else { dec!(-2) };
            let volume = if i >= 80 { dec!(1000) } else { dec!(10) };
            base.push((close, volume));
        }
        if collapse {
            for i in 0..5 {
                base.push((dec!(60) - Decimal::from(i), dec!(1000)));
            }
        }

        let higher: Vec<(Decimal, Decimal)> =
            (0..9).map(|i| (dec!(90) + Decimal::from(i * 10), dec!(10))).collect();
        BacktestData {
            base: series("ETH/USDT", Timeframe::M5, 300, &base),
            higher: series("ETH/USDT", Timeframe::H1, 3600, &higher),
            btc: series(
                "BTC/USDT",
                Timeframe::M5,
                300,
                &base.iter().map(|&(c, _)| (c, dec!(10))).collect::<Vec<_>>(),
            ),
        }
    }

    #[test]
    fn uptrend_with_collapse_opens_and_closes_a_trade() {
        let mut backtester =
            Backtester::new(Config::default(), EmergencyStop::new()).unwrap();
        let report = backtester.run(&trending_data(true)).unwrap();
        assert!(report.total_trades >= 1);
        // Every closed trade carries a tagged exit reason.
        assert!(report.trades.iter().all(|t| t.exit_reason.is_some()));
        // Open + close notifications were collected.
        assert!(
            backtester
                .messages()
                .iter()
                .any(|m| matches!(m, BotMessage::TradeOpened(_)))
        );
        assert!(
            backtester
                .messages()
                .iter()
                .any(|m| matches!(m, BotMessage::TradeClosed(_)))
        );
        let status = status_of(backtester.messages());
        assert_eq!(status.closed_trades, report.total_trades);
        assert_eq!(status.open_trades, 0);
    }

    #[test]
    fn open_position_is_liquidated_when_data_ends() {
        let mut backtester =
            Backtester::new(Config::default(), EmergencyStop::new()).unwrap();
        // Entry fires at the late volume spike and nothing closes it
        // before the candles run out.
        let report = backtester.run(&trending_data(false)).unwrap();
        assert_eq!(report.total_trades, 1);
        assert_eq!(report.trades[0].exit_reason, Some(ExitReason::EndOfData));
        assert!(
            backtester
                .messages()
                .iter()
                .any(|m| matches!(m, BotMessage::TradeClosed(_)))
        );
        // The forced exit settles the stake back, so the reported profit
        // accounts for the full balance movement.
        let status = status_of(backtester.messages());
        assert_eq!(status.closed_trades, 1);
        assert_eq!(status.total_profit, report.trades[0].profit_loss);
        assert_eq!(status.balance, dec!(10000) + report.trades[0].profit_loss);
    }

    #[test]
    fn emergency_stop_blocks_new_entries() {
        let stop = EmergencyStop::new();
        stop.trigger();
        let mut backtester = Backtester::new(Config::default(), stop).unwrap();
        let report = backtester.run(&trending_data(true)).unwrap();
        assert_eq!(report.total_trades, 0);
        assert_eq!(trade_message_count(backtester.messages()), 0);
        assert_eq!(status_of(backtester.messages()).balance, dec!(10000));
    }
}
