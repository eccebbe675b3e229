//! Exit signal generation.
//!
//! Evaluated once per open position per bar, with a strict priority order:
//! hard stop-loss, then trailing stop (only while active), then trend
//! break. The first match wins and the remaining checks are skipped, so a
//! bar that violates both the stop and the trend reports `StopLoss`.

use core_types::{ExitReason, MarketState, Position};
use serde::Serialize;
use tracing::debug;

/// The tagged outcome of one exit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitDecision {
    Hold,
    Exit(ExitReason),
}

impl ExitDecision {
    pub fn should_exit(&self) -> bool {
        matches!(self, ExitDecision::Exit(_))
    }

    pub fn reason(&self) -> Option<ExitReason> {
        match self {
            ExitDecision::Exit(reason) => Some(*reason),
            ExitDecision::Hold => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExitSignalGenerator;

impl ExitSignalGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, position: &Position, state: &MarketState) -> ExitDecision {
        let price = state.close;

        if price <= position.stop_loss {
            debug!(pair = %position.pair, %price, stop = %position.stop_loss, "stop-loss hit");
            return ExitDecision::Exit(ExitReason::StopLoss);
        }

        if let Some(trailing) = position.trailing_stop {
            if price <= trailing {
                debug!(pair = %position.pair, %price, %trailing, "trailing stop hit");
                return ExitDecision::Exit(ExitReason::TrailingStop);
            }
        }

        // Trend break needs both the EMA cross and volume confirmation;
        // undefined indicator values fail the check.
        let trend_broken = state.ema.is_some_and(|ema| price < ema);
        let volume_confirmed = state
            .volume_mean_24h
            .is_some_and(|mean| state.volume > mean);
        if trend_broken && volume_confirmed {
            debug!(pair = %position.pair, %price, "trend break");
            return ExitDecision::Exit(ExitReason::TrendBreak);
        }

        ExitDecision::Hold
    }
}
