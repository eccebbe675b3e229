use chrono::{DateTime, Utc};
use core_types::{ExitReason, Position, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Notification data for a freshly opened trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOpened {
    pub pair: String,
    pub timestamp: DateTime<Utc>,
    pub entry_price: Decimal,
    pub stake: Decimal,
    pub stop_loss: Decimal,
}

impl From<&Position> for TradeOpened {
    fn from(position: &Position) -> Self {
        Self {
            pair: position.pair.clone(),
            timestamp: position.entry_time,
            entry_price: position.entry_price,
            stake: position.stake,
            stop_loss: position.stop_loss,
        }
    }
}

/// Notification data for a closed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeClosed {
    pub pair: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub exit_price: Option<Decimal>,
    pub profit_loss: Decimal,
    pub exit_reason: Option<ExitReason>,
}

impl From<&Trade> for TradeClosed {
    fn from(trade: &Trade) -> Self {
        Self {
            pair: trade.pair.clone(),
            timestamp: trade.exit_time,
            exit_price: trade.exit_price,
            profit_loss: trade.profit_loss,
            exit_reason: trade.exit_reason,
        }
    }
}

/// A periodic status/profit summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub timestamp: DateTime<Utc>,
    pub balance: Decimal,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub total_profit: Decimal,
}

/// The top-level message envelope.
///
/// `#[serde(tag = "type", content = "payload")]` keeps the JSON shape easy
/// for the delivery layer to dispatch on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BotMessage {
    TradeOpened(TradeOpened),
    TradeClosed(TradeClosed),
    Status(StatusSummary),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn trade_opened_from_position() {
        let position = Position {
            pair: "SOL/USDT".to_string(),
            entry_time: Utc::now(),
            entry_price: dec!(150),
            stake: dec!(300),
            amount: dec!(2),
            stop_loss: dec!(140),
            trailing_stop: None,
        };
        let event = TradeOpened::from(&position);
        assert_eq!(event.pair, "SOL/USDT");
        assert_eq!(event.stake, dec!(300));
        assert_eq!(event.stop_loss, dec!(140));
    }

    #[test]
    fn status_summary_round_trips() {
        let status = StatusSummary {
            timestamp: Utc::now(),
            balance: dec!(10250.5),
            open_trades: 2,
            closed_trades: 14,
            total_profit: dec!(250.5),
        };
        let json = serde_json::to_string(&BotMessage::Status(status.clone())).unwrap();
        let parsed: BotMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, BotMessage::Status(status));
    }

    #[test]
    fn message_envelope_is_tagged() {
        let trade = Trade {
            trade_id: Uuid::new_v4(),
            pair: "BTC/USDT".to_string(),
            entry_time: Utc::now(),
            entry_price: dec!(100),
            stake: dec!(100),
            amount: dec!(1),
            exit_time: Some(Utc::now()),
            exit_price: Some(dec!(110)),
            exit_reason: Some(ExitReason::TrendBreak),
            fees: dec!(0.1),
            slippage: dec!(0.05),
            profit_loss: dec!(9.85),
        };
        let message = BotMessage::TradeClosed(TradeClosed::from(&trade));
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "TradeClosed");
        assert_eq!(json["payload"]["pair"], "BTC/USDT");
    }
}
