//! Structured notification payloads.
//!
//! The core only supplies the data; an external command-and-notification
//! layer formats and delivers it. Everything here is a plain serializable
//! struct so that layer can render messages however it likes.

pub mod messages;

pub use messages::{BotMessage, StatusSummary, TradeClosed, TradeOpened};
