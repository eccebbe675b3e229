pub mod enums;
pub mod error;
pub mod halt;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ExitReason, Regime, Timeframe};
pub use error::CoreError;
pub use halt::EmergencyStop;
pub use structs::{Candle, CandleSeries, MarketState, PairData, Position, Trade};
