//! Trade-level risk management.
//!
//! Three independent pieces: the ATR stop-loss calculator, the trailing-stop
//! ratchet and the Kelly-criterion position sizer. Each validates its own
//! parameters at construction and fails fast on a broken configuration.

pub mod error;
pub mod kelly;
pub mod stop_loss;
pub mod trailing;

pub use error::RiskError;
pub use kelly::KellySizer;
pub use stop_loss::StopLossManager;
pub use trailing::TrailingStopManager;
