//! Signal generation.
//!
//! Pure decision logic: the regime classifier, the six-predicate entry
//! signal generator and the priority-ordered exit signal generator. This
//! crate knows nothing about exchanges, persistence or execution; it
//! consumes indicator-derived snapshots and produces tagged decisions.

pub mod entry;
pub mod error;
pub mod exit;
pub mod regime;

pub use entry::{
    EntryAnalysis, EntrySignalGenerator, FixedRsiZone, RegimeRsiZone, RsiZonePolicy,
};
pub use error::StrategyError;
pub use exit::{ExitDecision, ExitSignalGenerator};
pub use regime::{RegimeClassifier, classify};
