//! Pair selection.
//!
//! An ordered, non-reorderable filter pipeline over a snapshot of all
//! tradable pairs. Every stage preserves the relative order of survivors;
//! only the final stage re-sorts, by volatility descending.

pub mod error;

pub use error::ScannerError;

use configuration::ScannerSettings;
use core_types::PairData;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

/// The pair-filter pipeline.
///
/// Blacklist patterns are compiled once here; an invalid pattern is a
/// configuration error surfaced at construction, never at scan time.
#[derive(Debug)]
pub struct Scanner {
    settings: ScannerSettings,
    blacklist: Vec<Regex>,
}

impl Scanner {
    pub fn new(settings: ScannerSettings) -> Result<Self, ScannerError> {
        let blacklist = settings
            .blacklist
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .map_err(|source| ScannerError::InvalidBlacklistPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            settings,
            blacklist,
        })
    }

    /// Runs the full pipeline over a snapshot and returns the surviving
    /// pair records, sorted by volatility descending.
    pub fn scan(&self, snapshot: &[PairData]) -> Vec<PairData> {
        let mut pairs = self.top_by_volume(snapshot);
        debug!(survivors = pairs.len(), "scanner: volume rank");

        pairs.retain(|p| !self.is_blacklisted(&p.symbol));
        debug!(survivors = pairs.len(), "scanner: blacklist");

        pairs.retain(|p| p.spread_ratio <= self.settings.max_spread);
        debug!(survivors = pairs.len(), "scanner: spread");

        pairs.retain(|p| p.price >= self.settings.min_price);
        debug!(survivors = pairs.len(), "scanner: price floor");

        pairs.retain(|p| {
            p.volatility >= self.settings.volatility_min
                && p.volatility <= self.settings.volatility_max
        });
        debug!(survivors = pairs.len(), "scanner: volatility band");

        pairs.retain(|p| p.return_60m > Decimal::ZERO);
        debug!(survivors = pairs.len(), "scanner: 60m return");

        pairs.sort_by(|a, b| b.volatility.cmp(&a.volatility));
        pairs.truncate(self.settings.max_pairs);
        debug!(selected = pairs.len(), "scanner: final selection");

        pairs
    }

    /// Convenience view: just the surviving symbols, in final order.
    pub fn scan_symbols(&self, snapshot: &[PairData]) -> Vec<String> {
        self.scan(snapshot).into_iter().map(|p| p.symbol).collect()
    }

    /// Stage 1: the top-N pairs by quote volume. The sort is stable, so
    /// pairs with equal volume keep their snapshot order.
    fn top_by_volume(&self, snapshot: &[PairData]) -> Vec<PairData> {
        let mut pairs = snapshot.to_vec();
        pairs.sort_by(|a, b| b.quote_volume.cmp(&a.quote_volume));
        pairs.truncate(self.settings.min_volume_rank);
        pairs
    }

    fn is_blacklisted(&self, symbol: &str) -> bool {
        self.blacklist.iter().any(|re| re.is_match(symbol))
    }
}
