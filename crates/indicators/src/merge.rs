//! As-of alignment of a higher-timeframe series onto a base timeframe.
//!
//! Each base-timeframe row takes the most recent higher-timeframe value
//! whose timestamp is <= its own (a backward-fill join). A base row that
//! precedes the first higher-timeframe bar gets `None`. Both timestamp
//! slices must be sorted ascending; lookup is a binary search per row.

use crate::{IndicatorError, IndicatorSeries};
use chrono::{DateTime, Utc};

pub fn merge_asof(
    base_timestamps: &[DateTime<Utc>],
    htf_timestamps: &[DateTime<Utc>],
    htf_values: &[Option<rust_decimal::Decimal>],
) -> Result<IndicatorSeries, IndicatorError> {
    if htf_timestamps.len() != htf_values.len() {
        return Err(IndicatorError::LengthMismatch(format!(
            "{} higher-timeframe timestamps vs {} values",
            htf_timestamps.len(),
            htf_values.len()
        )));
    }

    let merged = base_timestamps
        .iter()
        .map(|base_ts| {
            // Index of the first higher-timeframe bar strictly after base_ts;
            // the bar before it is the as-of match.
            let idx = htf_timestamps.partition_point(|ts| ts <= base_ts);
            if idx == 0 { None } else { htf_values[idx - 1] }
        })
        .collect();

    Ok(merged)
}
