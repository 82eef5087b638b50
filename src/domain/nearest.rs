// Nearest-sample lookup for pointer interaction
use crate::domain::error::TideError;
use crate::domain::tide::Sample;
use chrono::{DateTime, Utc};

/// Find the sample closest in time to `t` in a chronologically sorted series.
///
/// Binary search for the first sample at or after `t` (searching from index 1),
/// then pick between it and its predecessor. Ties go to the earlier sample.
pub fn nearest_sample(series: &[Sample], t: DateTime<Utc>) -> Result<&Sample, TideError> {
    if series.is_empty() {
        return Err(TideError::InsufficientData("observation series is empty"));
    }

    let idx = 1 + series[1..].partition_point(|sample| sample.time < t);
    let before = &series[idx - 1];
    let Some(after) = series.get(idx) else {
        return Ok(before);
    };

    if t - before.time > after.time - t {
        Ok(after)
    } else {
        Ok(before)
    }
}
