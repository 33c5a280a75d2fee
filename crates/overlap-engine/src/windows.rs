//! Contiguous window search.
//!
//! A meeting of `duration` seconds on a schedule with `interval`-second slots
//! needs `ceil(duration / interval)` consecutive slots. A window start is any
//! candidate whose following slots, spaced exactly one interval apart, are all
//! candidates too. A slot that is adjacent in time but missing from the set
//! breaks the run.

use std::collections::BTreeSet;

use crate::catalog::Timestamp;
use crate::error::{OverlapError, Result};

/// Number of consecutive slots needed to cover `duration_seconds`.
///
/// Durations that are not a multiple of the interval round up, so a window
/// always covers at least the requested duration.
///
/// # Errors
/// Returns `OverlapError::InvalidInterval` if the interval is not positive and
/// `OverlapError::InvalidDuration` if the duration is negative.
pub fn required_slot_count(slot_interval_seconds: i64, duration_seconds: i64) -> Result<usize> {
    if slot_interval_seconds <= 0 {
        return Err(OverlapError::InvalidInterval(slot_interval_seconds));
    }
    if duration_seconds < 0 {
        return Err(OverlapError::InvalidDuration(duration_seconds));
    }
    let count = duration_seconds
        .unsigned_abs()
        .div_ceil(slot_interval_seconds.unsigned_abs());
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

/// Find every start timestamp of a run of consecutive candidates long enough
/// for `duration_seconds`.
///
/// Starts are returned in ascending order. When a single slot is enough
/// (`required_slot_count <= 1`), every candidate is a start.
///
/// # Errors
/// Propagates the validation errors of [`required_slot_count`].
pub fn find_windows(
    candidates: &BTreeSet<Timestamp>,
    slot_interval_seconds: i64,
    duration_seconds: i64,
) -> Result<Vec<Timestamp>> {
    let required = required_slot_count(slot_interval_seconds, duration_seconds)?;
    if required <= 1 {
        return Ok(candidates.iter().copied().collect());
    }

    let starts = candidates
        .iter()
        .copied()
        .filter(|&start| {
            (1..required).all(|i| {
                // An offset past the end of the timeline cannot be a candidate.
                i64::try_from(i)
                    .ok()
                    .and_then(|i| i.checked_mul(slot_interval_seconds))
                    .and_then(|offset| start.checked_add(offset))
                    .is_some_and(|next| candidates.contains(&next))
            })
        })
        .collect();

    Ok(starts)
}
