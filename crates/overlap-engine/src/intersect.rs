//! Cross-source intersection of best-time sets.

use std::collections::BTreeSet;

use crate::catalog::Timestamp;
use crate::error::{OverlapError, Result};

/// Intersect any number of best-time sets.
///
/// A timestamp survives only if it appears in every set. A single set is
/// returned unchanged. The order of `sets` does not affect the result.
///
/// # Errors
/// Returns `OverlapError::EmptyIntersectionInput` when `sets` is empty, so
/// callers can tell "nothing to intersect" apart from "intersected to nothing".
pub fn intersect<'a, I>(sets: I) -> Result<BTreeSet<Timestamp>>
where
    I: IntoIterator<Item = &'a BTreeSet<Timestamp>>,
{
    let mut sets = sets.into_iter();
    let first = sets.next().ok_or(OverlapError::EmptyIntersectionInput)?;

    let mut common = first.clone();
    for set in sets {
        if common.is_empty() {
            break;
        }
        common.retain(|timestamp| set.contains(timestamp));
    }

    tracing::debug!(common = common.len(), "intersected best-time sets");
    Ok(common)
}
