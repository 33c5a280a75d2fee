//! Maximal-availability selection.
//!
//! The "best times" of a source are the slots marked by the largest number of
//! participants. Ties are kept: every slot at the maximum is an equally good
//! option.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{SlotCatalog, Timestamp};

/// The best times of one source together with the counts behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BestTimes {
    /// Participant count shared by every best slot (0 for an empty catalog).
    pub max_count: usize,
    /// Distinct participants who marked at least one slot.
    pub total_participants: usize,
    /// Start timestamps of the best slots.
    pub timestamps: BTreeSet<Timestamp>,
}

/// Timestamps of every slot whose participant count equals the catalog maximum.
///
/// Returns an empty set when nobody marked any slot.
pub fn select_max(catalog: &SlotCatalog) -> BTreeSet<Timestamp> {
    best_times(catalog).timestamps
}

/// Like [`select_max`], but also reports the maximum and total participant counts.
pub fn best_times(catalog: &SlotCatalog) -> BestTimes {
    let Some(max_count) = catalog.counts().map(|(_, count)| count).max() else {
        return BestTimes::default();
    };

    // `SlotCatalog` guarantees a timestamp for every slot in its participant mapping.
    let timestamps = catalog
        .counts()
        .filter(|&(_, count)| count == max_count)
        .filter_map(|(slot, _)| catalog.timestamp(slot))
        .collect();

    BestTimes {
        max_count,
        total_participants: catalog.total_participants(),
        timestamps,
    }
}
