//! Per-source availability data.
//!
//! A scheduling page divides its range into numbered slots. The catalog keeps
//! two aligned mappings: when each slot starts, and who marked it available.
//! Slot numbers are local to one page; only timestamps are compared across
//! sources.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{OverlapError, Result};

/// Index of a time bucket within one source's schedule.
pub type Slot = u32;

/// Seconds since the Unix epoch (UTC).
pub type Timestamp = i64;

/// Identifier of a participant within one source.
pub type ParticipantId = u64;

/// Slot-level availability of one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotCatalog {
    times: BTreeMap<Slot, Timestamp>,
    participants: BTreeMap<Slot, BTreeSet<ParticipantId>>,
}

impl SlotCatalog {
    /// Build a catalog from extracted mappings.
    ///
    /// Slots absent from `participants` have nobody available. A slot that has
    /// participants but no timestamp makes the catalog unusable.
    ///
    /// # Errors
    /// Returns `OverlapError::MissingTimestamp` naming the first such slot.
    pub fn new(
        times: BTreeMap<Slot, Timestamp>,
        participants: BTreeMap<Slot, BTreeSet<ParticipantId>>,
    ) -> Result<Self> {
        if let Some(&slot) = participants.keys().find(|slot| !times.contains_key(slot)) {
            return Err(OverlapError::MissingTimestamp { slot });
        }
        Ok(Self {
            times,
            participants,
        })
    }

    /// Start building a catalog slot by slot.
    pub fn builder() -> SlotCatalogBuilder {
        SlotCatalogBuilder::default()
    }

    /// Timestamp of a slot, if known.
    pub fn timestamp(&self, slot: Slot) -> Option<Timestamp> {
        self.times.get(&slot).copied()
    }

    /// Participants available at a slot (empty when nobody marked it).
    pub fn participants_at(&self, slot: Slot) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participants
            .get(&slot)
            .into_iter()
            .flat_map(|people| people.iter().copied())
    }

    /// Number of participants available at a slot.
    pub fn count(&self, slot: Slot) -> usize {
        self.participants.get(&slot).map_or(0, BTreeSet::len)
    }

    /// `(slot, participant count)` for every slot with at least one entry.
    pub fn counts(&self) -> impl Iterator<Item = (Slot, usize)> + '_ {
        self.participants
            .iter()
            .map(|(&slot, people)| (slot, people.len()))
    }

    /// Distinct participants across every slot.
    pub fn total_participants(&self) -> usize {
        self.participants
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of slots with a known timestamp.
    pub fn slot_count(&self) -> usize {
        self.times.len()
    }

    /// True when no participant marked any slot.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Incremental construction of a [`SlotCatalog`].
#[derive(Debug, Default)]
pub struct SlotCatalogBuilder {
    times: BTreeMap<Slot, Timestamp>,
    participants: BTreeMap<Slot, BTreeSet<ParticipantId>>,
}

impl SlotCatalogBuilder {
    /// Set the start timestamp of a slot. A later call for the same slot wins.
    pub fn time(mut self, slot: Slot, timestamp: Timestamp) -> Self {
        self.times.insert(slot, timestamp);
        self
    }

    /// Mark a participant available at a slot.
    pub fn available(mut self, slot: Slot, participant: ParticipantId) -> Self {
        self.participants.entry(slot).or_default().insert(participant);
        self
    }

    /// Finish the catalog, checking the timestamp invariant.
    pub fn build(self) -> Result<SlotCatalog> {
        SlotCatalog::new(self.times, self.participants)
    }
}
