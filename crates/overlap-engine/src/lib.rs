//! # overlap-engine
//!
//! Finds the best common meeting windows across group-scheduling pages.
//!
//! Each page (a "source") contributes a [`SlotCatalog`]: which participants
//! marked each time slot as available. The engine picks every slot with the
//! highest participation per source, intersects those best times across
//! sources, and then looks for runs of consecutive slots long enough to host a
//! meeting of the requested duration.
//!
//! Everything here works in epoch seconds. Fetching pages, parsing them and
//! rendering human-readable times live outside the algorithmic layer; the
//! [`render`] module is the one presentation helper shipped with the engine.
//!
//! ## Modules
//!
//! - [`catalog`] — Per-source slot → timestamp / participants mappings
//! - [`selector`] — Maximal-availability selection (best times per source)
//! - [`intersect`] — N-way intersection of best-time sets
//! - [`windows`] — Contiguous window search over an intersection
//! - [`orchestrator`] — Pairwise and aggregate comparison of many sources
//! - [`render`] — Timezone-aware formatting of window starts
//! - [`error`] — Error types

pub mod catalog;
pub mod error;
pub mod intersect;
pub mod orchestrator;
pub mod render;
pub mod selector;
pub mod windows;

pub use catalog::{ParticipantId, Slot, SlotCatalog, Timestamp};
pub use error::{OverlapError, SourceError};
pub use intersect::intersect;
pub use orchestrator::{
    process, AggregateReport, CompareOptions, Comparison, LoadedSource, Mode, Outcome, PairEntry,
    PairwiseReport, SourceFailure, SourceLabel, SourceLoader,
};
pub use render::WindowFormatter;
pub use selector::{best_times, select_max, BestTimes};
pub use windows::{find_windows, required_slot_count};
