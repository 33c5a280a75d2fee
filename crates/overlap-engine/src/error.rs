//! Error types for overlap-engine operations.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Slot;

/// A failure confined to a single source.
///
/// These are produced by the fetch and extraction collaborators and are
/// recorded next to the source they belong to instead of aborting a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SourceError {
    /// The source identifier is not a recognised scheduling-page link.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The page could not be retrieved (network failure, non-2xx status, unreadable file).
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The page was retrieved but its embedded availability data is missing or incomplete.
    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// Errors that stop an operation as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlapError {
    /// The caller supplied too few sources or otherwise misused the API.
    #[error("{0}")]
    Usage(String),

    /// Slot interval must be a positive number of seconds.
    #[error("Invalid slot interval: {0} seconds (must be positive)")]
    InvalidInterval(i64),

    /// Meeting duration cannot be negative.
    #[error("Invalid duration: {0} seconds (must not be negative)")]
    InvalidDuration(i64),

    /// The timezone is not a valid IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A participant entry refers to a slot with no known timestamp.
    #[error("Slot {slot} has participants but no timestamp")]
    MissingTimestamp { slot: Slot },

    /// No best-time set reached the intersection step.
    #[error("Nothing to intersect: no source produced availability data")]
    EmptyIntersectionInput,

    /// Too few sources loaded to compare anything across groups.
    #[error("Only {loaded} source could be processed; at least two are needed to compare")]
    InsufficientSources { loaded: usize },

    /// The anchor source of a pairwise comparison could not be loaded.
    #[error("Error processing anchor {anchor}: {error}")]
    AnchorFailed { anchor: String, error: SourceError },
}

pub type Result<T> = std::result::Result<T, OverlapError>;
