//! Pairwise and aggregate comparison of many sources.
//!
//! Sources are loaded one at a time, in input order, through a
//! [`SourceLoader`]. A source that fails to load is recorded next to its
//! result and the batch carries on; only the anchor of a pairwise comparison
//! is allowed to fail the whole run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{SlotCatalog, Timestamp};
use crate::error::{OverlapError, Result, SourceError};
use crate::intersect::intersect;
use crate::selector::{best_times, BestTimes};
use crate::windows::{find_windows, required_slot_count};

/// Label used when a page does not carry a display name.
pub const UNKNOWN_NAME: &str = "Unknown Event";

/// Default slot granularity of a scheduling page (15 minutes).
pub const DEFAULT_INTERVAL_SECONDS: i64 = 15 * 60;

/// Default meeting length (30 minutes).
pub const DEFAULT_DURATION_SECONDS: i64 = 30 * 60;

/// One source after fetching and extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    /// Display name of the group, if the page has one.
    pub name: Option<String>,
    pub catalog: SlotCatalog,
}

/// Turns a source identifier (URL, path) into availability data.
pub trait SourceLoader {
    fn load(&self, source: &str) -> std::result::Result<LoadedSource, SourceError>;
}

impl<F> SourceLoader for F
where
    F: Fn(&str) -> std::result::Result<LoadedSource, SourceError>,
{
    fn load(&self, source: &str) -> std::result::Result<LoadedSource, SourceError> {
        self(source)
    }
}

/// How sources are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The first source against each of the others, one result per pair.
    #[default]
    Pairwise,
    /// One N-way intersection across every source.
    Aggregate,
}

/// Parameters of a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub mode: Mode,
    /// Slot granularity in seconds.
    pub interval_seconds: i64,
    /// Requested meeting length in seconds.
    pub duration_seconds: i64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }
}

impl CompareOptions {
    /// Check the window parameters, returning the number of slots a window spans.
    pub fn validate(&self) -> Result<usize> {
        required_slot_count(self.interval_seconds, self.duration_seconds)
    }

    /// Seconds actually covered by one window (the duration rounded up to whole slots).
    pub fn covered_seconds(&self) -> Result<i64> {
        let slots = i64::try_from(self.validate()?.max(1)).unwrap_or(i64::MAX);
        Ok(slots.saturating_mul(self.interval_seconds))
    }
}

/// Identifies a source in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLabel {
    /// The identifier the caller passed in.
    pub source: String,
    /// Display name from the page; `None` if the source never loaded or had none.
    pub name: Option<String>,
}

impl SourceLabel {
    fn new(source: &str, name: Option<String>) -> Self {
        Self {
            source: source.to_string(),
            name,
        }
    }

    /// The page name, or [`UNKNOWN_NAME`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}

/// Result of intersecting best times and searching for windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Window starts, ascending.
    Windows { starts: Vec<Timestamp> },
    /// The best-time sets have nothing in common.
    NoOverlap,
    /// Common best times exist but no run is long enough.
    NoWindowFit { common: Vec<Timestamp> },
}

impl Outcome {
    fn classify(common: &BTreeSet<Timestamp>, options: &CompareOptions) -> Result<Self> {
        if common.is_empty() {
            return Ok(Outcome::NoOverlap);
        }
        let starts = find_windows(common, options.interval_seconds, options.duration_seconds)?;
        if starts.is_empty() {
            Ok(Outcome::NoWindowFit {
                common: common.iter().copied().collect(),
            })
        } else {
            Ok(Outcome::Windows { starts })
        }
    }

    /// Window starts, empty unless this is [`Outcome::Windows`].
    pub fn starts(&self) -> &[Timestamp] {
        match self {
            Outcome::Windows { starts } => starts,
            _ => &[],
        }
    }
}

/// One anchor/other comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEntry {
    pub other: SourceLabel,
    pub result: std::result::Result<Outcome, SourceError>,
}

/// Result of a pairwise run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseReport {
    pub anchor: SourceLabel,
    pub anchor_best: BestTimes,
    /// One entry per non-anchor source, in input order.
    pub entries: Vec<PairEntry>,
}

/// A source that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

/// Result of an aggregate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    /// Sources that loaded and took part in the intersection, in input order.
    pub sources: Vec<SourceLabel>,
    /// Sources that failed to load, in input order.
    pub failures: Vec<SourceFailure>,
    /// `Err(OverlapError::EmptyIntersectionInput)` when no source loaded,
    /// `Err(OverlapError::InsufficientSources)` when only one did.
    pub outcome: Result<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Pairwise(PairwiseReport),
    Aggregate(AggregateReport),
}

/// Compare the best times of `sources` according to `options`.
///
/// # Errors
/// - `OverlapError::Usage` if fewer than two sources are given.
/// - `OverlapError::InvalidInterval` / `InvalidDuration` for bad window options.
/// - `OverlapError::AnchorFailed` if the first source fails to load in pairwise mode.
///
/// Every other per-source failure is reported inside the returned [`Comparison`].
pub fn process<S, L>(sources: &[S], loader: &L, options: &CompareOptions) -> Result<Comparison>
where
    S: AsRef<str>,
    L: SourceLoader + ?Sized,
{
    if sources.len() < 2 {
        return Err(OverlapError::Usage(
            "Please provide at least two sources to compare".to_string(),
        ));
    }
    options.validate()?;

    match options.mode {
        Mode::Pairwise => process_pairwise(sources, loader, options).map(Comparison::Pairwise),
        Mode::Aggregate => process_aggregate(sources, loader, options).map(Comparison::Aggregate),
    }
}

fn load_best<L>(loader: &L, source: &str) -> std::result::Result<(SourceLabel, BestTimes), SourceError>
where
    L: SourceLoader + ?Sized,
{
    let loaded = loader.load(source)?;
    let best = best_times(&loaded.catalog);
    debug!(
        source,
        slots = loaded.catalog.slot_count(),
        participants = best.total_participants,
        max_count = best.max_count,
        best = best.timestamps.len(),
        "selected best times"
    );
    Ok((SourceLabel::new(source, loaded.name), best))
}

fn process_pairwise<S, L>(
    sources: &[S],
    loader: &L,
    options: &CompareOptions,
) -> Result<PairwiseReport>
where
    S: AsRef<str>,
    L: SourceLoader + ?Sized,
{
    let anchor_source = sources[0].as_ref();
    let (anchor, anchor_best) =
        load_best(loader, anchor_source).map_err(|error| OverlapError::AnchorFailed {
            anchor: anchor_source.to_string(),
            error,
        })?;

    let mut entries = Vec::with_capacity(sources.len() - 1);
    for source in &sources[1..] {
        let source = source.as_ref();
        let entry = match load_best(loader, source) {
            Ok((other, best)) => {
                let common = intersect([&anchor_best.timestamps, &best.timestamps])?;
                PairEntry {
                    other,
                    result: Ok(Outcome::classify(&common, options)?),
                }
            }
            Err(error) => {
                warn!(source, %error, "skipping source");
                PairEntry {
                    other: SourceLabel::new(source, None),
                    result: Err(error),
                }
            }
        };
        entries.push(entry);
    }

    Ok(PairwiseReport {
        anchor,
        anchor_best,
        entries,
    })
}

fn process_aggregate<S, L>(
    sources: &[S],
    loader: &L,
    options: &CompareOptions,
) -> Result<AggregateReport>
where
    S: AsRef<str>,
    L: SourceLoader + ?Sized,
{
    let mut labels = Vec::new();
    let mut best_sets = Vec::new();
    let mut failures = Vec::new();

    for source in sources {
        let source = source.as_ref();
        match load_best(loader, source) {
            Ok((label, best)) => {
                labels.push(label);
                best_sets.push(best.timestamps);
            }
            Err(error) => {
                warn!(source, %error, "skipping source");
                failures.push(SourceFailure {
                    source: source.to_string(),
                    error,
                });
            }
        }
    }

    // A lone surviving source has nothing to be compared against.
    let outcome = if best_sets.len() == 1 {
        Err(OverlapError::InsufficientSources { loaded: 1 })
    } else {
        intersect(&best_sets).and_then(|common| Outcome::classify(&common, options))
    };

    Ok(AggregateReport {
        sources: labels,
        failures,
        outcome,
    })
}
