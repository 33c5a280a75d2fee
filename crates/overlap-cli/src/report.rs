//! Rendering of comparison results as text or JSON.

use std::collections::BTreeMap;

use overlap_engine::orchestrator::UNKNOWN_NAME;
use overlap_engine::{
    AggregateReport, Comparison, Mode, Outcome, OverlapError, PairwiseReport, SourceError,
    SourceLabel, Timestamp,
};
use serde::Serialize;
use when2meet::ExtractedPage;

use crate::config::Settings;

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

pub fn comparison_text(comparison: &Comparison, settings: &Settings) -> String {
    match comparison {
        Comparison::Pairwise(report) => pairwise_text(report, settings),
        Comparison::Aggregate(report) => aggregate_text(report, settings),
    }
}

fn pairwise_text(report: &PairwiseReport, settings: &Settings) -> String {
    let anchor = report.anchor.display_name();
    let blocks: Vec<String> = report
        .entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(outcome) => {
                let between = format!("between {anchor} and {}", entry.other.display_name());
                outcome_text(outcome, &between, settings)
            }
            Err(error) => error_line(&entry.other.source, error),
        })
        .collect();
    blocks.join("\n\n")
}

fn aggregate_text(report: &AggregateReport, settings: &Settings) -> String {
    let names: Vec<&str> = report.sources.iter().map(SourceLabel::display_name).collect();
    let across = format!("across {}", names.join(", "));

    let mut blocks = vec![match &report.outcome {
        Ok(outcome) => outcome_text(outcome, &across, settings),
        Err(error) => error.to_string(),
    }];
    blocks.extend(
        report
            .failures
            .iter()
            .map(|failure| error_line(&failure.source, &failure.error)),
    );
    blocks.join("\n\n")
}

fn outcome_text(outcome: &Outcome, scope: &str, settings: &Settings) -> String {
    match outcome {
        Outcome::Windows { starts } => {
            let covered = covered_seconds(settings);
            let lines: Vec<String> = starts
                .iter()
                .map(|&start| format!("  - {}", settings.formatter.window(start, covered)))
                .collect();
            format!("Overlapping slots {scope}:\n{}", lines.join("\n"))
        }
        Outcome::NoOverlap => format!("No overlapping slots found {scope}"),
        Outcome::NoWindowFit { common } => format!(
            "Common best times {scope} ({} slots), but none long enough for {} minutes",
            common.len(),
            settings.options.duration_seconds / 60
        ),
    }
}

fn error_line(source: &str, error: &SourceError) -> String {
    format!("Error processing {source}: {error}")
}

pub fn best_text(source: &str, page: &ExtractedPage, settings: &Settings) -> String {
    let best = best_slots(page);
    let name = page.name.as_deref().unwrap_or(UNKNOWN_NAME);
    if best.slots.is_empty() {
        return format!("No availability recorded for {name} ({source})");
    }

    let lines: Vec<String> = best
        .slots
        .iter()
        .map(|slot| {
            format!(
                "  - {}: {}",
                settings.formatter.instant(slot.start),
                slot.participants.join(", ")
            )
        })
        .collect();
    format!(
        "Best times for {name} ({} of {} participants):\n{}",
        best.max_count,
        best.total_participants,
        lines.join("\n")
    )
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WindowDto {
    start: Timestamp,
    end: Timestamp,
    label: String,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum StatusDto {
    Windows { windows: Vec<WindowDto> },
    NoOverlap,
    NoWindowFit { common: Vec<Timestamp> },
    Error { message: String },
}

#[derive(Serialize)]
struct PairDto<'a> {
    other: &'a SourceLabel,
    #[serde(flatten)]
    status: StatusDto,
}

#[derive(Serialize)]
struct SourceFailureDto<'a> {
    source: &'a str,
    error: &'a SourceError,
}

#[derive(Serialize)]
struct PairwiseDto<'a> {
    mode: Mode,
    timezone: &'a str,
    interval_minutes: i64,
    duration_minutes: i64,
    anchor: &'a SourceLabel,
    pairs: Vec<PairDto<'a>>,
}

#[derive(Serialize)]
struct AggregateDto<'a> {
    mode: Mode,
    timezone: &'a str,
    interval_minutes: i64,
    duration_minutes: i64,
    sources: &'a [SourceLabel],
    result: StatusDto,
    failures: Vec<SourceFailureDto<'a>>,
}

pub fn comparison_json(comparison: &Comparison, settings: &Settings) -> serde_json::Result<String> {
    let timezone = settings.timezone();
    let interval_minutes = settings.options.interval_seconds / 60;
    let duration_minutes = settings.options.duration_seconds / 60;

    match comparison {
        Comparison::Pairwise(report) => serde_json::to_string_pretty(&PairwiseDto {
            mode: Mode::Pairwise,
            timezone,
            interval_minutes,
            duration_minutes,
            anchor: &report.anchor,
            pairs: report
                .entries
                .iter()
                .map(|entry| PairDto {
                    other: &entry.other,
                    status: match &entry.result {
                        Ok(outcome) => outcome_dto(outcome, settings),
                        Err(error) => StatusDto::Error {
                            message: error.to_string(),
                        },
                    },
                })
                .collect(),
        }),
        Comparison::Aggregate(report) => serde_json::to_string_pretty(&AggregateDto {
            mode: Mode::Aggregate,
            timezone,
            interval_minutes,
            duration_minutes,
            sources: &report.sources,
            result: aggregate_status(&report.outcome, settings),
            failures: report
                .failures
                .iter()
                .map(|failure| SourceFailureDto {
                    source: &failure.source,
                    error: &failure.error,
                })
                .collect(),
        }),
    }
}

fn aggregate_status(outcome: &Result<Outcome, OverlapError>, settings: &Settings) -> StatusDto {
    match outcome {
        Ok(outcome) => outcome_dto(outcome, settings),
        Err(error) => StatusDto::Error {
            message: error.to_string(),
        },
    }
}

fn outcome_dto(outcome: &Outcome, settings: &Settings) -> StatusDto {
    match outcome {
        Outcome::Windows { starts } => {
            let covered = covered_seconds(settings);
            StatusDto::Windows {
                windows: starts
                    .iter()
                    .map(|&start| WindowDto {
                        start,
                        end: start.saturating_add(covered),
                        label: settings.formatter.window(start, covered),
                    })
                    .collect(),
            }
        }
        Outcome::NoOverlap => StatusDto::NoOverlap,
        Outcome::NoWindowFit { common } => StatusDto::NoWindowFit {
            common: common.clone(),
        },
    }
}

#[derive(Serialize)]
struct BestSlotDto {
    start: Timestamp,
    label: String,
    participants: Vec<String>,
}

#[derive(Serialize)]
struct BestDto<'a> {
    source: &'a str,
    name: Option<&'a str>,
    timezone: &'a str,
    max_count: usize,
    total_participants: usize,
    best: Vec<BestSlotDto>,
}

pub fn best_json(source: &str, page: &ExtractedPage, settings: &Settings) -> serde_json::Result<String> {
    let best = best_slots(page);
    let dto = BestDto {
        source,
        name: page.name.as_deref(),
        timezone: settings.timezone(),
        max_count: best.max_count,
        total_participants: best.total_participants,
        best: best
            .slots
            .into_iter()
            .map(|slot| BestSlotDto {
                label: settings.formatter.instant(slot.start),
                start: slot.start,
                participants: slot.participants,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&dto)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn covered_seconds(settings: &Settings) -> i64 {
    // Settings are validated on construction.
    settings
        .options
        .covered_seconds()
        .unwrap_or(settings.options.duration_seconds)
}

struct BestSlot {
    start: Timestamp,
    participants: Vec<String>,
}

struct BestSlots {
    max_count: usize,
    total_participants: usize,
    slots: Vec<BestSlot>,
}

/// Best slots of one page with the names of who is available, by start time.
fn best_slots(page: &ExtractedPage) -> BestSlots {
    let best = overlap_engine::best_times(&page.catalog);
    let catalog = &page.catalog;

    let by_start: BTreeMap<Timestamp, Vec<String>> = catalog
        .counts()
        .filter(|&(_, count)| count == best.max_count)
        .filter_map(|(slot, _)| {
            let start = catalog.timestamp(slot)?;
            let names = catalog
                .participants_at(slot)
                .map(|id| page.roster.get(&id).cloned().unwrap_or_else(|| id.to_string()))
                .collect();
            Some((start, names))
        })
        .collect();

    BestSlots {
        max_count: best.max_count,
        total_participants: best.total_participants,
        slots: by_start
            .into_iter()
            .map(|(start, participants)| BestSlot {
                start,
                participants,
            })
            .collect(),
    }
}
