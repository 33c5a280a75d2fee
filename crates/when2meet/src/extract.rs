//! Extraction of availability data embedded in a When2Meet page.
//!
//! The page's `<script>` blocks assign three families of globals:
//!
//! - `TimeOfSlot[slot]=<epoch seconds>;`
//! - `AvailableAtSlot[slot].push(<person id>);`
//! - `PeopleNames[i] = '<name>';PeopleIDs[i] = <person id>;`
//!
//! The event title lives in the `NewEventNameDiv` element, followed by the
//! "To invite people…" boilerplate.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::LazyLock;

use overlap_engine::{ParticipantId, Slot, SlotCatalog, SourceError, Timestamp};
use regex::Regex;
use tracing::debug;

// Any `<script>` block is scanned, whatever its `type` attribute.
static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>(.*?)</script>").expect("script pattern is valid")
});

static TIME_OF_SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"TimeOfSlot\[\s*(\d+)\s*\]\s*=\s*(\d+)\s*;").expect("TimeOfSlot pattern is valid")
});

static AVAILABLE_AT_SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"AvailableAtSlot\[\s*(\d+)\s*\]\.push\(\s*(\d+)\s*\);")
        .expect("AvailableAtSlot pattern is valid")
});

static PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"PeopleNames\[\s*(\d+)\s*\]\s*=\s*'([^']+)'\s*;\s*PeopleIDs\[\s*(\d+)\s*\]\s*=\s*(\d+)\s*;",
    )
    .expect("PeopleNames pattern is valid")
});

static EVENT_NAME_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*\bid\s*=\s*["']?NewEventNameDiv["']?[^>]*>(.*?)</div>"#)
        .expect("event name pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

const INVITE_MARKER: &str = "To invite";

/// Everything a page tells us about one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Event title, if the page has a non-empty one.
    pub name: Option<String>,
    pub catalog: SlotCatalog,
    /// Participant id → display name.
    pub roster: BTreeMap<ParticipantId, String>,
}

/// Parse a page's markup into its catalog, title and roster.
///
/// # Errors
/// Returns `SourceError::Extraction` when the page carries no slot timestamps,
/// no availability entries, a number that does not fit, or availability for a
/// slot without a timestamp.
pub fn extract_page(html: &str) -> Result<ExtractedPage, SourceError> {
    let mut times: BTreeMap<Slot, Timestamp> = BTreeMap::new();
    let mut participants: BTreeMap<Slot, BTreeSet<ParticipantId>> = BTreeMap::new();
    let mut roster = BTreeMap::new();

    for script in SCRIPT.captures_iter(html) {
        let body = &script[1];

        for caps in TIME_OF_SLOT.captures_iter(body) {
            times.insert(number(&caps[1], "slot")?, number(&caps[2], "timestamp")?);
        }

        for caps in AVAILABLE_AT_SLOT.captures_iter(body) {
            participants
                .entry(number(&caps[1], "slot")?)
                .or_default()
                .insert(number(&caps[2], "person id")?);
        }

        for caps in PERSON.captures_iter(body) {
            // Name and id must belong to the same roster index.
            if caps[1] != caps[3] {
                continue;
            }
            roster.insert(number(&caps[4], "person id")?, caps[2].to_string());
        }
    }

    if times.is_empty() {
        return Err(SourceError::Extraction(
            "no TimeOfSlot data found in page".to_string(),
        ));
    }
    if participants.is_empty() {
        return Err(SourceError::Extraction(
            "no AvailableAtSlot data found in page".to_string(),
        ));
    }

    debug!(
        slots = times.len(),
        marked = participants.len(),
        people = roster.len(),
        "extracted availability"
    );

    let catalog =
        SlotCatalog::new(times, participants).map_err(|e| SourceError::Extraction(e.to_string()))?;

    Ok(ExtractedPage {
        name: extract_event_name(html),
        catalog,
        roster,
    })
}

/// Event title: the text of `NewEventNameDiv` up to the invite boilerplate.
pub fn extract_event_name(html: &str) -> Option<String> {
    let inner = EVENT_NAME_DIV.captures(html)?;
    let text = TAG.replace_all(&inner[1], " ");
    let text = decode_entities(&text);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let name = match text.find(INVITE_MARKER) {
        Some(pos) => text[..pos].trim(),
        None => text.trim(),
    };
    (!name.is_empty()).then(|| name.to_string())
}

fn number<T: FromStr>(digits: &str, what: &str) -> Result<T, SourceError> {
    digits
        .parse()
        .map_err(|_| SourceError::Extraction(format!("{what} out of range: {digits}")))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}
