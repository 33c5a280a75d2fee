//! When2Meet link handling.
//!
//! Event links look like `https://www.when2meet.com/?29202537-8Ue7q`: a
//! numeric event id followed by a short access key.

use std::sync::LazyLock;

use overlap_engine::SourceError;
use regex::Regex;

static EVENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?(\d+)-").expect("event id pattern is valid"));

/// True for `http://` and `https://` sources; anything else is a local path.
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Numeric event id of a When2Meet link.
///
/// # Errors
/// Returns `SourceError::InvalidSource` if the link has no `?<digits>-` part.
pub fn event_id(link: &str) -> Result<u64, SourceError> {
    EVENT_ID
        .captures(link)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| SourceError::InvalidSource(format!("not a When2Meet link: {link}")))
}
