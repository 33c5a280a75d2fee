//! Human-readable rendering of window starts.
//!
//! Presentation only: the engine itself never looks at timezones.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::catalog::Timestamp;
use crate::error::{OverlapError, Result};

const START_FORMAT: &str = "%a %d %b %Y %I:%M %p";
const END_FORMAT: &str = "%I:%M %p %Z";
const INSTANT_FORMAT: &str = "%a %d %b %Y %I:%M %p %Z";

/// Formats timestamps and windows in one IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFormatter {
    tz: Tz,
}

impl WindowFormatter {
    /// # Errors
    /// Returns `OverlapError::InvalidTimezone` if `timezone` is not a valid IANA identifier.
    pub fn new(timezone: &str) -> Result<Self> {
        let tz = timezone
            .parse()
            .map_err(|_| OverlapError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// The zone times are rendered in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// e.g. `Tue 04 Mar 2025 09:00 AM EST`.
    pub fn instant(&self, timestamp: Timestamp) -> String {
        match to_utc(timestamp) {
            Some(dt) => dt.with_timezone(&self.tz).format(INSTANT_FORMAT).to_string(),
            None => timestamp.to_string(),
        }
    }

    /// e.g. `Tue 04 Mar 2025 09:00 AM - 09:30 AM EST`.
    ///
    /// The end is `start + covered_seconds`, so pass the duration rounded up to
    /// whole slots.
    pub fn window(&self, start: Timestamp, covered_seconds: i64) -> String {
        let end = start.saturating_add(covered_seconds);
        match (to_utc(start), to_utc(end)) {
            (Some(start), Some(end)) => format!(
                "{} - {}",
                start.with_timezone(&self.tz).format(START_FORMAT),
                end.with_timezone(&self.tz).format(END_FORMAT)
            ),
            _ => format!("{start} - {end}"),
        }
    }
}

fn to_utc(timestamp: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}
