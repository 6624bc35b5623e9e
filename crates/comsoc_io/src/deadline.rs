//! RFC3339 deadlines. Offsets are accepted and normalized to UTC.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{IoError, IoResult};

pub fn parse_deadline(s: &str) -> IoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| IoError::Deadline { value: s.to_string(), msg: e.to_string() })
}

/// `YYYY-MM-DDTHH:MM:SSZ` (sub-second digits only when present).
pub fn format_deadline(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
