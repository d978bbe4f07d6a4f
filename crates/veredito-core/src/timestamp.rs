//! Timestamp normalisation for process dates.
//!
//! Inbound dates arrive from several front ends, so parsing is lenient:
//!
//! - RFC 3339 with any offset: `2024-11-18T00:00:00Z`, `2024-11-18T09:30:00-03:00`
//! - Naive date-time, taken as UTC: `2024-11-18T00:00:00`, `2024-11-18 00:00:00.5`
//! - Bare date, midnight UTC: `2024-11-18`
//!
//! Output is always RFC 3339 in UTC with a `Z` suffix, which is the form the
//! canonical process rendering embeds in prompts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serializer;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp in any accepted form, normalised to UTC.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}
