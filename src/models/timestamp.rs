//! Lenient timestamp parsing for stored records.
//!
//! Older lists carry bare dates (`2024-01-15`) where newer ones carry full
//! RFC 3339 timestamps. Both are accepted; output is always RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

pub(crate) fn parse(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(Utc::now()),
        Some(s) => parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
    }
}

/// Deadlines are dates, but a few stored lists hold full timestamps.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| parse(s).map(|dt| dt.date_naive()))
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_and_bare_dates() {
        let full = parse("2024-01-15T10:30:00.000Z").unwrap();
        assert_eq!(full.hour(), 10);

        let bare = parse("2024-01-15").unwrap();
        assert_eq!((bare.year(), bare.month(), bare.day()), (2024, 1, 15));
        assert_eq!(bare.hour(), 0);

        assert!(parse("yesterday").is_none());
    }
}
