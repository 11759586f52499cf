use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

/// An instant as written in a schedule: either naive wall-clock time,
/// interpreted in the schedule's zone, or carrying its own UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instant {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

/// Naive layouts accepted after RFC 3339 fails.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl Instant {
    /// ## Summary
    /// Parses an RFC 3339 or naive ISO 8601 instant.
    ///
    /// Accepts `2019-03-20T22:00:00+07:00`, `2019-03-20T22:00:00`,
    /// `2019-03-20T22:00`, the same with a space separator, and a bare
    /// date (midnight).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
            return Some(Self::Zoned(zoned));
        }
        if let Ok(zoned) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(Self::Zoned(zoned));
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Self::Naive(naive));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self::Naive)
    }

    #[must_use]
    pub const fn is_naive(&self) -> bool {
        matches!(self, Self::Naive(_))
    }
}

impl FromStr for Instant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid datetime: {s}"))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
            Self::Zoned(zoned) => write!(f, "{}", zoned.to_rfc3339()),
        }
    }
}

impl From<NaiveDateTime> for Instant {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Naive(naive)
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for Instant {
    fn from(dt: DateTime<Z>) -> Self {
        Self::Zoned(dt.fixed_offset())
    }
}
