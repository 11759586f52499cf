//! Timezone-aware instant normalization.
//!
//! All instants handled by the engine are truncated to whole seconds and
//! expressed in the schedule's zone.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use krono_core::constants::DEFAULT_TIMEZONE;

use crate::error::{CalendarError, CalendarResult, ValidationError};
use crate::model::Instant;

/// ## Summary
/// Resolves an IANA zone identifier; absent or empty names mean UTC.
///
/// ## Errors
/// Returns a validation error at path `timezone` for unknown identifiers.
pub fn resolve_timezone(name: Option<&str>) -> CalendarResult<Tz> {
    let name = match name.map(str::trim) {
        None | Some("") => DEFAULT_TIMEZONE,
        Some(name) => name,
    };

    Tz::from_str(name).map_err(|_err| {
        ValidationError::new(["timezone"], format!("unknown timezone '{name}'")).into()
    })
}

/// Drops the sub-second part of `dt`.
#[must_use]
pub fn truncate_seconds<Z: TimeZone>(dt: DateTime<Z>) -> DateTime<Z> {
    let truncated = dt.with_nanosecond(0);
    truncated.unwrap_or(dt)
}

/// Current instant in `tz`, whole seconds.
#[must_use]
pub fn now(tz: Tz) -> DateTime<Tz> {
    truncate_seconds(Utc::now().with_timezone(&tz))
}

/// ## Summary
/// Interprets a wall-clock time in `tz`.
///
/// Ambiguous times (DST fold) resolve to the earlier instant. Nonexistent
/// times (DST gap) are shifted forward by one hour, the way RFC 5545 reads
/// them with the offset in force before the gap.
///
/// Returns `None` only if the shifted time is still nonexistent.
#[must_use]
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest),
        LocalResult::None => {
            tracing::trace!(
                local = %naive,
                tz = %tz,
                "Local time falls in a DST gap, shifting forward"
            );
            tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
        }
    }
}

/// ## Summary
/// Expresses `instant` in `tz`, whole seconds.
///
/// A naive instant is read as wall-clock time in `tz`; a zoned instant is
/// converted to `tz`.
///
/// ## Errors
/// Returns an error if a naive instant cannot be placed on the zone's timeline.
pub fn normalize(instant: &Instant, tz: Tz) -> CalendarResult<DateTime<Tz>> {
    let dt = match instant {
        Instant::Naive(naive) => localize(*naive, tz)
            .ok_or_else(|| CalendarError::NonexistentLocalTime(format!("{naive} in {tz}")))?,
        Instant::Zoned(zoned) => zoned.with_timezone(&tz),
    };
    Ok(truncate_seconds(dt))
}

/// ## Summary
/// Parses an instant string and normalizes it to the named zone.
///
/// ## Errors
/// Returns a validation error if the text or zone is invalid.
pub fn normalize_isoformat(text: &str, tz: Option<&str>) -> CalendarResult<DateTime<Tz>> {
    let tz = resolve_timezone(tz)?;
    let instant = Instant::parse(text).ok_or_else(|| {
        ValidationError::new(Vec::<String>::new(), format!("invalid datetime: {text}"))
    })?;
    normalize(&instant, tz)
}

/// Monday through Friday.
#[must_use]
pub fn is_weekday(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 5
}

/// Saturday and Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    !is_weekday(date)
}

/// Number of days in the given month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(31, |last| last.day())
}
