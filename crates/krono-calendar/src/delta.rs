//! Wait time until a schedule's next occurrence.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::CalendarResult;
use crate::generator::generate;
use crate::model::{Instant, Schedule};

/// Seconds to wait and the instant being waited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub seconds: i64,
    pub next: DateTime<Tz>,
}

/// Whole seconds from `from` until `to`, rounded up.
#[must_use]
pub fn seconds_until(from: &DateTime<Tz>, to: &DateTime<Tz>) -> i64 {
    let span = to.signed_duration_since(from);
    let seconds = span.num_seconds();
    if span.subsec_nanos() > 0 {
        seconds + 1
    } else {
        seconds
    }
}

/// ## Summary
/// Computes how long to wait for the next occurrence of `schedule`.
///
/// - No occurrence at all: `(0, now)`.
/// - The first occurrence is not in the future (one-shot schedules with a
///   past start): the second occurrence is used, or `(seconds, now)` with
///   the non-positive wait of the first if there is none.
/// - Otherwise the wait until the first occurrence.
///
/// ## Errors
/// Returns the same errors as [`generate`].
pub fn delta(schedule: &Schedule, now: Option<Instant>) -> CalendarResult<Delta> {
    let mut occurrences = generate(schedule, now)?;
    let now = *occurrences.now();

    let Some(first) = occurrences.next() else {
        tracing::debug!("Schedule has no further occurrences");
        return Ok(Delta {
            seconds: 0,
            next: now,
        });
    };

    let seconds = seconds_until(&now, &first);
    if seconds > 0 {
        return Ok(Delta {
            seconds,
            next: first,
        });
    }

    Ok(occurrences.next().map_or(
        Delta { seconds, next: now },
        |second| Delta {
            seconds: seconds_until(&now, &second),
            next: second,
        },
    ))
}
