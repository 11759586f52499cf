//! ## Summary
//! The occurrence sequence of a schedule.
//!
//! [`generate`] validates a schedule, fixes its base instant (start,
//! shifted by the timeshift) and returns [`Occurrences`], a lazy
//! ascending iterator over the instants the schedule fires at.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::{CalendarResult, ValidationError};
use crate::expand::{ExpansionRule, RecurrenceIter};
use crate::model::{Instant, Periodical, Schedule, Timeshift};
use crate::relative;
use crate::time::{self, normalize};

/// Lazy, forward-only occurrences of a schedule.
#[derive(Debug, Clone)]
pub struct Occurrences {
    inner: Inner,
    tz: Tz,
    now: DateTime<Tz>,
    base: DateTime<Tz>,
}

#[derive(Debug, Clone)]
enum Inner {
    /// No periodical rule: the base instant, once.
    Once(Option<DateTime<Tz>>),
    /// Expanded instants later than `now`.
    Absolute(RecurrenceIter),
    /// Each expanded anchor resolved to its relative position.
    Relative {
        anchors: RecurrenceIter,
        periodical: Box<Periodical>,
    },
}

impl Occurrences {
    /// Zone every yielded instant is expressed in.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// The reference instant this sequence was generated at.
    #[must_use]
    pub const fn now(&self) -> &DateTime<Tz> {
        &self.now
    }

    /// Start instant after the timeshift.
    #[must_use]
    pub const fn base(&self) -> &DateTime<Tz> {
        &self.base
    }
}

impl Iterator for Occurrences {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            // One-shot schedules fire at the base even when it is past.
            Inner::Once(pending) => pending.take(),
            Inner::Absolute(iter) => {
                let now = self.now;
                iter.find(|dt| *dt > now)
            }
            Inner::Relative {
                anchors,
                periodical,
            } => {
                // Resolved instants are compared against the base, not
                // `now`: a relative schedule whose base is in the past
                // still yields the past positions after it.
                let base = self.base;
                anchors.find_map(|anchor| {
                    relative::resolve(&anchor, periodical).filter(|resolved| *resolved > base)
                })
            }
        }
    }
}

/// ## Summary
/// Builds the occurrence sequence of `schedule` as seen at `now`.
///
/// `now` defaults to the current time. Both `now` and the schedule's
/// instants are normalized to the schedule's zone and whole seconds.
///
/// ## Errors
/// Returns a validation error if the schedule is invalid, or an error if a
/// naive instant cannot be placed in the schedule's zone.
pub fn generate(schedule: &Schedule, now: Option<Instant>) -> CalendarResult<Occurrences> {
    let tz = schedule.validate()?;
    let now = match now {
        Some(instant) => normalize(&instant, tz)?,
        None => time::now(tz),
    };

    let start = schedule.start.as_ref();
    let mut base = match start.and_then(|s| s.on.as_ref()) {
        Some(on) => normalize(on, tz)?,
        None => now,
    };
    if let Some(shift) = start.and_then(|s| s.relative_timeshift) {
        base = apply_timeshift(base, shift)?;
    }

    let Some((periodical, frequency)) = schedule
        .periodical
        .as_ref()
        .and_then(|p| p.repeats.map(|freq| (p, freq)))
    else {
        tracing::debug!(base = %base, "Schedule has no periodical rule, firing once");
        return Ok(Occurrences {
            inner: Inner::Once(Some(base)),
            tz,
            now,
            base,
        });
    };

    let until = schedule
        .stop
        .as_ref()
        .and_then(|stop| stop.on.as_ref())
        .map(|on| normalize(on, tz))
        .transpose()?;
    let count = schedule.stop.as_ref().and_then(|stop| stop.effective_count());

    let rule = ExpansionRule::from_periodical(periodical, frequency, base.naive_local());
    let iter = RecurrenceIter::new(rule, &base, until, count);
    let inner = if periodical.relative.is_some() {
        Inner::Relative {
            anchors: iter,
            periodical: Box::new(periodical.clone()),
        }
    } else {
        Inner::Absolute(iter)
    };

    Ok(Occurrences {
        inner,
        tz,
        now,
        base,
    })
}

/// Shifts `base` when both the delay and its unit are set.
fn apply_timeshift(base: DateTime<Tz>, shift: Timeshift) -> CalendarResult<DateTime<Tz>> {
    let (Some(delay), Some(unit)) = (shift.delay, shift.time_units) else {
        return Ok(base);
    };
    unit.to_delta(delay)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or_else(|| {
            ValidationError::new(
                ["start", "relative_timeshift", "delay"],
                "timeshift is out of range",
            )
            .into()
        })
}
