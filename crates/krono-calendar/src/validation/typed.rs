use chrono_tz::Tz;

use super::rules::FieldRange;
use crate::error::{CalendarResult, ValidationError};
use crate::model::{Periodical, Schedule, Stop, Timeshift, weekday_index};
use crate::time::resolve_timezone;

impl Schedule {
    /// ## Summary
    /// Checks every range and mode rule and resolves the schedule's zone.
    ///
    /// Runs on every generator call; nothing is cached.
    ///
    /// ## Errors
    /// Returns a validation error for out-of-range fields, relative mode
    /// with an unsupported frequency or combined with day filters, and
    /// unknown zone identifiers.
    pub fn validate(&self) -> CalendarResult<Tz> {
        if let Some(shift) = self.start.as_ref().and_then(|s| s.relative_timeshift.as_ref()) {
            validate_timeshift(shift)?;
        }
        if let Some(periodical) = &self.periodical {
            validate_periodical(periodical)?;
        }
        if let Some(stop) = &self.stop {
            validate_stop(stop)?;
        }
        resolve_timezone(self.timezone.as_deref())
    }
}

fn validate_timeshift(shift: &Timeshift) -> Result<(), ValidationError> {
    if let Some(delay) = shift.delay {
        FieldRange::POSITIVE.check(i64::from(delay), &["start", "relative_timeshift", "delay"])?;
    }
    Ok(())
}

fn validate_periodical(periodical: &Periodical) -> Result<(), ValidationError> {
    FieldRange::POSITIVE.check(i64::from(periodical.every), &["periodical", "every"])?;

    let fields = [
        (periodical.month, FieldRange::MONTH, "month"),
        (periodical.day, FieldRange::DAY, "day"),
        (periodical.hour, FieldRange::HOUR, "hour"),
        (periodical.minute, FieldRange::MINUTE, "minute"),
        (periodical.second, FieldRange::SECOND, "second"),
    ];
    for (value, range, name) in fields {
        if let Some(value) = value {
            range.check(i64::from(value), &["periodical", name])?;
        }
    }
    if let Some(weekdays) = &periodical.weekday {
        for weekday in weekdays {
            FieldRange::WEEKDAY
                .check(i64::from(weekday_index(*weekday)), &["periodical", "weekday"])?;
        }
    }

    if periodical.relative.is_some() {
        if let Some(repeats) = periodical.repeats.filter(|f| !f.supports_relative()) {
            return Err(ValidationError::new(
                ["periodical", "repeats"],
                format!(
                    "relative datetime can be with \"monthly\" or \"yearly\" rotation type \
                     only, got \"{repeats}\""
                ),
            ));
        }
        let conflicting = [
            ("month", periodical.month.is_some()),
            ("day", periodical.day.is_some()),
            ("weekday", periodical.weekday.is_some()),
        ];
        if let Some((name, _)) = conflicting.iter().find(|(_, present)| *present) {
            return Err(ValidationError::new(
                ["periodical", *name],
                "not allowed together with relative_day and relative_day_index",
            ));
        }
    }
    Ok(())
}

fn validate_stop(stop: &Stop) -> Result<(), ValidationError> {
    if let Some(count) = stop.after_num_repeats {
        FieldRange::POSITIVE.check(i64::from(count), &["stop", "after_num_repeats"])?;
    }
    Ok(())
}
