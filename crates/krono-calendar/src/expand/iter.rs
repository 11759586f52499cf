use std::collections::VecDeque;

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike,
};
use chrono_tz::Tz;
use krono_core::constants::MAX_EXPANSION_YEAR;

use super::rule::ExpansionRule;
use crate::model::Frequency;
use crate::time::{days_in_month, localize};

/// ## Summary
/// Lazy, ascending expansion of an [`ExpansionRule`].
///
/// Day-level periods are walked in wall-clock time. Sub-daily periods are
/// stepped on the absolute timeline, so a repeated wall-clock hour yields
/// both of its instants and a skipped one yields none.
///
/// Candidates earlier than the start are skipped and not counted. Every
/// yielded instant counts against the occurrence limit. `until` is
/// inclusive. Expansion ends once the period passes `until` or the last
/// supported year.
#[derive(Debug, Clone)]
pub struct RecurrenceIter {
    rule: ExpansionRule,
    tz: Tz,
    start: DateTime<Tz>,
    until: Option<DateTime<Tz>>,
    remaining: Option<u32>,
    /// Start of the next period to expand; `None` once exhausted.
    cursor: Option<Cursor>,
    pending: VecDeque<DateTime<Tz>>,
}

/// Start of a period.
#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// Wall-clock midnight opening a day-level period.
    Calendar(NaiveDateTime),
    /// Instant opening a sub-daily period.
    Timeline(DateTime<Tz>),
}

impl Cursor {
    fn year(self) -> i32 {
        match self {
            Self::Calendar(period) => period.year(),
            Self::Timeline(period) => period.year(),
        }
    }
}

impl RecurrenceIter {
    #[must_use]
    pub fn new(
        rule: ExpansionRule,
        start: &DateTime<Tz>,
        until: Option<DateTime<Tz>>,
        count: Option<u32>,
    ) -> Self {
        let cursor = if rule.is_day_level() {
            calendar_period_start(rule.frequency, start.naive_local().date())
                .map(Cursor::Calendar)
        } else {
            timeline_period_start(rule.frequency, start).map(Cursor::Timeline)
        };
        tracing::trace!(
            frequency = %rule.frequency,
            interval = rule.interval,
            start = %start,
            until = ?until,
            count = ?count,
            "Expanding recurrence"
        );
        Self {
            tz: start.timezone(),
            rule,
            start: *start,
            until,
            remaining: count,
            cursor,
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn rule(&self) -> &ExpansionRule {
        &self.rule
    }

    fn exhaust(&mut self) {
        self.cursor = None;
        self.pending.clear();
    }

    /// Checks whether the period at `cursor` opens more than a day after
    /// `until` or after the last supported year.
    fn beyond_horizon(&self, cursor: Cursor) -> bool {
        if cursor.year() > MAX_EXPANSION_YEAR {
            return true;
        }
        let Some(until) = self.until.as_ref() else {
            return false;
        };
        match cursor {
            Cursor::Calendar(period) => until
                .naive_local()
                .checked_add_signed(TimeDelta::days(1))
                .is_some_and(|limit| period > limit),
            Cursor::Timeline(period) => until
                .checked_add_signed(TimeDelta::days(1))
                .is_some_and(|limit| period > limit),
        }
    }

    /// Queues the candidates of the period at the cursor and advances it.
    /// Returns `false` once no period is left.
    fn fill(&mut self) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        if self.beyond_horizon(cursor) {
            self.exhaust();
            return false;
        }

        let frequency = self.rule.frequency;
        let interval = self.rule.interval;
        match cursor {
            Cursor::Calendar(period) => {
                let candidates = self.calendar_candidates(period.date());
                self.pending.extend(candidates);
                self.cursor = advance_calendar(frequency, period, interval).map(Cursor::Calendar);
            }
            Cursor::Timeline(period) => {
                let candidate = self.timeline_candidate(period);
                self.pending.extend(candidate);
                self.cursor = timeline_step(frequency, interval)
                    .and_then(|step| period.checked_add_signed(step))
                    .map(Cursor::Timeline);
            }
        }
        true
    }

    /// Selected dates of the period opening on `first`, at the rule's time
    /// of day. Nonexistent local times are shifted forward.
    fn calendar_candidates(&self, first: NaiveDate) -> Vec<DateTime<Tz>> {
        let rule = &self.rule;
        let Some(time) = NaiveTime::from_hms_opt(
            rule.hour.unwrap_or(0),
            rule.minute.unwrap_or(0),
            rule.second.unwrap_or(0),
        ) else {
            return Vec::new();
        };
        rule.days
            .select(period_dates(rule.frequency, first))
            .into_iter()
            .filter_map(|date| {
                let naive = date.and_time(time);
                let placed = localize(naive, self.tz);
                if placed.is_none() {
                    tracing::trace!(local = %naive, "Skipping unplaceable local time");
                }
                placed
            })
            .collect()
    }

    /// The instant of the sub-daily period opening at `period` whose local
    /// minute and second match the rule's.
    fn timeline_candidate(&self, period: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let shift = |target: Option<u32>, current: u32| {
            i64::from(target.unwrap_or(current)) - i64::from(current)
        };
        let offset = shift(self.rule.minute, period.minute()) * 60
            + shift(self.rule.second, period.second());
        period.checked_add_signed(TimeDelta::try_seconds(offset)?)
    }
}

impl Iterator for RecurrenceIter {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == Some(0) {
                self.exhaust();
                return None;
            }

            let Some(dt) = self.pending.pop_front() else {
                if self.fill() {
                    continue;
                }
                return None;
            };
            if dt < self.start {
                continue;
            }
            if self.until.as_ref().is_some_and(|until| dt > *until) {
                self.exhaust();
                return None;
            }

            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
            return Some(dt);
        }
    }
}

/// Wall-clock midnight opening the day-level period containing `date`.
fn calendar_period_start(frequency: Frequency, date: NaiveDate) -> Option<NaiveDateTime> {
    let first = match frequency {
        Frequency::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        Frequency::Monthly => date.with_day(1),
        Frequency::Weekly => date.checked_sub_signed(TimeDelta::days(i64::from(
            date.weekday().num_days_from_monday(),
        ))),
        Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
            Some(date)
        }
    };
    first.map(|d| d.and_time(NaiveTime::MIN))
}

/// Instant opening the sub-daily period containing `start`.
fn timeline_period_start(frequency: Frequency, start: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let into_period = match frequency {
        Frequency::Hourly => start.minute() * 60 + start.second(),
        Frequency::Minutely => start.second(),
        Frequency::Yearly
        | Frequency::Monthly
        | Frequency::Weekly
        | Frequency::Daily
        | Frequency::Secondly => 0,
    };
    start
        .with_nanosecond(0)?
        .checked_sub_signed(TimeDelta::try_seconds(i64::from(into_period))?)
}

/// Length of `interval` sub-daily periods.
fn timeline_step(frequency: Frequency, interval: u32) -> Option<TimeDelta> {
    let step = i64::from(interval);
    match frequency {
        Frequency::Hourly => TimeDelta::try_hours(step),
        Frequency::Minutely => TimeDelta::try_minutes(step),
        Frequency::Secondly => TimeDelta::try_seconds(step),
        Frequency::Yearly | Frequency::Monthly | Frequency::Weekly | Frequency::Daily => None,
    }
}

/// Start of the day-level period `interval` periods after `period`.
fn advance_calendar(
    frequency: Frequency,
    period: NaiveDateTime,
    interval: u32,
) -> Option<NaiveDateTime> {
    let step = i64::from(interval);
    match frequency {
        Frequency::Yearly => period.checked_add_months(Months::new(interval.checked_mul(12)?)),
        Frequency::Monthly => period.checked_add_months(Months::new(interval)),
        Frequency::Weekly => period.checked_add_signed(TimeDelta::try_weeks(step)?),
        Frequency::Daily => period.checked_add_signed(TimeDelta::try_days(step)?),
        Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => None,
    }
}

/// Dates of the day-level period starting on `first`.
fn period_dates(frequency: Frequency, first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let len = match frequency {
        Frequency::Yearly => {
            if first.leap_year() {
                366
            } else {
                365
            }
        }
        Frequency::Monthly => days_in_month(first.year(), first.month()),
        Frequency::Weekly => 7,
        Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => 1,
    };
    first.iter_days().take(usize::try_from(len).unwrap_or_default())
}
