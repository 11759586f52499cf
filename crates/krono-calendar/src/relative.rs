//! ## Summary
//! Relative-position resolution.
//!
//! Maps an anchor instant to a position inside its month (monthly rules)
//! or year (yearly rules): the Nth or last named weekday, the Nth or
//! last weekday/weekend day, or the Nth or last day of the period.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::model::{Frequency, Periodical, RelativeDay, RelativePosition};
use crate::time::{days_in_month, is_weekday, is_weekend, localize};

/// ## Summary
/// Resolves the periodical's relative position in the period containing
/// `anchor`.
///
/// The time of day is the periodical's hour, minute and second where set,
/// the anchor's otherwise.
///
/// Returns `None` if the periodical is not a monthly or yearly
/// relative-position rule.
#[must_use]
pub fn resolve(anchor: &DateTime<Tz>, periodical: &Periodical) -> Option<DateTime<Tz>> {
    let position = periodical.relative?;
    let frequency = periodical.repeats?;
    let local = anchor.naive_local();

    let date = resolve_date(local.date(), frequency, position)?;
    let time = NaiveTime::from_hms_opt(
        periodical.hour.unwrap_or(local.hour()),
        periodical.minute.unwrap_or(local.minute()),
        periodical.second.unwrap_or(local.second()),
    )?;
    localize(date.and_time(time), anchor.timezone())
}

/// ## Summary
/// Resolves `position` in the month (monthly) or year (yearly) containing
/// `anchor`.
///
/// Returns `None` for other frequencies.
#[must_use]
pub fn resolve_date(
    anchor: NaiveDate,
    frequency: Frequency,
    position: RelativePosition,
) -> Option<NaiveDate> {
    let (first, last) = period_bounds(anchor, frequency)?;

    match (position.day, position.index.ordinal()) {
        (RelativeDay::Day, Some(n)) => first.with_day(n),
        (RelativeDay::Day, None) => Some(last),
        (RelativeDay::Weekday, n) => nth_matching(first, last, n, is_weekday),
        (RelativeDay::Weekend, n) => nth_matching(first, last, n, is_weekend),
        (named, n) => {
            let weekday = named.named_weekday()?;
            nth_matching(first, last, n, |date| date.weekday() == weekday)
        }
    }
}

/// First and last day of the period containing `anchor`.
fn period_bounds(anchor: NaiveDate, frequency: Frequency) -> Option<(NaiveDate, NaiveDate)> {
    let year = anchor.year();
    match frequency {
        Frequency::Monthly => {
            let month = anchor.month();
            Some((
                NaiveDate::from_ymd_opt(year, month, 1)?,
                NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?,
            ))
        }
        Frequency::Yearly => Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )),
        Frequency::Weekly
        | Frequency::Daily
        | Frequency::Hourly
        | Frequency::Minutely
        | Frequency::Secondly => None,
    }
}

/// The `n`th date in `first..=last` matching `pred`, scanning forward; the
/// last match, scanning backward from `last`, when `n` is `None`.
fn nth_matching(
    first: NaiveDate,
    last: NaiveDate,
    n: Option<u32>,
    pred: impl Fn(NaiveDate) -> bool,
) -> Option<NaiveDate> {
    match n {
        Some(n) => {
            let skip = usize::try_from(n.checked_sub(1)?).ok()?;
            first
                .iter_days()
                .take_while(|date| *date <= last)
                .filter(|date| pred(*date))
                .nth(skip)
        }
        None => std::iter::successors(Some(last), NaiveDate::pred_opt)
            .take_while(|date| *date >= first)
            .find(|date| pred(*date)),
    }
}
