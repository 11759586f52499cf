use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::model::{FilterField, Frequency, Periodical};

/// Which dates of a day-level period are candidates.
///
/// A date is selected when it matches every present filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySelector {
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekdays: Vec<Weekday>,
}

impl DaySelector {
    /// Selects the candidate dates among `dates`.
    pub(crate) fn select(&self, dates: impl Iterator<Item = NaiveDate>) -> Vec<NaiveDate> {
        dates
            .filter(|date| self.month.is_none_or(|m| date.month() == m))
            .filter(|date| self.day.is_none_or(|d| date.day() == d))
            .filter(|date| self.weekdays.is_empty() || self.weekdays.contains(&date.weekday()))
            .collect()
    }
}

/// A periodical rule with its start-derived defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub days: DaySelector,
    /// Fixed time-of-day fields; `None` means the field steps with the
    /// period (only for sub-daily frequencies).
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
}

impl ExpansionRule {
    /// ## Summary
    /// Builds the rule for `periodical` at `frequency`, starting at `start`.
    ///
    /// Only the fields `frequency` is sensitive to are applied. When neither
    /// a day nor a weekday filter applies, yearly rules default the month
    /// (if unset) and day to the start's, monthly rules default the day
    /// and weekly rules default the weekday. Time-of-day fields default to
    /// the start's for frequencies coarser than the field.
    ///
    /// Relative-position rules expand the same way; each selected date
    /// only names the period the position is resolved in.
    #[must_use]
    pub fn from_periodical(
        periodical: &Periodical,
        frequency: Frequency,
        start: NaiveDateTime,
    ) -> Self {
        let applied =
            |field: FilterField, value: Option<u32>| value.filter(|_| frequency.applies(field));

        let weekdays = periodical
            .weekday
            .as_ref()
            .filter(|_| frequency.applies(FilterField::Weekday))
            .cloned()
            .unwrap_or_default();
        let month = applied(FilterField::Month, periodical.month);
        let day = applied(FilterField::Day, periodical.day);

        // Relative rules carry no day filters, so their anchors take the
        // start's day and skip periods too short for it.
        let days = if day.is_none() && weekdays.is_empty() {
            match frequency {
                Frequency::Yearly => DaySelector {
                    month: month.or(Some(start.month())),
                    day: Some(start.day()),
                    weekdays,
                },
                Frequency::Monthly => DaySelector {
                    month,
                    day: Some(start.day()),
                    weekdays,
                },
                Frequency::Weekly => DaySelector {
                    month,
                    day,
                    weekdays: vec![start.weekday()],
                },
                Frequency::Daily
                | Frequency::Hourly
                | Frequency::Minutely
                | Frequency::Secondly => DaySelector {
                    month,
                    day,
                    weekdays,
                },
            }
        } else {
            DaySelector {
                month,
                day,
                weekdays,
            }
        };

        let time_field =
            |field: FilterField, value: Option<u32>, unit: Frequency, from_start: u32| {
                applied(field, value)
                    .or_else(|| frequency.is_coarser_than(unit).then_some(from_start))
            };

        Self {
            frequency,
            interval: periodical.every.max(1),
            days,
            hour: time_field(
                FilterField::Hour,
                periodical.hour,
                Frequency::Hourly,
                start.hour(),
            ),
            minute: time_field(
                FilterField::Minute,
                periodical.minute,
                Frequency::Minutely,
                start.minute(),
            ),
            second: time_field(
                FilterField::Second,
                periodical.second,
                Frequency::Secondly,
                start.second(),
            ),
        }
    }

    /// Daily and coarser rules select dates; finer ones step through time.
    #[must_use]
    pub const fn is_day_level(&self) -> bool {
        !matches!(
            self.frequency,
            Frequency::Hourly | Frequency::Minutely | Frequency::Secondly
        )
    }
}
