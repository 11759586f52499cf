//! Closed vocabularies of the schedule DSL.

use std::fmt;

use chrono::{TimeDelta, Weekday};

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

/// A periodical field that may act as a recurrence filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Every,
    Weekday,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Daily => "daily",
            Self::Hourly => "hourly",
            Self::Minutely => "minutely",
            Self::Secondly => "secondly",
        }
    }

    /// Parses a frequency from its lowercase name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "yearly" => Self::Yearly,
            "monthly" => Self::Monthly,
            "weekly" => Self::Weekly,
            "daily" => Self::Daily,
            "hourly" => Self::Hourly,
            "minutely" => Self::Minutely,
            "secondly" => Self::Secondly,
            _ => return None,
        })
    }

    /// ## Summary
    /// Returns the fields that act as filters at this frequency.
    ///
    /// Fields finer than what a frequency can express are listed; coarser
    /// day/month filters are ignored by the finer frequencies.
    #[must_use]
    pub const fn sensitivity(self) -> &'static [FilterField] {
        use FilterField::{Day, Every, Hour, Minute, Month, Second, Weekday};
        match self {
            Self::Yearly => &[Every, Weekday, Month, Day, Hour, Minute, Second],
            Self::Monthly => &[Every, Weekday, Day, Hour, Minute, Second],
            Self::Weekly => &[Every, Weekday, Hour, Minute, Second],
            Self::Daily => &[Every, Hour, Minute, Second],
            Self::Hourly => &[Every, Minute, Second],
            Self::Minutely => &[Every, Second],
            Self::Secondly => &[Every],
        }
    }

    /// Checks whether `field` is applied at this frequency.
    #[must_use]
    pub fn applies(self, field: FilterField) -> bool {
        self.sensitivity().contains(&field)
    }

    /// Rank from coarsest (0, yearly) to finest (6, secondly).
    const fn rank(self) -> u8 {
        match self {
            Self::Yearly => 0,
            Self::Monthly => 1,
            Self::Weekly => 2,
            Self::Daily => 3,
            Self::Hourly => 4,
            Self::Minutely => 5,
            Self::Secondly => 6,
        }
    }

    /// Checks whether this frequency's period is longer than `other`'s.
    #[must_use]
    pub const fn is_coarser_than(self, other: Self) -> bool {
        self.rank() < other.rank()
    }

    /// Relative-position mode is only defined for monthly and yearly rules.
    #[must_use]
    pub const fn supports_relative(self) -> bool {
        matches!(self, Self::Monthly | Self::Yearly)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a start timeshift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

impl TimeUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "seconds" => Self::Seconds,
            "minutes" => Self::Minutes,
            "hours" => Self::Hours,
            "days" => Self::Days,
            "weeks" => Self::Weeks,
            "months" => Self::Months,
            _ => return None,
        })
    }

    /// ## Summary
    /// Converts `amount` of this unit into a fixed duration.
    ///
    /// A month is exactly four weeks here, not a calendar month.
    ///
    /// Returns `None` when the duration does not fit a [`TimeDelta`].
    #[must_use]
    pub fn to_delta(self, amount: u32) -> Option<TimeDelta> {
        let amount = i64::from(amount);
        match self {
            Self::Seconds => TimeDelta::try_seconds(amount),
            Self::Minutes => TimeDelta::try_minutes(amount),
            Self::Hours => TimeDelta::try_hours(amount),
            Self::Days => TimeDelta::try_days(amount),
            Self::Weeks => TimeDelta::try_weeks(amount),
            Self::Months => amount.checked_mul(4).and_then(TimeDelta::try_weeks),
        }
    }

    /// Names of every unit, for error messages.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Seconds,
            Self::Minutes,
            Self::Hours,
            Self::Days,
            Self::Weeks,
            Self::Months,
        ]
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which day a relative position counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeDay {
    /// Any calendar day.
    Day,
    /// Monday through Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl RelativeDay {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "day" => Self::Day,
            "weekday" => Self::Weekday,
            "weekend" => Self::Weekend,
            "monday" => Self::Monday,
            "tuesday" => Self::Tuesday,
            "wednesday" => Self::Wednesday,
            "thursday" => Self::Thursday,
            "friday" => Self::Friday,
            "saturday" => Self::Saturday,
            "sunday" => Self::Sunday,
            _ => return None,
        })
    }

    /// Returns the named weekday, or `None` for the day/category variants.
    #[must_use]
    pub const fn named_weekday(self) -> Option<Weekday> {
        match self {
            Self::Monday => Some(Weekday::Mon),
            Self::Tuesday => Some(Weekday::Tue),
            Self::Wednesday => Some(Weekday::Wed),
            Self::Thursday => Some(Weekday::Thu),
            Self::Friday => Some(Weekday::Fri),
            Self::Saturday => Some(Weekday::Sat),
            Self::Sunday => Some(Weekday::Sun),
            Self::Day | Self::Weekday | Self::Weekend => None,
        }
    }
}

impl fmt::Display for RelativeDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal of a relative position inside its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeIndex {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl RelativeIndex {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Last => "last",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "first" => Self::First,
            "second" => Self::Second,
            "third" => Self::Third,
            "fourth" => Self::Fourth,
            "last" => Self::Last,
            _ => return None,
        })
    }

    /// Returns the 1-based forward ordinal, `None` for [`RelativeIndex::Last`].
    #[must_use]
    pub const fn ordinal(self) -> Option<u32> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }
}

impl fmt::Display for RelativeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the DSL weekday number (Monday = 0 … Sunday = 6) to a weekday.
#[must_use]
pub const fn weekday_from_index(index: u32) -> Option<Weekday> {
    Some(match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        6 => Weekday::Sun,
        _ => return None,
    })
}

/// Inverse of [`weekday_from_index`].
#[must_use]
pub fn weekday_index(weekday: Weekday) -> u32 {
    weekday.num_days_from_monday()
}
