use chrono::Weekday;

use super::{Frequency, Instant, RelativeDay, RelativeIndex, TimeUnit};

/// A recurrence schedule definition.
///
/// An absent `periodical` section (or one without `repeats`) makes this a
/// one-shot schedule producing a single instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub start: Option<Start>,
    pub periodical: Option<Periodical>,
    pub stop: Option<Stop>,
    /// IANA zone identifier, UTC when absent.
    pub timezone: Option<String>,
}

/// Where the schedule begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Start {
    pub on: Option<Instant>,
    /// Added to `on` (or to the reference instant when `on` is absent).
    pub relative_timeshift: Option<Timeshift>,
}

/// A shift applied to the start instant; ignored unless both parts are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeshift {
    pub delay: Option<u32>,
    pub time_units: Option<TimeUnit>,
}

/// The recurrence rule.
///
/// `month`, `day` and `weekday` select days in absolute mode. `relative`
/// switches to relative-position mode, which excludes those three fields;
/// `hour`, `minute` and `second` refine the time of day in both modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Periodical {
    pub repeats: Option<Frequency>,
    pub every: u32,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekday: Option<Vec<Weekday>>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub relative: Option<RelativePosition>,
}

/// "last friday", "first weekend", "fourth day", …
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelativePosition {
    pub day: RelativeDay,
    pub index: RelativeIndex,
}

/// When the schedule ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stop {
    /// Disables `after_num_repeats`; `on` still bounds the sequence.
    pub never: bool,
    /// Inclusive upper bound.
    pub on: Option<Instant>,
    pub after_num_repeats: Option<u32>,
}

impl Schedule {
    /// Creates an empty schedule: fires once, at the reference instant.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the absolute start instant.
    #[must_use]
    pub fn starting_on(mut self, on: impl Into<Instant>) -> Self {
        self.start.get_or_insert_with(Start::default).on = Some(on.into());
        self
    }

    /// Shifts the start by `delay` units.
    #[must_use]
    pub fn shifted_by(mut self, delay: u32, time_units: TimeUnit) -> Self {
        self.start.get_or_insert_with(Start::default).relative_timeshift = Some(Timeshift {
            delay: Some(delay),
            time_units: Some(time_units),
        });
        self
    }

    /// Sets the recurrence rule.
    #[must_use]
    pub fn repeating(mut self, periodical: Periodical) -> Self {
        self.periodical = Some(periodical);
        self
    }

    /// Sets the stop bounds.
    #[must_use]
    pub fn stopping(mut self, stop: Stop) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Sets the IANA zone.
    #[must_use]
    pub fn in_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    /// Returns the recurrence frequency, `None` for one-shot schedules.
    #[must_use]
    pub fn frequency(&self) -> Option<Frequency> {
        self.periodical.as_ref().and_then(|p| p.repeats)
    }

    /// Returns the relative position when relative-position mode is active.
    #[must_use]
    pub fn relative_position(&self) -> Option<RelativePosition> {
        self.periodical.as_ref().and_then(|p| p.relative)
    }
}

impl Default for Periodical {
    fn default() -> Self {
        Self {
            repeats: None,
            every: 1,
            month: None,
            day: None,
            weekday: None,
            hour: None,
            minute: None,
            second: None,
            relative: None,
        }
    }
}

impl Periodical {
    /// Creates a rule repeating at `repeats` with interval 1.
    #[must_use]
    pub fn new(repeats: Frequency) -> Self {
        Self {
            repeats: Some(repeats),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn every(mut self, every: u32) -> Self {
        self.every = every;
        self
    }

    #[must_use]
    pub fn on_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn on_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    #[must_use]
    pub fn on_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekday = Some(weekdays.into_iter().collect());
        self
    }

    #[must_use]
    pub fn at_hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    #[must_use]
    pub fn at_minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    #[must_use]
    pub fn at_second(mut self, second: u32) -> Self {
        self.second = Some(second);
        self
    }

    /// Switches to relative-position mode.
    #[must_use]
    pub fn relative(mut self, day: RelativeDay, index: RelativeIndex) -> Self {
        self.relative = Some(RelativePosition { day, index });
        self
    }

    /// Checks whether any absolute day filter is set.
    #[must_use]
    pub fn has_day_filters(&self) -> bool {
        self.month.is_some() || self.day.is_some() || self.weekday.is_some()
    }
}

impl Stop {
    /// Unbounded, unless `on` is set later.
    #[must_use]
    pub fn never() -> Self {
        Self {
            never: true,
            ..Self::default()
        }
    }

    /// Stops after `count` generated occurrences.
    #[must_use]
    pub fn after(count: u32) -> Self {
        Self {
            after_num_repeats: Some(count),
            ..Self::default()
        }
    }

    /// Stops after `on` (inclusive).
    #[must_use]
    pub fn on(on: impl Into<Instant>) -> Self {
        Self {
            on: Some(on.into()),
            ..Self::default()
        }
    }

    /// The count bound that actually applies.
    #[must_use]
    pub fn effective_count(&self) -> Option<u32> {
        if self.never {
            None
        } else {
            self.after_num_repeats
        }
    }
}
