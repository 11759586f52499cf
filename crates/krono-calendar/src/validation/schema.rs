//! Raw JSON schedule schema.
//!
//! The raw structs mirror the DSL's closed key set. Deserialization checks
//! keys and JSON types; conversion into the typed model checks ranges,
//! vocabularies and the relative-position shape.

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use serde_path_to_error::Segment;

use super::rules::FieldRange;
use crate::error::{CalendarResult, ValidationError};
use crate::model::{
    Frequency, Instant, Periodical, RelativeDay, RelativeIndex, RelativePosition, Schedule, Start,
    Stop, TimeUnit, Timeshift, weekday_from_index,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, expecting = "a dictionary")]
struct RawSchedule {
    start: Option<RawStart>,
    periodical: Option<RawPeriodical>,
    stop: Option<RawStop>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, expecting = "a dictionary")]
struct RawStart {
    #[serde(default, deserialize_with = "instant")]
    on: Option<Instant>,
    relative_timeshift: Option<RawTimeshift>,
}

/// Both keys must be present; either may be null.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, expecting = "a dictionary")]
struct RawTimeshift {
    #[serde(deserialize_with = "coerced_int")]
    delay: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    time_units: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, expecting = "a dictionary")]
struct RawPeriodical {
    #[serde(deserialize_with = "nullable")]
    repeats: Option<String>,
    every: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    weekday: Option<Vec<i64>>,
    hour: Option<i64>,
    minute: Option<i64>,
    second: Option<i64>,
    relative_day: Option<String>,
    relative_day_index: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, expecting = "a dictionary")]
struct RawStop {
    #[serde(deserialize_with = "coerced_bool")]
    never: Option<bool>,
    #[serde(default, deserialize_with = "instant")]
    on: Option<Instant>,
    after_num_repeats: Option<i64>,
}

/// ## Summary
/// Validates a raw JSON schedule and builds the typed [`Schedule`].
///
/// Selects the relative-position shape when `periodical.relative_day` and
/// `periodical.relative_day_index` are both present, the absolute-field
/// shape otherwise, then runs [`Schedule::validate`].
///
/// ## Errors
/// Returns a validation error naming the offending key path.
pub fn validate_value(raw: &Value) -> CalendarResult<Schedule> {
    let raw: RawSchedule = serde_path_to_error::deserialize(raw).map_err(schema_error)?;

    let schedule = Schedule {
        start: raw.start.map(RawStart::into_start).transpose()?,
        periodical: raw.periodical.map(RawPeriodical::into_periodical).transpose()?,
        stop: raw.stop.map(RawStop::into_stop).transpose()?,
        timezone: raw.timezone,
    };

    tracing::trace!(
        relative = schedule.relative_position().is_some(),
        frequency = ?schedule.frequency(),
        "Raw schedule passed schema checks"
    );

    schedule.validate()?;
    Ok(schedule)
}

impl RawStart {
    fn into_start(self) -> Result<Start, ValidationError> {
        Ok(Start {
            on: self.on,
            relative_timeshift: self
                .relative_timeshift
                .map(RawTimeshift::into_timeshift)
                .transpose()?,
        })
    }
}

impl RawTimeshift {
    fn into_timeshift(self) -> Result<Timeshift, ValidationError> {
        const DELAY: &[&str] = &["start", "relative_timeshift", "delay"];
        let delay = self
            .delay
            .map(|delay| FieldRange::POSITIVE.check(delay, DELAY))
            .transpose()?;

        let time_units = self
            .time_units
            .map(|name| {
                TimeUnit::parse(&name).ok_or_else(|| {
                    let expected = TimeUnit::all()
                        .iter()
                        .map(|unit| format!("\"{unit}\""))
                        .collect::<Vec<_>>()
                        .join(", ");
                    ValidationError::new(
                        ["start", "relative_timeshift", "time_units"],
                        format!("Invalid start timeshift unit value, one of {expected} expected"),
                    )
                })
            })
            .transpose()?;

        Ok(Timeshift { delay, time_units })
    }
}

impl RawPeriodical {
    /// Checks whether this section selects relative-position mode.
    fn is_relative_shape(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.relative_day) && present(&self.relative_day_index)
    }

    fn into_periodical(self) -> Result<Periodical, ValidationError> {
        if self.is_relative_shape() {
            let absolute = [
                ("month", self.month.is_some()),
                ("day", self.day.is_some()),
                ("weekday", self.weekday.is_some()),
            ];
            if let Some((key, _)) = absolute.iter().find(|(_, present)| *present) {
                return Err(ValidationError::new(
                    ["periodical", *key],
                    "extra keys not allowed in relative mode",
                ));
            }
        }

        let repeats = self
            .repeats
            .map(|name| {
                Frequency::parse(&name).ok_or_else(|| {
                    ValidationError::new(
                        ["periodical", "repeats"],
                        format!("not a valid value: \"{name}\""),
                    )
                })
            })
            .transpose()?;

        let weekday = self
            .weekday
            .map(|items| {
                items
                    .into_iter()
                    .map(|index| {
                        let index = FieldRange::WEEKDAY.check(index, &["periodical", "weekday"])?;
                        weekday_from_index(index).ok_or_else(|| {
                            ValidationError::new(["periodical", "weekday"], "not a valid weekday")
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        // Both relative keys are validated whenever present; they only
        // take effect together.
        let relative_day = named(self.relative_day, "relative_day", RelativeDay::parse)?;
        let relative_day_index =
            named(self.relative_day_index, "relative_day_index", RelativeIndex::parse)?;
        let relative = match (relative_day, relative_day_index) {
            (Some(day), Some(index)) => Some(RelativePosition { day, index }),
            _ => None,
        };

        Ok(Periodical {
            repeats,
            every: ranged(self.every, "every", FieldRange::POSITIVE)?.unwrap_or(1),
            month: ranged(self.month, "month", FieldRange::MONTH)?,
            day: ranged(self.day, "day", FieldRange::DAY)?,
            weekday,
            hour: ranged(self.hour, "hour", FieldRange::HOUR)?,
            minute: ranged(self.minute, "minute", FieldRange::MINUTE)?,
            second: ranged(self.second, "second", FieldRange::SECOND)?,
            relative,
        })
    }
}

impl RawStop {
    fn into_stop(self) -> Result<Stop, ValidationError> {
        let after_num_repeats = self
            .after_num_repeats
            .map(|count| FieldRange::POSITIVE.check(count, &["stop", "after_num_repeats"]))
            .transpose()?;
        Ok(Stop {
            never: self.never.unwrap_or(false),
            on: self.on,
            after_num_repeats,
        })
    }
}

/// Narrows a periodical field to `u32` within `range`.
fn ranged(
    value: Option<i64>,
    key: &str,
    range: FieldRange,
) -> Result<Option<u32>, ValidationError> {
    value.map(|v| range.check(v, &["periodical", key])).transpose()
}

/// Parses a periodical vocabulary field; an empty string is absent.
fn named<T>(
    value: Option<String>,
    key: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, ValidationError> {
    value
        .filter(|s| !s.is_empty())
        .map(|name| {
            parse(&name).ok_or_else(|| {
                ValidationError::new(["periodical", key], format!("not a valid value: \"{name}\""))
            })
        })
        .transpose()
}

/// Maps a deserialization failure onto the DSL's key path and wording.
fn schema_error(err: serde_path_to_error::Error<serde_json::Error>) -> ValidationError {
    let mut path: Vec<String> = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Map { key } => Some(key.clone()),
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Enum { variant } => Some(variant.clone()),
            Segment::Unknown => None,
        })
        .collect();
    let message = err.into_inner().to_string();

    let keyed = [
        ("unknown field `", "extra keys not allowed"),
        ("missing field `", "required key not provided"),
    ];
    for (prefix, wording) in keyed {
        if let Some(key) = message
            .strip_prefix(prefix)
            .and_then(|rest| rest.split('`').next())
        {
            if path.last().is_none_or(|last| last != key) {
                path.push(key.to_string());
            }
            return ValidationError::new(path, wording);
        }
    }
    ValidationError::new(path, message)
}

/// A present key whose value may be null.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

fn instant<'de, D>(deserializer: D) -> Result<Option<Instant>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|text| {
            Instant::parse(&text)
                .ok_or_else(|| D::Error::custom(format!("expected datetime, got \"{text}\"")))
        })
        .transpose()
}

/// Integers, floats (truncated) and numeric strings.
fn coerced_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    coerce_int(&value).map(Some).ok_or_else(|| {
        D::Error::custom("Invalid start timeshift delay value, an integer expected")
    })
}

fn coerced_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    coerce_bool(&value)
        .map(Some)
        .ok_or_else(|| D::Error::custom("expected boolean"))
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_float)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Drops the fractional part of `f` when the result fits the delay's
/// range checks.
#[expect(clippy::cast_possible_truncation)]
fn truncate_float(f: f64) -> Option<i64> {
    let whole = f.trunc();
    (f64::from(i32::MIN)..=f64::from(u32::MAX))
        .contains(&whole)
        .then(|| whole as i64)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "enable" => Some(true),
            "0" | "false" | "no" | "off" | "disable" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
