#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde_json::Value;

use krono_test::component::{Instant, generate, validate_value};

/// Builds a naive wall-clock instant.
pub fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid naive datetime")
}

/// Builds an instant in `tz`.
pub fn at(tz: Tz, y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Tz> {
    tz.with_ymd_and_hms(y, m, d, h, min, s)
        .single()
        .expect("unambiguous instant")
}

/// Validates `raw` and collects at most `limit` occurrences as seen at `now`.
pub fn occurrences(raw: &Value, now: NaiveDateTime, limit: usize) -> Vec<DateTime<Tz>> {
    let schedule = validate_value(raw).expect("valid schedule");
    generate(&schedule, Some(Instant::from(now)))
        .expect("generated")
        .take(limit)
        .collect()
}

/// Formats instants as local wall-clock strings, for readable assertions.
pub fn wall_clock(dates: &[DateTime<Tz>]) -> Vec<String> {
    dates
        .iter()
        .map(|dt| dt.naive_local().format("%Y-%m-%d %H:%M:%S").to_string())
        .collect()
}
