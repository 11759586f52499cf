//! Plain recurrences must expand exactly like the `rrule` crate does.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use rrule::{RRule, RRuleSet, Unvalidated};
use serde_json::{Value, json};

use super::helpers::{naive, occurrences};

struct ParityCase {
    name: &'static str,
    rrule: &'static str,
    dtstart: NaiveDateTime,
    schedule: Value,
}

fn parity_cases() -> Vec<ParityCase> {
    vec![
        ParityCase {
            name: "daily interval with time",
            rrule: "FREQ=DAILY;INTERVAL=2;BYHOUR=1;BYMINUTE=30;BYSECOND=45;COUNT=5",
            dtstart: naive(2018, 5, 1, 1, 30, 45),
            schedule: json!({
                "periodical": {
                    "repeats": "daily",
                    "every": 2,
                    "hour": 1,
                    "minute": 30,
                    "second": 45
                },
                "stop": {"never": false, "after_num_repeats": 5}
            }),
        },
        ParityCase {
            name: "weekly on two weekdays",
            rrule: "FREQ=WEEKLY;BYDAY=MO,TU;BYHOUR=23;BYMINUTE=15;BYSECOND=30;COUNT=6",
            dtstart: naive(2018, 5, 1, 23, 15, 30),
            schedule: json!({
                "periodical": {
                    "repeats": "weekly",
                    "weekday": [0, 1],
                    "hour": 23,
                    "minute": 15,
                    "second": 30
                },
                "stop": {"never": false, "after_num_repeats": 6}
            }),
        },
        ParityCase {
            name: "weekly defaults to start weekday",
            rrule: "FREQ=WEEKLY;INTERVAL=3;COUNT=4",
            dtstart: naive(2018, 5, 2, 8, 0, 0),
            schedule: json!({
                "periodical": {"repeats": "weekly", "every": 3},
                "stop": {"never": false, "after_num_repeats": 4}
            }),
        },
        ParityCase {
            name: "friday the thirteenth",
            rrule: "FREQ=MONTHLY;BYMONTHDAY=13;BYDAY=FR;COUNT=4",
            dtstart: naive(2018, 4, 13, 0, 0, 0),
            schedule: json!({
                "periodical": {"repeats": "monthly", "day": 13, "weekday": [4]},
                "stop": {"never": false, "after_num_repeats": 4}
            }),
        },
        ParityCase {
            name: "monthly day skips short months",
            rrule: "FREQ=MONTHLY;BYMONTHDAY=31;COUNT=4",
            dtstart: naive(2019, 1, 31, 9, 0, 0),
            schedule: json!({
                "periodical": {"repeats": "monthly", "day": 31},
                "stop": {"never": false, "after_num_repeats": 4}
            }),
        },
        ParityCase {
            name: "yearly on a fixed date",
            rrule: "FREQ=YEARLY;BYMONTH=1;BYMONTHDAY=1;BYHOUR=12;BYMINUTE=30;BYSECOND=0;COUNT=3",
            dtstart: naive(2019, 1, 1, 12, 30, 0),
            schedule: json!({
                "periodical": {
                    "repeats": "yearly",
                    "month": 1,
                    "day": 1,
                    "hour": 12,
                    "minute": 30,
                    "second": 0
                },
                "stop": {"never": false, "after_num_repeats": 3}
            }),
        },
        ParityCase {
            name: "yearly sundays in march",
            rrule: "FREQ=YEARLY;BYMONTH=3;BYDAY=SU;COUNT=7",
            dtstart: naive(2020, 3, 1, 10, 0, 0),
            schedule: json!({
                "periodical": {"repeats": "yearly", "month": 3, "weekday": [6]},
                "stop": {"never": false, "after_num_repeats": 7}
            }),
        },
        ParityCase {
            name: "hourly interval",
            rrule: "FREQ=HOURLY;INTERVAL=6;COUNT=8",
            dtstart: naive(2020, 1, 1, 0, 0, 0),
            schedule: json!({
                "periodical": {"repeats": "hourly", "every": 6},
                "stop": {"never": false, "after_num_repeats": 8}
            }),
        },
        ParityCase {
            name: "minutely interval",
            rrule: "FREQ=MINUTELY;INTERVAL=15;COUNT=6",
            dtstart: naive(2020, 1, 1, 23, 10, 5),
            schedule: json!({
                "periodical": {"repeats": "minutely", "every": 15},
                "stop": {"never": false, "after_num_repeats": 6}
            }),
        },
        ParityCase {
            name: "daily until",
            rrule: "FREQ=DAILY;BYHOUR=23;BYMINUTE=15;UNTIL=20190322T231600Z",
            dtstart: naive(2019, 3, 20, 23, 15, 0),
            schedule: json!({
                "periodical": {"repeats": "daily", "hour": 23, "minute": 15},
                "stop": {"never": false, "on": "2019-03-22T23:16:00"}
            }),
        },
    ]
}

fn expected_timestamps(case: &ParityCase) -> Vec<i64> {
    let rule: RRule<Unvalidated> = case
        .rrule
        .parse()
        .unwrap_or_else(|err| panic!("{}: invalid rrule: {err}", case.name));
    let dt_start = case.dtstart.and_utc().with_timezone(&rrule::Tz::UTC);
    let set: RRuleSet = rule
        .build(dt_start)
        .unwrap_or_else(|err| panic!("{}: rrule build failed: {err}", case.name));
    set.all(u16::MAX).dates.iter().map(chrono::DateTime::timestamp).collect()
}

fn actual_timestamps(case: &ParityCase) -> Vec<i64> {
    let mut schedule = case.schedule.clone();
    let start = case.dtstart.format("%Y-%m-%dT%H:%M:%S").to_string();
    schedule["start"] = json!({"on": start});
    // Seen from before the start, nothing is filtered out as past.
    occurrences(&schedule, naive(2000, 1, 1, 0, 0, 0), usize::from(u16::MAX))
        .iter()
        .map(chrono::DateTime::timestamp)
        .collect()
}

#[test_log::test]
fn expansion_matches_rrule() {
    for case in parity_cases() {
        let expected = expected_timestamps(&case);
        assert!(!expected.is_empty(), "{}: rrule produced nothing", case.name);
        assert_eq!(actual_timestamps(&case), expected, "{}", case.name);
    }
}

#[test_log::test]
fn occurrences_are_in_schedule_zone() {
    let got = occurrences(
        &json!({
            "start": {"on": "2021-03-13T02:30:00"},
            "periodical": {"repeats": "daily"},
            "stop": {"never": false, "after_num_repeats": 3},
            "timezone": "America/New_York"
        }),
        naive(2021, 1, 1, 0, 0, 0),
        10,
    );
    assert_eq!(got.len(), 3);
    assert!(got.iter().all(|dt| dt.timezone() == Tz::America__New_York));
}
