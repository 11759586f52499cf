use serde_json::json;

use krono_test::component::time::normalize_isoformat;
use krono_test::component::{Instant, ValidationError, delta, validate_value};

use super::helpers::{naive, occurrences, wall_clock};

fn in_jakarta(text: &str) -> String {
    normalize_isoformat(text, Some("Asia/Jakarta"))
        .expect("valid instant")
        .to_rfc3339()
}

#[test_log::test]
fn first_monday_of_each_month() {
    let got = occurrences(
        &json!({
            "start": {"on": "2018-05-01T00:00:00"},
            "periodical": {
                "repeats": "monthly",
                "relative_day": "monday",
                "relative_day_index": "first"
            },
            "stop": {"never": false, "after_num_repeats": 3}
        }),
        naive(2018, 4, 1, 0, 0, 0),
        10,
    );
    assert_eq!(
        wall_clock(&got),
        ["2018-05-07 00:00:00", "2018-06-04 00:00:00", "2018-07-02 00:00:00"]
    );
}

#[test_log::test]
fn last_day_of_each_month() {
    let got = occurrences(
        &json!({
            "start": {"on": "2019-01-01T00:00:00"},
            "periodical": {
                "repeats": "monthly",
                "relative_day": "day",
                "relative_day_index": "last"
            },
            "stop": {"never": false, "after_num_repeats": 3}
        }),
        naive(2018, 12, 1, 0, 0, 0),
        10,
    );
    assert_eq!(
        wall_clock(&got),
        ["2019-01-31 00:00:00", "2019-02-28 00:00:00", "2019-03-31 00:00:00"]
    );
}

#[test_log::test]
fn relative_rule_starting_on_the_31st_skips_short_months() {
    let got = occurrences(
        &json!({
            "start": {"on": "2019-01-31T00:00:00"},
            "periodical": {
                "repeats": "monthly",
                "relative_day": "monday",
                "relative_day_index": "first"
            },
            "stop": {"never": false, "after_num_repeats": 3}
        }),
        naive(2019, 1, 1, 0, 0, 0),
        10,
    );
    assert_eq!(wall_clock(&got), ["2019-03-04 00:00:00", "2019-05-06 00:00:00"]);
}

#[test_log::test]
fn hourly_rule_across_fall_back_is_evenly_spaced() {
    let got = occurrences(
        &json!({
            "start": {"on": "2021-11-07T00:30:00"},
            "periodical": {"repeats": "hourly"},
            "stop": {"never": false, "after_num_repeats": 4},
            "timezone": "America/New_York"
        }),
        naive(2021, 11, 1, 0, 0, 0),
        10,
    );
    let offsets: Vec<String> = got.iter().map(|dt| dt.format("%H:%M%:z").to_string()).collect();
    assert_eq!(offsets, ["00:30-04:00", "01:30-04:00", "01:30-05:00", "02:30-05:00"]);
}

#[test_log::test]
fn weekly_on_monday_and_tuesday_evenings() {
    let got = occurrences(
        &json!({
            "start": {"on": "2018-05-01T00:00:00"},
            "periodical": {
                "repeats": "weekly",
                "weekday": [0, 1],
                "hour": 23,
                "minute": 15,
                "second": 30
            },
            "stop": {"never": true}
        }),
        naive(2018, 4, 1, 0, 0, 0),
        4,
    );
    assert_eq!(
        wall_clock(&got),
        [
            "2018-05-01 23:15:30",
            "2018-05-07 23:15:30",
            "2018-05-08 23:15:30",
            "2018-05-14 23:15:30"
        ]
    );
}

#[test_log::test]
fn every_other_day_at_fixed_time() {
    let got = occurrences(
        &json!({
            "start": {"on": "2018-05-01T00:00:00"},
            "periodical": {"repeats": "daily", "every": 2, "hour": 1, "minute": 30, "second": 45},
            "stop": {"never": false, "after_num_repeats": 3}
        }),
        naive(2018, 4, 1, 0, 0, 0),
        10,
    );
    assert_eq!(
        wall_clock(&got),
        ["2018-05-01 01:30:45", "2018-05-03 01:30:45", "2018-05-05 01:30:45"]
    );
}

#[test_log::test]
fn friday_the_thirteenth() {
    let got = occurrences(
        &json!({
            "start": {"on": "2018-01-01T00:00:00"},
            "periodical": {"repeats": "monthly", "day": 13, "weekday": [4]},
            "stop": {"never": true}
        }),
        naive(2017, 1, 1, 0, 0, 0),
        3,
    );
    assert_eq!(
        wall_clock(&got),
        ["2018-04-13 00:00:00", "2018-07-13 00:00:00", "2019-09-13 00:00:00"]
    );
}

#[test_log::test]
fn new_year_lunch() {
    let got = occurrences(
        &json!({
            "start": {"on": "2018-05-01T00:00:00"},
            "periodical": {"repeats": "yearly", "month": 1, "day": 1, "hour": 12, "minute": 30},
            "stop": {"never": true}
        }),
        naive(2018, 1, 1, 0, 0, 0),
        2,
    );
    assert_eq!(wall_clock(&got), ["2019-01-01 12:30:00", "2020-01-01 12:30:00"]);
}

#[test_log::test]
fn first_weekday_and_weekend_of_month() {
    let schedule = |relative_day: &str| {
        json!({
            "start": {"on": "2019-06-01T00:00:00"},
            "periodical": {
                "repeats": "monthly",
                "hour": 1,
                "minute": 0,
                "second": 0,
                "relative_day": relative_day,
                "relative_day_index": "first"
            },
            "stop": {"never": false, "after_num_repeats": 2}
        })
    };

    let weekday = occurrences(&schedule("weekday"), naive(2019, 1, 1, 0, 0, 0), 10);
    assert_eq!(wall_clock(&weekday), ["2019-06-03 01:00:00", "2019-07-01 01:00:00"]);

    let weekend = occurrences(&schedule("weekend"), naive(2019, 1, 1, 0, 0, 0), 10);
    assert_eq!(wall_clock(&weekend), ["2019-06-01 01:00:00", "2019-07-06 01:00:00"]);
}

#[test_log::test]
fn first_monday_of_each_year() {
    let got = occurrences(
        &json!({
            "start": {"on": "2018-05-01T00:00:00"},
            "periodical": {
                "repeats": "yearly",
                "relative_day": "monday",
                "relative_day_index": "first"
            },
            "stop": {"never": true}
        }),
        naive(2018, 1, 1, 0, 0, 0),
        3,
    );
    assert_eq!(
        wall_clock(&got),
        ["2019-01-07 00:00:00", "2020-01-06 00:00:00", "2021-01-04 00:00:00"]
    );
}

#[test_log::test]
fn jakarta_daily_until_stop() {
    let start = in_jakarta("2019-03-20T22:00:00");
    let stop = in_jakarta("2019-03-22T23:16:00");
    let got = occurrences(
        &json!({
            "start": {"on": start},
            "periodical": {"repeats": "daily", "hour": 23, "minute": 15, "every": 1},
            "stop": {"never": false, "on": stop},
            "timezone": "Asia/Jakarta"
        }),
        naive(2019, 3, 1, 0, 0, 0),
        10,
    );
    assert_eq!(
        wall_clock(&got),
        ["2019-03-20 23:15:00", "2019-03-21 23:15:00", "2019-03-22 23:15:00"]
    );
    assert!(got.iter().all(|dt| dt.timezone() == chrono_tz::Asia::Jakarta));
}

#[test_log::test]
fn zoned_start_is_converted_to_schedule_zone() {
    let got = occurrences(
        &json!({
            "start": {"on": "2019-03-20T15:00:00+00:00"},
            "timezone": "Asia/Jakarta"
        }),
        naive(2019, 3, 1, 0, 0, 0),
        10,
    );
    assert_eq!(wall_clock(&got), ["2019-03-20 22:00:00"]);
}

#[test_log::test]
fn delta_until_next_firing() {
    let schedule = validate_value(&json!({
        "start": {"on": "2018-05-01T00:00:00"},
        "periodical": {"repeats": "hourly"},
        "stop": {"never": true}
    }))
    .expect("valid schedule");

    let got = delta(&schedule, Some(Instant::from(naive(2018, 5, 1, 0, 0, 0)))).expect("delta");
    assert_eq!(got.seconds, 3600);

    let got = delta(&schedule, Some(Instant::from(naive(2018, 5, 1, 0, 59, 59)))).expect("delta");
    assert_eq!(got.seconds, 1);
}

#[test_log::test]
fn delta_for_exhausted_schedule_is_zero() {
    let schedule = validate_value(&json!({
        "start": {"on": "2018-05-01T00:00:00"},
        "periodical": {"repeats": "daily"},
        "stop": {"never": false, "on": "2018-05-03T00:00:00"}
    }))
    .expect("valid schedule");
    let now = naive(2018, 6, 1, 0, 0, 0);
    let got = delta(&schedule, Some(Instant::from(now))).expect("delta");
    assert_eq!(got.seconds, 0);
    assert_eq!(got.next.naive_local(), now);
}

#[test_log::test]
fn delta_for_timeshift_only_schedule() {
    let schedule = validate_value(&json!({
        "start": {"relative_timeshift": {"delay": 1, "time_units": "hours"}}
    }))
    .expect("valid schedule");
    let now = naive(2019, 1, 1, 10, 0, 0);
    let got = delta(&schedule, Some(Instant::from(now))).expect("delta");
    assert_eq!(got.seconds, 3600);
    assert_eq!(got.next.naive_local(), naive(2019, 1, 1, 11, 0, 0));
}

#[test_log::test]
fn delta_for_yearly_rule_stopping_within_a_year_is_zero() {
    let schedule = validate_value(&json!({
        "periodical": {"repeats": "yearly"},
        "stop": {"never": false, "on": "2019-12-31T00:00:00"}
    }))
    .expect("valid schedule");
    let now = naive(2019, 6, 1, 12, 0, 0);
    let got = delta(&schedule, Some(Instant::from(now))).expect("delta");
    assert_eq!(got.seconds, 0);
    assert_eq!(got.next.naive_local(), now);
}

#[test_log::test]
fn one_shot_start_in_the_past() {
    let schedule =
        validate_value(&json!({"start": {"on": "2018-05-01T00:00:00"}})).expect("valid schedule");
    let now = naive(2018, 5, 1, 1, 0, 0);
    let got = delta(&schedule, Some(Instant::from(now))).expect("delta");
    assert_eq!(got.seconds, -3600);
    assert_eq!(got.next.naive_local(), now);
}

#[test_log::test]
fn validation_errors_name_their_path() {
    let err: ValidationError = validate_value(&json!({
        "periodical": {
            "repeats": "weekly",
            "relative_day": "monday",
            "relative_day_index": "first"
        }
    }))
    .expect_err("weekly relative rule")
    .as_validation()
    .cloned()
    .expect("validation error");
    assert_eq!(err.location(), "data['periodical']['repeats']");
    assert!(err.to_string().ends_with("@ data['periodical']['repeats']"));
}
