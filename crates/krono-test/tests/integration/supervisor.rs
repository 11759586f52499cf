use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use krono_test::component::config::{JobConfig, LoggingConfig, SchedulerConfig, Settings};
use krono_test::component::jobs::{load_jobs, spawn_jobs, wait_for_jobs};
use krono_test::component::service::{SupervisorExit, spawn_schedule};
use krono_test::component::validate_value;

/// ## Summary
/// A bounded schedule fires once per future occurrence, then the
/// supervisor reports exhaustion.
#[test_log::test(tokio::test(start_paused = true))]
async fn supervisor_fires_each_occurrence() {
    let schedule = validate_value(&json!({
        "periodical": {"repeats": "secondly", "every": 2},
        "stop": {"never": false, "after_num_repeats": 3}
    }))
    .expect("valid schedule");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = spawn_schedule(Some(&schedule), move || {
        let tx = tx.clone();
        async move {
            tx.send(()).expect("receiver alive");
        }
    })
    .expect("spawned");

    let exit = handle.join().await.expect("joined");
    assert_eq!(exit, SupervisorExit::Exhausted { fired: 2 });

    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, 2);
}

/// ## Summary
/// Configured jobs are validated up front and stop with the shared token.
#[test_log::test(tokio::test(start_paused = true))]
async fn configured_jobs_shut_down_within_grace() {
    let settings = Settings {
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        scheduler: SchedulerConfig {
            timezone: "Europe/Kyiv".to_string(),
            shutdown_grace_seconds: 2,
        },
        jobs: vec![
            JobConfig {
                name: "month-end".to_string(),
                schedule: Some(json!({
                    "periodical": {
                        "repeats": "monthly",
                        "relative_day": "day",
                        "relative_day_index": "last"
                    },
                    "stop": {"never": true}
                })),
                command: None,
            },
            JobConfig {
                name: "startup".to_string(),
                schedule: None,
                command: None,
            },
        ],
    };

    let jobs = load_jobs(&settings).expect("valid jobs");
    let token = CancellationToken::new();
    let handles = spawn_jobs(jobs, &token).expect("spawned");

    token.cancel();
    wait_for_jobs(handles, Duration::from_secs(settings.scheduler.shutdown_grace_seconds))
        .await
        .expect("stopped within grace period");
}

#[test_log::test]
fn invalid_job_blocks_startup() {
    let settings = Settings {
        logging: LoggingConfig {
            level: "info".to_string(),
        },
        scheduler: SchedulerConfig {
            timezone: "UTC".to_string(),
            shutdown_grace_seconds: 5,
        },
        jobs: vec![JobConfig {
            name: "typo".to_string(),
            schedule: Some(json!({"periodical": {"repeat": "daily"}})),
            command: None,
        }],
    };
    let err = load_jobs(&settings).expect_err("invalid job");
    assert!(err.to_string().contains("typo"));
}
