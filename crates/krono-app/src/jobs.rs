//! Configured jobs and their supervisors.

use std::time::Duration;

use futures::future::join_all;
use krono_calendar::{Schedule, validate_value};
use krono_core::config::{JobConfig, Settings};
use krono_service::error::ServiceError;
use krono_service::{ScheduleHandle, spawn_schedule_with_token};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// A job whose schedule passed validation.
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    /// `None` fires the job once at startup.
    pub schedule: Option<Schedule>,
    pub command: Option<Vec<String>>,
}

impl Job {
    /// ## Summary
    /// Validates a configured job, filling in the scheduler's default zone.
    ///
    /// ## Errors
    /// Returns [`AppError::InvalidJob`] if the schedule is invalid.
    pub fn from_config(config: &JobConfig, default_tz: &str) -> AppResult<Self> {
        let schedule = config
            .schedule_with_default_timezone(default_tz)
            .map(|raw| validate_value(&raw))
            .transpose()
            .map_err(|source| AppError::InvalidJob {
                name: config.name.clone(),
                source,
            })?;

        Ok(Self {
            name: config.name.clone(),
            schedule,
            command: config.command.clone(),
        })
    }
}

/// ## Summary
/// Validates every configured job before any of them starts.
///
/// ## Errors
/// Returns the first invalid job.
pub fn load_jobs(settings: &Settings) -> AppResult<Vec<Job>> {
    settings
        .jobs
        .iter()
        .map(|config| Job::from_config(config, &settings.scheduler.timezone))
        .collect()
}

/// Runs `command` once for `job`, logging its outcome.
pub async fn run_command(job: &str, command: &[String]) {
    let Some((program, args)) = command.split_first() else {
        tracing::info!(job, "Job fired");
        return;
    };

    match Command::new(program).args(args).status().await {
        Ok(status) if status.success() => {
            tracing::info!(job, program = %program, "Job command finished");
        }
        Ok(status) => {
            tracing::warn!(job, program = %program, status = %status, "Job command failed");
        }
        Err(err) => {
            tracing::error!(job, program = %program, error = %err, "Failed to start job command");
        }
    }
}

/// ## Summary
/// Starts one supervisor per job, each stopping with `token`.
///
/// ## Errors
/// Returns an error if a supervisor fails to start.
pub fn spawn_jobs(
    jobs: Vec<Job>,
    token: &CancellationToken,
) -> AppResult<Vec<(String, ScheduleHandle)>> {
    jobs.into_iter()
        .map(|job| -> AppResult<(String, ScheduleHandle)> {
            let name = job.name.clone();
            let command = job.command.unwrap_or_default();
            let work_name = name.clone();
            let work = move || {
                let name = work_name.clone();
                let command = command.clone();
                async move { run_command(&name, &command).await }
            };
            let handle =
                spawn_schedule_with_token(job.schedule.as_ref(), token.child_token(), work)?;
            tracing::info!(job = %name, supervisor_id = %handle.id(), "Job scheduled");
            Ok((name, handle))
        })
        .collect()
}

/// ## Summary
/// Waits for every supervisor to stop, for at most `grace`.
///
/// Callers cancel the supervisors' token first.
///
/// ## Errors
/// Returns [`ServiceError::ShutdownTimeout`] if the grace period elapses.
pub async fn wait_for_jobs(
    handles: Vec<(String, ScheduleHandle)>,
    grace: Duration,
) -> AppResult<()> {
    let joins = handles.into_iter().map(|(name, handle)| async move {
        match handle.join().await {
            Ok(exit) => tracing::info!(job = %name, fired = exit.fired(), "Job stopped"),
            Err(err) => tracing::error!(job = %name, error = %err, "Job supervisor failed"),
        }
    });

    tokio::time::timeout(grace, join_all(joins))
        .await
        .map_err(|_elapsed| ServiceError::ShutdownTimeout(grace.as_secs()))?;
    Ok(())
}
