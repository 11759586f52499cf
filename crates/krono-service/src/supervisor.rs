//! ## Summary
//! Schedule supervisor loop.
//!
//! Each supervisor owns one occurrence sequence. For every occurrence it
//! sleeps the whole-second wait from the current time, then spawns the
//! work without awaiting it, so a slow run never delays the next firing.
//! Work that is still running when the loop ends is awaited before
//! [`ScheduleHandle::join`] resolves.

use std::future::Future;
use std::time::Duration;

use krono_calendar::delta::seconds_until;
use krono_calendar::{Occurrences, Schedule, generate, time};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::error::ServiceResult;

/// How a supervisor loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// The schedule has no further occurrences.
    Exhausted { fired: u64 },
    /// The cancellation token fired.
    Cancelled { fired: u64 },
}

impl SupervisorExit {
    /// Number of times the work was spawned.
    #[must_use]
    pub const fn fired(self) -> u64 {
        match self {
            Self::Exhausted { fired } | Self::Cancelled { fired } => fired,
        }
    }
}

/// Handle to a running supervisor.
#[derive(Debug)]
pub struct ScheduleHandle {
    id: Uuid,
    token: CancellationToken,
    task: JoinHandle<SupervisorExit>,
}

impl ScheduleHandle {
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Stops the loop before its next firing. Work already spawned keeps
    /// running.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// ## Summary
    /// Waits for the loop and its in-flight work to finish.
    ///
    /// ## Errors
    /// Returns an error if the supervisor task panicked.
    pub async fn join(self) -> ServiceResult<SupervisorExit> {
        Ok(self.task.await?)
    }
}

/// ## Summary
/// Starts a supervisor for `schedule` with its own cancellation token.
///
/// Without a schedule the work is spawned once, immediately.
///
/// Must be called from within a Tokio runtime.
///
/// ## Errors
/// Returns a calendar error if the schedule is invalid; nothing is spawned
/// in that case.
pub fn spawn_schedule<F, Fut>(schedule: Option<&Schedule>, work: F) -> ServiceResult<ScheduleHandle>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    spawn_schedule_with_token(schedule, CancellationToken::new(), work)
}

/// ## Summary
/// Starts a supervisor for `schedule` that stops when `token` is cancelled.
///
/// ## Errors
/// Returns a calendar error if the schedule is invalid.
pub fn spawn_schedule_with_token<F, Fut>(
    schedule: Option<&Schedule>,
    token: CancellationToken,
    work: F,
) -> ServiceResult<ScheduleHandle>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let id = Uuid::new_v4();
    let occurrences = schedule.map(|s| generate(s, None)).transpose()?;

    tracing::info!(
        supervisor_id = %id,
        scheduled = occurrences.is_some(),
        "Starting schedule supervisor"
    );

    let loop_token = token.clone();
    let task = tokio::spawn(async move {
        let tracker = TaskTracker::new();
        let exit = match occurrences {
            Some(occurrences) => run(id, occurrences, &loop_token, &tracker, &work).await,
            None => {
                tracker.spawn(work());
                SupervisorExit::Exhausted { fired: 1 }
            }
        };

        tracker.close();
        tracker.wait().await;
        tracing::info!(supervisor_id = %id, exit = ?exit, "Schedule supervisor stopped");
        exit
    });

    Ok(ScheduleHandle { id, token, task })
}

async fn run<F, Fut>(
    id: Uuid,
    occurrences: Occurrences,
    token: &CancellationToken,
    tracker: &TaskTracker,
    work: &F,
) -> SupervisorExit
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let tz = occurrences.timezone();
    let mut fired = 0;

    for next in occurrences {
        let wait = u64::try_from(seconds_until(&time::now(tz), &next)).unwrap_or(0);
        tracing::debug!(
            supervisor_id = %id,
            next = %next,
            wait_seconds = wait,
            "Waiting for next occurrence"
        );

        tokio::select! {
            biased;
            () = token.cancelled() => return SupervisorExit::Cancelled { fired },
            () = tokio::time::sleep(Duration::from_secs(wait)) => {}
        }

        tracing::info!(supervisor_id = %id, occurrence = %next, "Firing scheduled work");
        tracker.spawn(work());
        fired += 1;
    }

    SupervisorExit::Exhausted { fired }
}
