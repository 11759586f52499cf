//! Async supervision of krono schedules.
//!
//! A supervisor walks a schedule's occurrences, sleeps until each one and
//! spawns the scheduled work, until the schedule is exhausted or its
//! cancellation token fires.

pub mod error;
pub mod supervisor;

pub use error::{ServiceError, ServiceResult};
pub use supervisor::{ScheduleHandle, SupervisorExit, spawn_schedule, spawn_schedule_with_token};
