//! Calendar and recurrence engine behind the krono scheduling DSL.
//!
//! A [`Schedule`] describes *when* something should happen: once, on a
//! periodic rule ("every 2 days at 01:30:45"), or on a relative position
//! inside each month or year ("last Friday of the month"). This crate turns
//! that description into concrete instants:
//!
//! - **`time`**: timezone-aware instant normalization
//! - **`validation`**: schema checks for raw JSON schedules and value injection
//! - **`expand`**: frequency × interval × field-filter recurrence expansion
//! - **`relative`**: Nth / last weekday, weekday-category and day-of-period resolution
//! - **`generator`**: the lazy, ascending occurrence sequence
//! - **`delta`**: whole-second wait time until the next occurrence
//!
//! Every entry point is pure: nothing is cached between calls, and each
//! sequence is an independent forward-only iterator.

pub mod delta;
pub mod error;
pub mod expand;
pub mod generator;
pub mod model;
pub mod relative;
pub mod time;
pub mod validation;

pub use delta::{Delta, delta};
pub use error::{CalendarError, CalendarResult, ValidationError};
pub use generator::{Occurrences, generate};
pub use model::{
    Frequency, Instant, Periodical, RelativeDay, RelativeIndex, RelativePosition, Schedule, Start,
    Stop, TimeUnit, Timeshift,
};
pub use validation::{
    Getter, GetterParams, InjectError, apply_getters, validate_value, validated_schedule,
};
