//! Schedule data model.
//!
//! These types are the validated form of the recurrence DSL. They can be
//! built directly with the `with_*`/builder methods or produced from raw
//! JSON by [`crate::validation::validate_value`].

mod instant;
mod schedule;
mod units;

pub use instant::Instant;
pub use schedule::{Periodical, RelativePosition, Schedule, Start, Stop, Timeshift};
pub use units::{
    FilterField, Frequency, RelativeDay, RelativeIndex, TimeUnit, weekday_from_index,
    weekday_index,
};
