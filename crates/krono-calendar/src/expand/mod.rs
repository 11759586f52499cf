//! ## Summary
//! Recurrence expansion.
//!
//! An [`ExpansionRule`] is the frequency, interval and field filters of a
//! periodical rule, completed with defaults taken from the rule's start.
//! [`RecurrenceIter`] walks the rule's periods (day-level ones in
//! wall-clock time, sub-daily ones on the absolute timeline) and yields
//! the matching instants in ascending order, bounded by an optional
//! inclusive `until` and an optional occurrence count.

mod iter;
mod rule;

pub use iter::RecurrenceIter;
pub use rule::{DaySelector, ExpansionRule};
