//! ## Summary
//! Schedule validation.
//!
//! Two entry shapes are checked:
//! - raw JSON schedules ([`validate_value`]), with the closed key set,
//!   types and ranges of the DSL, optionally after value injection
//!   ([`apply_getters`])
//! - typed [`crate::Schedule`] values ([`crate::Schedule::validate`]),
//!   which re-check ranges and mode rules on every generator call
//!
//! A schedule is in relative-position mode when `periodical.relative_day`
//! and `periodical.relative_day_index` are both present. That mode only
//! exists for monthly and yearly rules and excludes `month`, `day` and
//! `weekday`.

mod getters;
mod rules;
mod schema;
mod typed;

pub use getters::{Extractor, Getter, GetterParams, InjectError, apply_getters, validated_schedule};
pub use rules::FieldRange;
pub use schema::validate_value;
