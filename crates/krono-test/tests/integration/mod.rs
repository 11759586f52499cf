mod helpers;
mod rrule_parity;
mod schedule_examples;
mod supervisor;
