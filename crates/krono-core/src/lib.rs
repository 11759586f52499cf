//! Shared building blocks for the krono workspace: configuration,
//! constants and the core error type.

pub mod config;
pub mod constants;
pub mod error;
