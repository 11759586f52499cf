//! krono scheduler - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `krono_test::` paths.

pub mod component {
    pub use krono_calendar::*;

    pub mod config {
        pub use krono_core::config::*;
    }

    pub mod service {
        pub use krono_service::*;
    }

    pub mod jobs {
        pub use krono_app::jobs::*;
    }
}
