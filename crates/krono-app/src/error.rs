use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] krono_service::error::ServiceError),

    #[error(transparent)]
    CoreError(#[from] krono_core::error::CoreError),

    #[error("Invalid schedule for job '{name}': {source}")]
    InvalidJob {
        name: String,
        #[source]
        source: krono_calendar::CalendarError,
    },
}

pub type AppResult<T> = std::result::Result<T, AppError>;
