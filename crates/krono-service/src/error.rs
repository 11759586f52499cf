use thiserror::Error;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CalendarError(#[from] krono_calendar::CalendarError),

    #[error(transparent)]
    CoreError(#[from] krono_core::error::CoreError),

    #[error("Supervisor task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Shutdown timed out after {0} seconds")]
    ShutdownTimeout(u64),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
