use std::fmt;

use thiserror::Error;

/// A schedule that failed structural, range or shape checks.
///
/// `path` is the key path of the offending value inside the schedule,
/// empty when the schedule itself is at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new<P, S>(path: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Returns the path as `data['a']['b']`.
    #[must_use]
    pub fn location(&self) -> String {
        let mut out = String::from("data");
        for key in &self.path {
            out.push_str("['");
            out.push_str(key);
            out.push_str("']");
        }
        out
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} @ {}", self.message, self.location())
        }
    }
}

impl std::error::Error for ValidationError {}

/// Calendar engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Nonexistent local time: {0}")]
    NonexistentLocalTime(String),
}

impl CalendarError {
    /// Returns the validation failure, if this is one.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NonexistentLocalTime(_) => None,
        }
    }
}

pub type CalendarResult<T> = std::result::Result<T, CalendarError>;
