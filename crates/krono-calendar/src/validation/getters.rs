//! Value injection ahead of schema validation.
//!
//! A getter replaces the value at a key path of a raw schedule with what
//! its extractor computes from it, for example a live timezone name
//! looked up from a user record.

use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::validate_value;
use crate::error::CalendarError;
use crate::model::Schedule;

/// Computes a replacement for the value found at a getter's path.
pub type Extractor<E> = Box<dyn Fn(&Value, &GetterParams) -> Result<Value, E> + Send + Sync>;

/// Parameters handed to an [`Extractor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetterParams {
    /// Key path of the value being replaced.
    pub path: Vec<String>,
    /// Caller-supplied extra parameters.
    pub extra: Map<String, Value>,
}

/// A path-addressed value replacement.
pub struct Getter<E> {
    extractor: Extractor<E>,
    params: GetterParams,
}

impl<E> Getter<E> {
    pub fn new<P, S, F>(path: P, extractor: F) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Value, &GetterParams) -> Result<Value, E> + Send + Sync + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            params: GetterParams {
                path: path.into_iter().map(Into::into).collect(),
                extra: Map::new(),
            },
        }
    }

    /// Adds an extra parameter passed to the extractor.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.extra.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn params(&self) -> &GetterParams {
        &self.params
    }
}

impl<E> std::fmt::Debug for Getter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Getter")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Failure of [`validated_schedule`]: either an extractor failed or the
/// injected schedule did not validate.
#[derive(Error, Debug)]
pub enum InjectError<E> {
    #[error("Value extraction failed: {0}")]
    Extractor(E),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// ## Summary
/// Applies each getter in order to `raw`.
///
/// A getter whose path is missing, or whose value is `null`, is skipped.
/// Getters see the result of the ones before them.
///
/// ## Errors
/// Returns the first extractor error unchanged.
pub fn apply_getters<E>(mut raw: Value, getters: &[Getter<E>]) -> Result<Value, E> {
    for getter in getters {
        let Some(slot) = lookup_mut(&mut raw, &getter.params.path) else {
            continue;
        };
        if slot.is_null() {
            continue;
        }

        let replacement = (getter.extractor)(slot, &getter.params)?;
        tracing::trace!(path = ?getter.params.path, "Injected schedule value");
        *slot = replacement;
    }
    Ok(raw)
}

/// ## Summary
/// Injects values with `getters`, then validates the result.
///
/// ## Errors
/// Returns [`InjectError::Extractor`] if an extractor fails, or
/// [`InjectError::Calendar`] if the injected schedule is invalid.
pub fn validated_schedule<E>(
    raw: Value,
    getters: &[Getter<E>],
) -> Result<Schedule, InjectError<E>> {
    let injected = apply_getters(raw, getters).map_err(InjectError::Extractor)?;
    Ok(validate_value(&injected)?)
}

fn lookup_mut<'a>(root: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    if path.is_empty() {
        return None;
    }
    path.iter()
        .try_fold(root, |node, key| node.as_object_mut()?.get_mut(key))
}
