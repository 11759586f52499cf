use std::collections::HashSet;

use config::Config;
use serde::Deserialize;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_TIMEZONE};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Zone used for jobs whose schedule has no `timezone` key.
    pub timezone: String,
    pub shutdown_grace_seconds: u64,
}

/// A named unit of scheduled work.
///
/// `schedule` is kept as raw JSON so the calendar validator sees exactly
/// what the operator wrote.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub name: String,
    #[serde(default)]
    pub schedule: Option<serde_json::Value>,
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

impl JobConfig {
    /// ## Summary
    /// Returns the job's raw schedule with the scheduler's default zone
    /// filled in when the schedule names none.
    #[must_use]
    pub fn schedule_with_default_timezone(&self, default_tz: &str) -> Option<serde_json::Value> {
        let mut schedule = self.schedule.clone()?;
        if let Some(map) = schedule.as_object_mut() {
            let missing = map.get("timezone").is_none_or(serde_json::Value::is_null);
            if missing {
                map.insert(
                    "timezone".to_string(),
                    serde_json::Value::String(default_tz.to_string()),
                );
            }
        }
        Some(schedule)
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and `krono.toml` into a `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails,
    /// or if two jobs share a name.
    pub fn load() -> CoreResult<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("scheduler.timezone", DEFAULT_TIMEZONE)?
            .set_default("scheduler.shutdown_grace_seconds", 5)?
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(
                config::Environment::with_prefix("KRONO")
                    .convert_case(config::Case::Snake)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.check_job_names()?;
        Ok(settings)
    }

    fn check_job_names(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for job in &self.jobs {
            if job.name.trim().is_empty() {
                return Err(CoreError::InvalidInput("job name must not be empty".into()));
            }
            if !seen.insert(job.name.as_str()) {
                return Err(CoreError::InvalidInput(format!(
                    "duplicate job name: {}",
                    job.name
                )));
            }
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::trace!(error = %err, "No .env file loaded");
    }

    Settings::load()
}
