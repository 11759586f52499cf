use std::time::Duration;

use krono_app::jobs::{load_jobs, spawn_jobs, wait_for_jobs};
use krono_core::config::load_config;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting krono scheduler");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let jobs = load_jobs(&config)?;
    if jobs.is_empty() {
        tracing::warn!("No jobs configured, nothing to schedule");
        return Ok(());
    }

    let token = CancellationToken::new();
    let handles = spawn_jobs(jobs, &token)?;

    tracing::info!(jobs = handles.len(), "Scheduler running");

    let mut poll = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                }
                tracing::info!("Shutdown requested");
                break;
            }
            _ = poll.tick() => {
                if handles.iter().all(|(_, handle)| handle.is_finished()) {
                    tracing::info!("All schedules exhausted");
                    break;
                }
            }
        }
    }

    token.cancel();
    let grace = Duration::from_secs(config.scheduler.shutdown_grace_seconds);
    wait_for_jobs(handles, grace).await?;

    tracing::info!("Scheduler stopped");
    Ok(())
}
