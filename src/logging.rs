use crate::config;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Picks the log filter: an explicit override first, then `RUST_LOG`, then
/// the configured default. A filter that does not parse is an error.
pub fn resolve_filter(override_filter: Option<&str>, configured: &str) -> Result<EnvFilter> {
    if let Some(filter) = override_filter {
        return parse_filter(filter);
    }

    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => parse_filter(configured),
    }
}

fn parse_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("invalid log filter {filter}"))
}

/// Sends tracing output to the log file in the config directory. Stdout is
/// owned by the terminal UI, so nothing is written there. Keep the returned
/// guard alive until exit or buffered lines are lost.
pub fn init(filter: EnvFilter) -> Result<WorkerGuard> {
    let root = config::ensure_config_dir()?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(config::LOG_FILE)
        .build(&root)
        .with_context(|| format!("failed to open log file in {}", root.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}
