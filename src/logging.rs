//! File logging for embedders
//!
//! The engine only emits `tracing` events. A host that wants them on disk
//! calls [`init_file_logging`] once at startup and keeps the returned guard
//! alive for as long as it wants buffered lines flushed.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is unset or unparsable
pub const DEFAULT_DIRECTIVE: &str = "tetrs_engine=debug";

/// Route engine logs to `dir/file_name`
///
/// Fails if the directory cannot be created or a global subscriber is already set.
pub fn init_file_logging(
    dir: &Path,
    file_name: &str,
) -> Result<WorkerGuard, Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
        )
        .with_ansi(false)
        .try_init()?;

    tracing::info!("Logging to {}", dir.join(file_name).display());
    Ok(guard)
}
