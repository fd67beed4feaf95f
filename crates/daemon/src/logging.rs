// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: non-blocking file writer plus optional stderr.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::lifecycle::{Config, LifecycleError};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "forge=info";

/// Install the global subscriber. Keep the guard alive for the process
/// lifetime so buffered lines are flushed on exit.
pub fn init(config: &Config) -> Result<WorkerGuard, LifecycleError> {
    let dir = config.log_path.parent().unwrap_or(config.state_dir.as_path());
    std::fs::create_dir_all(dir)?;
    let file_name = config
        .log_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "forged.log".to_string());

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr = config.log_stderr.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(stderr)
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;
    Ok(guard)
}
