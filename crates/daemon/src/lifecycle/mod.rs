// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

mod startup;
pub use startup::startup;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use forge_adapters::{CommandAgentAdapter, ScriptValidator};
use forge_core::{format_elapsed, SystemClock};
use forge_engine::{Engine, EngineConfig};
use forge_storage::{StorageConfig, StorageError};
use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::ImageRouter;
use crate::env;

/// Engine with the daemon's concrete adapter types
pub type DaemonEngine = Engine<SystemClock, CommandAgentAdapter, ImageRouter, ScriptValidator>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/forge)
    pub state_dir: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Root of per-job workspaces
    pub workspaces_path: PathBuf,
    /// Path to per-job log files
    pub logs_path: PathBuf,
    /// Scratch directory for cover and banner art
    pub art_path: PathBuf,
    /// Seed building blocks
    pub resources_dir: PathBuf,
    pub max_queue_size: usize,
    pub idle_poll: Duration,
    pub agent_timeout: Option<Duration>,
    pub agent_command: String,
    /// Art generation is disabled when unset
    pub image_command: Option<String>,
    pub drain_timeout: Duration,
    pub log_stderr: bool,
    pub storage: StorageConfig,
}

impl Config {
    /// Configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        let mut config = Self::with_state_dir(state_dir);
        if let Some(dir) = env::workspace_dir() {
            config.workspaces_path = dir;
        }
        config.resources_dir = env::resources_dir();
        config.max_queue_size = env::max_queue_size();
        config.idle_poll = env::idle_poll();
        config.agent_timeout = env::agent_timeout();
        config.agent_command = env::agent_command();
        config.image_command = env::image_command();
        config.drain_timeout = env::drain_timeout();
        config.log_stderr = env::log_stderr();
        config.storage = env::storage_config()?;
        Ok(config)
    }

    /// Defaults with every path under `state_dir`.
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            log_path: state_dir.join("forged.log"),
            workspaces_path: state_dir.join("workspaces"),
            logs_path: state_dir.join("logs"),
            art_path: state_dir.join("art"),
            resources_dir: PathBuf::from("resources"),
            max_queue_size: forge_engine::DEFAULT_MAX_QUEUE_SIZE,
            idle_poll: Duration::from_secs(5),
            agent_timeout: None,
            agent_command: "claude".to_string(),
            image_command: None,
            drain_timeout: Duration::from_secs(5),
            log_stderr: false,
            storage: StorageConfig::local("."),
            state_dir,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .max_queue_size(self.max_queue_size)
            .idle_poll(self.idle_poll)
            .agent_timeout(self.agent_timeout)
            .resources_dir(&self.resources_dir)
            .workspace_root(&self.workspaces_path)
            .art_dir(&self.art_path)
            .log_dir(&self.logs_path)
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    pub engine: Arc<DaemonEngine>,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Request a cooperative stop and wait up to the drain timeout.
    pub async fn shutdown(&self) {
        info!(outcome = %self.engine.stop(), "shutting down daemon");
        if !self.engine.wait(self.config.drain_timeout).await {
            warn!("loops did not drain before timeout, exiting anyway");
        }
        info!(uptime = %format_elapsed(self.start_time.elapsed()), "daemon stopped");
    }
}

/// Resolve when SIGINT or SIGTERM arrives.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
                    _ = term.recv() => info!("received SIGTERM"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to wait for SIGINT");
    }
}

/// Errors that abort daemon startup
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
