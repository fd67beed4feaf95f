// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use forge_storage::{BackendName, S3Config, StorageConfig};

use crate::lifecycle::LifecycleError;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn millis(name: &str) -> Option<Duration> {
    var(name).and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

/// Resolve state directory: FORGE_STATE_DIR > XDG_STATE_HOME/forge > ~/.local/state/forge
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = var("FORGE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("forge"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/forge"))
}

/// Root of per-job workspaces (default `<state_dir>/workspaces`)
pub fn workspace_dir() -> Option<PathBuf> {
    var("FORGE_WORKSPACE_DIR").map(PathBuf::from)
}

/// Seed building blocks (default `./resources`)
pub fn resources_dir() -> PathBuf {
    var("FORGE_RESOURCES_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("resources"))
}

/// Queue capacity (default 3)
pub fn max_queue_size() -> usize {
    var("FORGE_MAX_QUEUE_SIZE")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(forge_engine::DEFAULT_MAX_QUEUE_SIZE)
}

/// Worker sleep when the queue is empty (default 5s)
pub fn idle_poll() -> Duration {
    millis("FORGE_IDLE_POLL_MS").unwrap_or(Duration::from_secs(5))
}

/// Bound on one agent run. Unset means unbounded.
pub fn agent_timeout() -> Option<Duration> {
    millis("FORGE_AGENT_TIMEOUT_MS")
}

/// Agent executable (default `claude`)
pub fn agent_command() -> String {
    var("FORGE_AGENT_COMMAND").unwrap_or_else(|| "claude".to_string())
}

/// Image generator executable. Art is disabled when unset.
pub fn image_command() -> Option<String> {
    var("FORGE_IMAGE_COMMAND")
}

/// Shutdown drain timeout (default 5s)
pub fn drain_timeout() -> Duration {
    millis("FORGE_DRAIN_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Mirror logs to stderr when set.
pub fn log_stderr() -> bool {
    var("FORGE_LOG_STDERR").is_some_and(|s| !matches!(s.trim(), "0" | "false"))
}

/// Storage backend selection from `FORGE_STORAGE_BACKEND` and friends.
pub fn storage_config() -> Result<StorageConfig, LifecycleError> {
    let backend: BackendName = var("FORGE_STORAGE_BACKEND").unwrap_or_default().parse()?;
    match backend {
        BackendName::Local => Ok(StorageConfig::Local {
            root: var("FORGE_LOCAL_STORAGE_PATH").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            base_url: var("FORGE_LOCAL_STORAGE_URL").unwrap_or_default(),
        }),
        BackendName::S3 => {
            let bucket = var("FORGE_S3_BUCKET").ok_or(LifecycleError::MissingEnv("FORGE_S3_BUCKET"))?;
            let region = var("FORGE_S3_REGION").unwrap_or_else(|| "us-east-1".to_string());
            let mut config = S3Config::new(bucket, region);
            if let Some(endpoint) = var("FORGE_S3_ENDPOINT") {
                config = config.endpoint(endpoint);
            }
            if let Some(cdn) = var("FORGE_CDN_DOMAIN") {
                config = config.cdn_domain(cdn);
            }
            Ok(StorageConfig::S3(config))
        }
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
