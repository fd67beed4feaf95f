// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tunables.

use std::path::PathBuf;
use std::time::Duration;

/// Default queue capacity.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 3;

/// Producer sleeps keyed by queue fill ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackpressureDelays {
    /// Queue full: sleep, then re-check without proposing
    pub full: Duration,
    /// Fill ratio ≥ 0.8
    pub high: Duration,
    /// Fill ratio ≥ 0.5
    pub mid: Duration,
}

impl Default for BackpressureDelays {
    fn default() -> Self {
        Self {
            full: Duration::from_secs(30),
            high: Duration::from_secs(10),
            mid: Duration::from_secs(2),
        }
    }
}

/// Engine configuration. Defaults match production behavior; tests shrink
/// the durations.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_queue_size: usize,
    pub backpressure: BackpressureDelays,
    /// Worker sleep when the queue is empty
    pub idle_poll: Duration,
    /// Bound on the agent sub-task; `None` waits indefinitely
    pub agent_timeout: Option<Duration>,
    /// Directory holding the seed building blocks
    pub resources_dir: PathBuf,
    /// Root of per-job workspaces: `{workspace_root}/{session}/{id}`
    pub workspace_root: PathBuf,
    /// Scratch space for cover and banner art before upload
    pub art_dir: PathBuf,
    /// Root of per-job activity logs
    pub log_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            backpressure: BackpressureDelays::default(),
            idle_poll: Duration::from_secs(5),
            agent_timeout: None,
            resources_dir: PathBuf::from("resources"),
            workspace_root: PathBuf::from("projects"),
            art_dir: PathBuf::from("cartridge_arts"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl EngineConfig {
    /// Config with every path rooted under `state_dir`.
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            workspace_root: state_dir.join("workspaces"),
            art_dir: state_dir.join("art"),
            log_dir: state_dir.join("logs"),
            ..Self::default()
        }
    }

    forge_core::setters! {
        into {
            resources_dir: PathBuf,
            workspace_root: PathBuf,
            art_dir: PathBuf,
            log_dir: PathBuf,
        }
        set {
            max_queue_size: usize,
            backpressure: BackpressureDelays,
            idle_poll: Duration,
            agent_timeout: Option<Duration>,
        }
    }
}
