// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::sync::Arc;
use std::time::Instant;

use forge_adapters::{CommandAgentAdapter, ScriptValidator};
use forge_core::SystemClock;
use forge_engine::{Adapters, Engine};
use tracing::info;

use crate::adapters::ImageRouter;

use super::{Config, DaemonState, LifecycleError};

/// Start the daemon: directories, storage singleton, engine loops.
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    for dir in [&config.state_dir, &config.workspaces_path, &config.logs_path, &config.art_path] {
        std::fs::create_dir_all(dir)?;
    }
    if !config.resources_dir.is_dir() {
        tracing::warn!(path = %config.resources_dir.display(), "resources directory not found");
    }

    let storage = forge_storage::init(&config.storage).await;
    info!(storage = ?storage.describe(), "storage ready");

    let image = match &config.image_command {
        Some(program) => ImageRouter::Command(forge_adapters::CommandImageAdapter::new(program)),
        None => {
            info!("FORGE_IMAGE_COMMAND unset, image generation disabled");
            ImageRouter::Disabled(forge_adapters::NoopImageAdapter)
        }
    };
    let adapters = Adapters {
        agent: CommandAgentAdapter::new(&config.agent_command),
        image,
        validator: ScriptValidator,
    };

    let engine = Arc::new(Engine::new(SystemClock, storage, adapters, config.engine_config()));
    let outcome = engine.start();
    info!(session = %engine.session(), %outcome, "daemon started");

    Ok(DaemonState { config: config.clone(), engine, start_time: Instant::now() })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
