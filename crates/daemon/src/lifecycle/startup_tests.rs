// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use forge_storage::StorageConfig;
use std::time::Duration;

#[tokio::test]
async fn startup_creates_directories_and_goes_online() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_state_dir(dir.path().join("state"));
    // Missing seed blocks fail each job at workspace prep, before any agent runs
    config.resources_dir = dir.path().join("no-resources");
    config.storage = StorageConfig::local(dir.path().join("store"));
    config.drain_timeout = Duration::from_millis(100);

    let daemon = startup(&config).await.unwrap();

    assert!(config.workspaces_path.is_dir());
    assert!(config.logs_path.is_dir());
    assert!(daemon.engine.snapshot().online);

    daemon.shutdown().await;
    assert!(daemon.engine.snapshot().stop_requested);
}
