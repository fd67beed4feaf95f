// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job workspace directories.
//!
//! Layout: `{root}/{session}/{id}/` holding `resources/` (building blocks)
//! and `assets/` (generated images).

use crate::error::WorkspaceError;
use forge_core::{BuildingBlock, JobId, SessionTimestamp};
use std::io;
use std::path::{Path, PathBuf};

pub const RESOURCES_DIR: &str = "resources";
pub const ASSETS_DIR: &str = "assets";

/// Location of one job's workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    session_dir: PathBuf,
    path: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path, session: &SessionTimestamp, id: JobId) -> Self {
        let session_dir = root.join(session.as_str());
        let path = session_dir.join(id.to_string());
        Self { session_dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.path.join(RESOURCES_DIR)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.path.join(ASSETS_DIR)
    }

    /// Create the directory tree and materialize every building block under
    /// `resources/{folder_name}`.
    pub async fn prepare(&self, blocks: &[BuildingBlock]) -> Result<(), WorkspaceError> {
        let resources = self.resources_dir();
        for dir in [&resources, &self.assets_dir()] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| WorkspaceError::new(dir, e))?;
        }

        let blocks = blocks.to_vec();
        tokio::task::spawn_blocking(move || {
            for block in &blocks {
                materialize(block, &resources)?;
            }
            Ok(())
        })
        .await
        .map_err(|e| WorkspaceError::new(&self.path, io::Error::other(e.to_string())))?
    }

    /// Remove the job directory if empty, then the session directory if
    /// that left it empty.
    pub async fn prune(&self) {
        for dir in [&self.path, &self.session_dir] {
            match is_empty_dir(dir).await {
                Ok(true) => {
                    if let Err(e) = tokio::fs::remove_dir(dir).await {
                        tracing::warn!(path = %dir.display(), error = %e, "failed to prune directory");
                        return;
                    }
                    tracing::debug!(path = %dir.display(), "pruned empty directory");
                }
                Ok(false) => return,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = %e, "failed to inspect directory");
                    return;
                }
            }
        }
    }
}

async fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    Ok(entries.next_entry().await?.is_none())
}

fn materialize(block: &BuildingBlock, resources: &Path) -> Result<(), WorkspaceError> {
    let dest = resources.join(&block.folder_name);
    if dest.exists() {
        // Hybrids can name the same block twice
        tracing::debug!(block = %block.folder_name, "building block already present");
        return Ok(());
    }

    if let Some(source) = block.source() {
        let meta = std::fs::metadata(source).map_err(|e| WorkspaceError::new(source, e))?;
        if meta.is_dir() {
            copy_tree(source, &dest)?;
        } else {
            std::fs::copy(source, &dest).map_err(|e| WorkspaceError::new(source, e))?;
        }
    }

    if !block.files.is_empty() {
        std::fs::create_dir_all(&dest).map_err(|e| WorkspaceError::new(&dest, e))?;
        for file in &block.files {
            let path = dest.join(forge_core::normalize_relative(&file.filename));
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::new(parent, e))?;
            }
            std::fs::write(&path, &file.code).map_err(|e| WorkspaceError::new(&path, e))?;
        }
    }
    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> Result<(), WorkspaceError> {
    std::fs::create_dir_all(dest).map_err(|e| WorkspaceError::new(dest, e))?;
    let entries = std::fs::read_dir(src).map_err(|e| WorkspaceError::new(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| WorkspaceError::new(src, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| WorkspaceError::new(&from, e))?;
        if file_type.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| WorkspaceError::new(&from, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
