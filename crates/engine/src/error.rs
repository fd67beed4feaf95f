// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use forge_core::JobId;
use forge_storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the job registry and queue
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue is full (max {max_size})")]
    QueueFull { max_size: usize },
    #[error("job not found: {0}")]
    NotFound(JobId),
}

/// Failure materializing a job workspace
#[derive(Debug, Error)]
#[error("workspace error at {path}: {source}")]
pub struct WorkspaceError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl WorkspaceError {
    pub(crate) fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self { path: path.into(), source }
    }
}

/// Errors that end one job's pipeline
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("agent produced no completion report")]
    NoReport,
    #[error("pipeline task failed: {0}")]
    Task(String),
}
