// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend selection, resolved once per process.

use crate::backend::StorageBackend;
use crate::error::StorageError;
use crate::local::LocalStorage;
use crate::s3::{S3Config, S3Storage};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Shared handle to the active backend.
pub type Storage = Arc<dyn StorageBackend>;

static STORAGE: OnceCell<Storage> = OnceCell::const_new();

/// Which backend to build, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Local { root: PathBuf, base_url: String },
    S3(S3Config),
}

impl StorageConfig {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        StorageConfig::Local { root: root.into(), base_url: String::new() }
    }

    /// Construct a fresh backend. Most callers want [`init`] instead.
    pub async fn build(&self) -> Storage {
        match self {
            StorageConfig::Local { root, base_url } => {
                tracing::info!(root = %root.display(), "using local storage");
                Arc::new(LocalStorage::new(root.clone(), base_url.clone()))
            }
            StorageConfig::S3(config) => Arc::new(S3Storage::connect(config.clone()).await),
        }
    }
}

/// Backend name accepted by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendName {
    #[default]
    Local,
    S3,
}

impl FromStr for BackendName {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "local" => Ok(BackendName::Local),
            "s3" => Ok(BackendName::S3),
            other => Err(StorageError::Config(format!("unknown storage backend: {other}"))),
        }
    }
}

/// Initialize the process-wide backend. Later calls return the first
/// backend regardless of `config`.
pub async fn init(config: &StorageConfig) -> Storage {
    STORAGE.get_or_init(|| config.build()).await.clone()
}

/// The process-wide backend, if [`init`] has run.
pub fn global() -> Option<Storage> {
    STORAGE.get().cloned()
}
