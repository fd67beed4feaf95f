// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage backend trait shared by the local and S3 implementations.

use crate::error::StorageError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Which backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Local,
    S3,
}

forge_core::simple_display! {
    BackendKind {
        Local => "local",
        S3 => "s3",
    }
}

/// Public description of the active backend, for frontends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageDescriptor {
    #[serde(rename = "type")]
    pub kind: BackendKind,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

/// Uniform object operations over a relative path namespace.
///
/// Paths are `/`-separated and relative to the backend root. Save and copy
/// operations return the public URL of the written object.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    fn kind(&self) -> BackendKind;

    /// Public URL for `path`. Does not check existence.
    fn url(&self, path: &str) -> String;

    fn describe(&self) -> StorageDescriptor;

    async fn save_binary(&self, path: &str, data: Vec<u8>) -> Result<String, StorageError>;

    async fn save_text(&self, path: &str, text: &str) -> Result<String, StorageError> {
        self.save_binary(path, text.as_bytes().to_vec()).await
    }

    /// Fails with [`StorageError::NotFound`] when the object is missing.
    async fn read_binary(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    async fn read_text(&self, path: &str) -> Result<String, StorageError> {
        let bytes = self.read_binary(path).await?;
        String::from_utf8(bytes).map_err(|_| StorageError::Utf8(path.to_string()))
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Returns false when there was nothing to delete.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// All object paths under `prefix`, relative to the backend root.
    async fn list_files(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    async fn copy(&self, src: &str, dst: &str) -> Result<String, StorageError>;

    /// Upload every file under `local_dir` to `{prefix}/{relative path}`.
    ///
    /// Returns the URLs of the uploaded objects.
    async fn sync_dir(&self, local_dir: &Path, prefix: &str) -> Result<Vec<String>, StorageError> {
        let files = walk_files(local_dir).await?;
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let rel = relative_key(local_dir, &file);
            let key = join_key(prefix, &rel);
            let data = tokio::fs::read(&file).await.map_err(|e| StorageError::io(&file, e))?;
            urls.push(self.save_binary(&key, data).await?);
        }
        tracing::debug!(dir = %local_dir.display(), prefix, count = urls.len(), "synced directory");
        Ok(urls)
    }
}

/// Recursively collect regular files under `root`, sorted.
pub(crate) async fn walk_files(root: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && dir != root => continue,
            Err(e) => return Err(StorageError::io(&dir, e)),
        };
        while let Some(entry) = entries.next_entry().await.map_err(|e| StorageError::io(&dir, e))? {
            let file_type = entry.file_type().await.map_err(|e| StorageError::io(entry.path(), e))?;
            if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// `file` relative to `root`, `/`-separated.
pub(crate) fn relative_key(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn join_key(prefix: &str, rel: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        rel.to_string()
    } else {
        format!("{prefix}/{rel}")
    }
}
