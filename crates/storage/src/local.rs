// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local filesystem backend.

use crate::backend::{relative_key, walk_files, BackendKind, StorageBackend, StorageDescriptor};
use crate::error::StorageError;
use async_trait::async_trait;
use forge_core::normalize_relative;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Stores objects as files under `root`.
///
/// URLs are root-relative (`/{path}`) unless a base URL is configured.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { root: root.into(), base_url }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `path`. Rejects paths escaping the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = normalize_relative(path);
        let rel = Path::new(&rel);
        if rel.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(rel))
    }

    async fn ensure_parent(path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| StorageError::io(parent, e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn url(&self, path: &str) -> String {
        let path = normalize_relative(path);
        if self.base_url.is_empty() {
            format!("/{path}")
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn describe(&self) -> StorageDescriptor {
        StorageDescriptor { kind: BackendKind::Local, base_url: self.base_url.clone(), bucket: None }
    }

    async fn save_binary(&self, path: &str, data: Vec<u8>) -> Result<String, StorageError> {
        let full = self.resolve(path)?;
        Self::ensure_parent(&full).await?;
        tokio::fs::write(&full, data).await.map_err(|e| StorageError::io(&full, e))?;
        tracing::debug!(path = %full.display(), "saved file");
        Ok(self.url(path))
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.to_string())),
            Err(e) => Err(StorageError::io(&full, e)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::try_exists(&full).await.map_err(|e| StorageError::io(&full, e))
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&full, e)),
        }
    }

    async fn list_files(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.resolve(prefix)?;
        if !tokio::fs::try_exists(&dir).await.map_err(|e| StorageError::io(&dir, e))? {
            return Ok(Vec::new());
        }
        let files = walk_files(&dir).await?;
        Ok(files.iter().map(|f| relative_key(&self.root, f)).collect())
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<String, StorageError> {
        let from = self.resolve(src)?;
        let to = self.resolve(dst)?;
        Self::ensure_parent(&to).await?;
        match tokio::fs::copy(&from, &to).await {
            Ok(_) => Ok(self.url(dst)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(src.to_string())),
            Err(e) => Err(StorageError::io(&from, e)),
        }
    }

    /// Copy the tree file by file. A no-op when `local_dir` already is the
    /// destination.
    async fn sync_dir(&self, local_dir: &Path, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dest = self.resolve(prefix)?;
        let same = match (tokio::fs::canonicalize(local_dir).await, tokio::fs::canonicalize(&dest).await) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        let files = walk_files(local_dir).await?;
        if same {
            return Ok(files
                .iter()
                .map(|f| self.url(&crate::backend::join_key(prefix, &relative_key(local_dir, f))))
                .collect());
        }
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let key = crate::backend::join_key(prefix, &relative_key(local_dir, &file));
            let target = self.resolve(&key)?;
            Self::ensure_parent(&target).await?;
            tokio::fs::copy(&file, &target).await.map_err(|e| StorageError::io(&file, e))?;
            urls.push(self.url(&key));
        }
        tracing::debug!(dir = %local_dir.display(), prefix, count = urls.len(), "copied directory");
        Ok(urls)
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
