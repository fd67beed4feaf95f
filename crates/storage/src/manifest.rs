// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only manifest of finished jobs, stored as one JSON document.

use crate::backend::StorageBackend;
use crate::error::StorageError;
use forge_core::ManifestEntry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Storage path of the manifest document.
pub const MANIFEST_PATH: &str = "projects/manifest.json";

/// Entries from one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionGroup {
    pub index: usize,
    /// Session timestamp
    pub id: String,
    pub projects: Vec<ManifestEntry>,
}

/// Read-modify-write access to the manifest.
///
/// Only the worker loop appends, so writes are not coordinated beyond that.
#[derive(Clone)]
pub struct Manifest {
    storage: Arc<dyn StorageBackend>,
    path: String,
}

impl Manifest {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage, path: MANIFEST_PATH.to_string() }
    }

    pub fn at(storage: Arc<dyn StorageBackend>, path: impl Into<String>) -> Self {
        Self { storage, path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// All entries, with missing timestamps backfilled from their paths.
    ///
    /// A manifest that has never been written reads as empty.
    pub async fn load(&self) -> Result<Vec<ManifestEntry>, StorageError> {
        let mut entries = self.load_raw().await?;
        let mut backfilled = 0;
        for entry in &mut entries {
            if entry.backfill_timestamp() {
                backfilled += 1;
            }
        }
        if backfilled > 0 {
            tracing::debug!(backfilled, "backfilled manifest timestamps");
        }
        Ok(entries)
    }

    async fn load_raw(&self) -> Result<Vec<ManifestEntry>, StorageError> {
        match self.storage.read_text(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Append one entry and write the whole manifest back. Returns the new
    /// entry count.
    pub async fn append(&self, entry: ManifestEntry) -> Result<usize, StorageError> {
        let mut entries = self.load_raw().await?;
        let id = entry.id.clone();
        entries.push(entry);
        let text = serde_json::to_string_pretty(&entries)?;
        self.storage.save_text(&self.path, &text).await?;
        tracing::info!(id, count = entries.len(), "appended manifest entry");
        Ok(entries.len())
    }

    /// Entries grouped by session, oldest session first.
    pub async fn grouped(&self) -> Result<Vec<SessionGroup>, StorageError> {
        let mut sessions: BTreeMap<String, Vec<ManifestEntry>> = BTreeMap::new();
        for entry in self.load().await? {
            sessions.entry(entry.session_key()).or_default().push(entry);
        }
        Ok(sessions
            .into_iter()
            .enumerate()
            .map(|(index, (id, projects))| SessionGroup { index, id, projects })
            .collect())
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
