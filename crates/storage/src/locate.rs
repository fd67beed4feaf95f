// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact discovery by path construction and prefix listing.

use crate::backend::StorageBackend;
use crate::error::StorageError;
use forge_core::{Category, JobId, ObjectPath, SessionTimestamp, DEFAULT_ENTRY_POINT};
use serde::Serialize;
use std::collections::BTreeMap;

/// Where an asset lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// `cartridge_arts/{session}/{id}/{file}`
    CartridgeArt,
    /// `projects/{session}/{id}/assets/{file}`
    ProjectAsset,
}

/// Jobs stored under one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionListing {
    pub name: String,
    pub timestamp: String,
    pub games: Vec<String>,
}

/// URL of a job's entry document.
///
/// Prefers `projects/{session}/{id}/index.html`, then the first listed file
/// under that prefix whose name ends in `index.html`.
pub async fn entry_point(
    storage: &dyn StorageBackend,
    session: &SessionTimestamp,
    id: JobId,
) -> Result<Option<String>, StorageError> {
    let base = ObjectPath::job(Category::Projects, session, id);
    let root = base.join(DEFAULT_ENTRY_POINT);
    if storage.exists(root.as_str()).await? {
        return Ok(Some(storage.url(root.as_str())));
    }
    let files = storage.list_files(&format!("{base}/")).await?;
    Ok(files.iter().find(|f| f.ends_with(DEFAULT_ENTRY_POINT)).map(|f| storage.url(f)))
}

/// URL of an asset, if it exists.
pub async fn asset_url(
    storage: &dyn StorageBackend,
    kind: AssetKind,
    session: &SessionTimestamp,
    id: JobId,
    filename: &str,
) -> Result<Option<String>, StorageError> {
    let path = match kind {
        AssetKind::CartridgeArt => ObjectPath::job(Category::CartridgeArts, session, id).join(filename),
        AssetKind::ProjectAsset => {
            ObjectPath::job(Category::Projects, session, id).join("assets").join(filename)
        }
    };
    if storage.exists(path.as_str()).await? {
        Ok(Some(storage.url(path.as_str())))
    } else {
        Ok(None)
    }
}

/// Stored sessions, newest first, each with its job ids.
///
/// Path segments that are not session timestamps are ignored.
pub async fn list_sessions(storage: &dyn StorageBackend) -> Result<Vec<SessionListing>, StorageError> {
    let mut sessions: BTreeMap<SessionTimestamp, Vec<JobId>> = BTreeMap::new();
    for file in storage.list_files("projects/").await? {
        let Some(parsed) = ObjectPath::parse(&file) else { continue };
        if parsed.category != Category::Projects {
            continue;
        }
        let ids = sessions.entry(parsed.session).or_default();
        if !ids.contains(&parsed.job_id) {
            ids.push(parsed.job_id);
        }
    }

    let total = sessions.len();
    Ok(sessions
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, (session, mut ids))| {
            ids.sort();
            SessionListing {
                name: format!("Game Pack #{} ({} games)", total - i, ids.len()),
                timestamp: session.to_string(),
                games: ids.iter().map(JobId::to_string).collect(),
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "locate_tests.rs"]
mod tests;
