// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest entry model.
//!
//! The manifest is a JSON array of entries, one per completed job, kept at
//! `projects/manifest.json`. Older entries may carry a numeric `id` and no
//! `timestamp`; both are accepted on read.

use crate::report::JobReport;
use crate::session::SessionTimestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// Descriptive metadata recorded alongside each deliverable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub base_game: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub prompt: String,
}

/// One completed job as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub path_to_index_html: String,
    #[serde(default)]
    pub path_to_banner_art: Option<String>,
    #[serde(default)]
    pub path_to_cover_art: Option<String>,
    #[serde(default)]
    pub metadata: GameMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_report: Option<JobReport>,
}

impl ManifestEntry {
    /// Fill a missing `timestamp` from the session token embedded in
    /// `path_to_index_html`. Returns true if the entry changed.
    pub fn backfill_timestamp(&mut self) -> bool {
        if self.timestamp.is_some() {
            return false;
        }
        match SessionTimestamp::extract(&self.path_to_index_html) {
            Some(ts) => {
                self.timestamp = Some(ts.to_string());
                true
            }
            None => false,
        }
    }

    /// Session key used to group entries; `"unknown"` when none can be found.
    pub fn session_key(&self) -> String {
        self.timestamp
            .clone()
            .or_else(|| {
                SessionTimestamp::extract(&self.path_to_index_html).map(|ts| ts.to_string())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
