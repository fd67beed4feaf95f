// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::block::{BlockFile, BuildingBlock};
use crate::job::{Job, JobId};
use crate::manifest::{GameMetadata, ManifestEntry};
use crate::report::JobReport;
use chrono::{TimeZone, Utc};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core types.
pub mod strategies {
    use crate::block::{BlockFile, BuildingBlock};
    use crate::job::JobState;
    use proptest::prelude::*;

    pub fn arb_job_state() -> impl Strategy<Value = JobState> {
        prop_oneof![
            Just(JobState::NotStarted),
            Just(JobState::Running),
            Just(JobState::Completed),
            Just(JobState::Failed),
        ]
    }

    pub fn arb_prompt() -> impl Strategy<Value = String> {
        "[a-z]{1,8}( [a-z]{1,8}){0,6}"
    }

    pub fn arb_block() -> impl Strategy<Value = BuildingBlock> {
        ("[a-z]{3,10}", "[a-z]{1,8}\\.js").prop_map(|(folder, file)| {
            BuildingBlock::inline(folder, vec![BlockFile::new(file, "// code")])
        })
    }

    pub fn arb_blocks() -> impl Strategy<Value = Vec<BuildingBlock>> {
        prop::collection::vec(arb_block(), 0..3)
    }
}

// ── Factory functions ───────────────────────────────────────────────────

pub fn inline_block(name: &str) -> BuildingBlock {
    BuildingBlock::inline(name, vec![BlockFile::new("main.js", format!("// {name}"))])
}

pub fn test_job(id: u64, prompt: &str) -> Job {
    let created = Utc.with_ymd_and_hms(2025, 11, 23, 0, 56, 59).single().unwrap_or_default();
    Job::new(JobId::new(id), prompt, vec![inline_block("snake")], created)
}

pub fn test_report(name: &str) -> JobReport {
    JobReport::new(name, format!("{name} summary"), "index.html")
}

pub fn manifest_entry(id: &str, session: &str) -> ManifestEntry {
    ManifestEntry {
        id: id.to_string(),
        timestamp: Some(session.to_string()),
        path_to_index_html: format!("/projects/{session}/{id}/index.html"),
        path_to_banner_art: None,
        path_to_cover_art: None,
        metadata: GameMetadata { name: format!("game {id}"), ..GameMetadata::default() },
        job_report: None,
    }
}
