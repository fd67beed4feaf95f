// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and lifecycle state.

use crate::block::BuildingBlock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a job.
///
/// Assigned by the registry at creation time; strictly increasing and never
/// reused within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    /// Queued, waiting for the worker
    #[default]
    NotStarted,
    /// Picked up by the worker
    Running,
    /// Finalized into storage and the manifest
    Completed,
    /// Pipeline gave up on this job
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

crate::simple_display! {
    JobState {
        NotStarted => "NotStarted",
        Running => "Running",
        Completed => "Completed",
        Failed => "Failed",
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown job state: {0}")]
pub struct ParseJobStateError(pub String);

impl FromStr for JobState {
    type Err = ParseJobStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotStarted" | "not_started" => Ok(JobState::NotStarted),
            "Running" | "running" => Ok(JobState::Running),
            "Completed" | "completed" => Ok(JobState::Completed),
            "Failed" | "failed" => Ok(JobState::Failed),
            other => Err(ParseJobStateError(other.to_string())),
        }
    }
}

/// A unit of proposed work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub prompt: String,
    #[serde(default)]
    pub blocks: Vec<BuildingBlock>,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    /// `{session}/{id}`, set once the worker picks the job up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_path: Option<String>,
    /// Summary from the completion report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Why the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    pub fn new(
        id: JobId,
        prompt: impl Into<String>,
        blocks: Vec<BuildingBlock>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            blocks,
            state: JobState::NotStarted,
            created_at,
            workspace_path: None,
            summary: None,
            error: None,
        }
    }

    /// Apply a partial update. Absent fields are left untouched.
    pub fn apply(&mut self, patch: JobPatch) {
        if let Some(prompt) = patch.prompt {
            self.prompt = prompt;
        }
        if let Some(blocks) = patch.blocks {
            self.blocks = blocks;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(path) = patch.workspace_path {
            self.workspace_path = Some(path);
        }
        if let Some(summary) = patch.summary {
            self.summary = Some(summary);
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Partial update for a [`Job`].
///
/// `prompt`, `blocks` and `state` are the externally patchable fields; the
/// remaining fields are written by the worker as it drives the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<BuildingBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,
    #[serde(skip)]
    pub workspace_path: Option<String>,
    #[serde(skip)]
    pub summary: Option<String>,
    #[serde(skip)]
    pub error: Option<String>,
}

impl JobPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only moves the job to `state`.
    pub fn state(state: JobState) -> Self {
        Self { state: Some(state), ..Self::default() }
    }

    crate::setters! {
        option {
            prompt: String,
            blocks: Vec<BuildingBlock>,
            workspace_path: String,
            summary: String,
            error: String,
        }
    }

    pub fn with_state(mut self, state: JobState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prompt.is_none()
            && self.blocks.is_none()
            && self.state.is_none()
            && self.workspace_path.is_none()
            && self.summary.is_none()
            && self.error.is_none()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
