// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress messages streamed by the agent while a job runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the current job's message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl AgentMessage {
    pub fn new(timestamp: DateTime<Utc>, kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self { timestamp, kind: kind.into(), content: content.into() }
    }
}
