// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! forge-engine: job registry, producer and worker loops

mod artifacts;
mod config;
mod engine;
mod error;
mod job_logger;
pub mod producer;
pub mod prompts;
mod queue;
mod state;
mod worker;
mod workspace;

pub use artifacts::{generate_art, ArtKind};
pub use config::{BackpressureDelays, EngineConfig, DEFAULT_MAX_QUEUE_SIZE};
pub use engine::{Engine, StartOutcome, StopOutcome};
pub use error::{EngineError, QueueError, WorkspaceError};
pub use job_logger::JobLogger;
pub use producer::{Backpressure, Proposal, Proposer};
pub use queue::{JobQueue, QueueStatus};
pub use state::{CurrentJobView, OnlineChange, ProcessState, StateSnapshot};
pub use worker::{Adapters, Worker};
pub use workspace::{Workspace, ASSETS_DIR, RESOURCES_DIR};
