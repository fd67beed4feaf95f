// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Producer loop: proposes jobs and throttles on queue fill ratio.

use crate::config::BackpressureDelays;
use crate::error::QueueError;
use crate::prompts;
use crate::queue::{JobQueue, QueueStatus};
use crate::state::ProcessState;
use forge_core::{BuildingBlock, Clock, Job, SeedBlock};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Completed jobs needed before hybrids replace seed ideas.
pub const HYBRID_THRESHOLD: usize = 3;

/// Seeds offered before enough jobs have completed.
pub const SEED_IDEAS: [SeedBlock; 3] = [SeedBlock::Snake, SeedBlock::Minesweeper, SeedBlock::Breakout];

/// What the producer does this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backpressure {
    Proceed,
    /// Sleep, then propose
    Delay(Duration),
    /// Sleep and start over without proposing
    Skip(Duration),
}

impl Backpressure {
    pub fn for_fill(status: QueueStatus, delays: &BackpressureDelays) -> Self {
        if status.is_full {
            return Backpressure::Skip(delays.full);
        }
        let ratio = status.fill_ratio();
        if ratio >= 0.8 {
            Backpressure::Delay(delays.high)
        } else if ratio >= 0.5 {
            Backpressure::Delay(delays.mid)
        } else {
            Backpressure::Proceed
        }
    }
}

/// A job-to-be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub prompt: String,
    pub blocks: Vec<BuildingBlock>,
}

/// Picks the next idea: a seed, or a blend of two completed jobs.
pub struct Proposer {
    resources_dir: PathBuf,
    rng: Mutex<StdRng>,
}

impl Proposer {
    pub fn new(resources_dir: impl Into<PathBuf>) -> Self {
        Self::with_rng(resources_dir, StdRng::from_os_rng())
    }

    pub fn with_rng(resources_dir: impl Into<PathBuf>, rng: StdRng) -> Self {
        Self { resources_dir: resources_dir.into(), rng: Mutex::new(rng) }
    }

    pub fn propose(&self, completed: &[Job]) -> Proposal {
        let mut rng = self.rng.lock();
        if completed.len() > HYBRID_THRESHOLD {
            // Sampled with replacement; both picks may be the same job
            if let (Some(first), Some(second)) = (completed.choose(&mut *rng), completed.choose(&mut *rng)) {
                let mut blocks = first.blocks.clone();
                blocks.extend(second.blocks.iter().cloned());
                return Proposal { prompt: prompts::hybrid_prompt(&first.prompt, &second.prompt), blocks };
            }
        }
        let seed = SEED_IDEAS.choose(&mut *rng).copied().unwrap_or(SeedBlock::Snake);
        Proposal {
            prompt: format!("make me a {} game using phaser.js", seed.name()),
            blocks: vec![seed.block(&self.resources_dir)],
        }
    }
}

/// Outcome of one producer iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Submitted(forge_core::JobId),
    /// Queue was full on entry
    Skipped,
    /// Queue filled up between the check and the create
    Rejected,
}

/// One iteration: backpressure check, optional sleep, propose, create.
pub async fn tick<C: Clock>(
    queue: &JobQueue<C>,
    proposer: &Proposer,
    delays: &BackpressureDelays,
) -> Tick {
    match Backpressure::for_fill(queue.status(), delays) {
        Backpressure::Skip(d) => {
            tracing::debug!(sleep_ms = d.as_millis() as u64, "queue full, backing off");
            tokio::time::sleep(d).await;
            return Tick::Skipped;
        }
        Backpressure::Delay(d) => tokio::time::sleep(d).await,
        Backpressure::Proceed => {}
    }

    let proposal = proposer.propose(&queue.completed());
    match queue.create(proposal.prompt, proposal.blocks) {
        Ok(id) => Tick::Submitted(id),
        Err(QueueError::QueueFull { .. }) => Tick::Rejected,
        Err(e) => {
            tracing::warn!(error = %e, "unexpected queue error");
            Tick::Rejected
        }
    }
}

/// Run until the stop flag is seen at the top of an iteration.
pub async fn run_producer<C: Clock>(
    queue: Arc<JobQueue<C>>,
    state: Arc<ProcessState<C>>,
    proposer: Proposer,
    delays: BackpressureDelays,
) {
    tracing::info!("producer started");
    while !state.should_stop() {
        if let Tick::Submitted(id) = tick(&queue, &proposer, &delays).await {
            tracing::info!(job_id = %id, "proposed job");
        }
    }
    tracing::info!("producer stopped");
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
