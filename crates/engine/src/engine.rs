// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine facade: owns the registry, the process state and both loops.

use crate::config::EngineConfig;
use crate::error::QueueError;
use crate::producer::{run_producer, Proposer};
use crate::queue::{JobQueue, QueueStatus};
use crate::state::{OnlineChange, ProcessState, StateSnapshot};
use crate::worker::{Adapters, Worker};
use forge_adapters::{AgentAdapter, ImageAdapter, Validator};
use forge_core::{BuildingBlock, Clock, Job, JobId, JobPatch, SessionTimestamp};
use forge_storage::Storage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Result of [`Engine::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

forge_core::simple_display! {
    StartOutcome {
        Started => "started",
        AlreadyRunning => "already_running",
    }
}

/// Result of [`Engine::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopping,
    AlreadyStopped,
}

forge_core::simple_display! {
    StopOutcome {
        Stopping => "stopping",
        AlreadyStopped => "already_stopped",
    }
}

pub struct Engine<C: Clock, A, I, V> {
    worker: Arc<Worker<C, A, I, V>>,
    config: EngineConfig,
    loops: Mutex<Vec<JoinHandle<()>>>,
}

impl<C, A, I, V> Engine<C, A, I, V>
where
    C: Clock,
    A: AgentAdapter,
    I: ImageAdapter,
    V: Validator,
{
    /// Build an engine. The session timestamp is fixed for the process
    /// lifetime.
    pub fn new(clock: C, storage: Storage, adapters: Adapters<A, I, V>, config: EngineConfig) -> Self {
        let session = SessionTimestamp::now(&clock);
        let queue = Arc::new(JobQueue::new(config.max_queue_size, clock.clone()));
        let state = Arc::new(ProcessState::new(clock));
        let worker = Arc::new(Worker::new(queue, state, storage, adapters, config.clone(), session));
        Self { worker, config, loops: Mutex::new(Vec::new()) }
    }

    pub fn session(&self) -> &SessionTimestamp {
        self.worker.session()
    }

    fn queue(&self) -> &JobQueue<C> {
        &self.worker.queue
    }

    fn state(&self) -> &ProcessState<C> {
        &self.worker.state
    }

    /// Go online and spawn the producer and worker loops. A second call
    /// while online spawns nothing.
    pub fn start(&self) -> StartOutcome {
        if self.state().set_online(true) == OnlineChange::Unchanged {
            tracing::info!("start requested while already running");
            return StartOutcome::AlreadyRunning;
        }
        tracing::info!(session = %self.session(), "engine starting");
        self.abort_stale_loops();

        let producer = tokio::spawn(run_producer(
            Arc::clone(&self.worker.queue),
            Arc::clone(&self.worker.state),
            Proposer::new(&self.config.resources_dir),
            self.config.backpressure,
        ));
        let worker = tokio::spawn(Arc::clone(&self.worker).run());
        self.loops.lock().extend([producer, worker]);
        StartOutcome::Started
    }

    /// A loop from a previous run may still be sleeping past the stop it
    /// never observed. It must not outlive the restart.
    fn abort_stale_loops(&self) {
        for handle in self.loops.lock().drain(..) {
            if !handle.is_finished() {
                tracing::debug!("aborting loop left over from previous run");
                handle.abort();
            }
        }
    }

    /// Ask both loops to exit. The running job, if any, is not interrupted.
    pub fn stop(&self) -> StopOutcome {
        if !self.state().is_online() {
            return StopOutcome::AlreadyStopped;
        }
        self.state().request_stop();
        tracing::info!("stop requested");
        StopOutcome::Stopping
    }

    /// Wait up to `timeout` for the loops to exit. Returns false if any
    /// were still running.
    pub async fn wait(&self, timeout: Duration) -> bool {
        let handles: Vec<_> = std::mem::take(&mut *self.loops.lock());
        let drain = async {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "engine loop ended abnormally");
                }
            }
        };
        match tokio::time::timeout(timeout, drain).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "engine loops still running");
                false
            }
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state().snapshot(self.queue())
    }

    pub fn create(&self, prompt: impl Into<String>, blocks: Vec<BuildingBlock>) -> Result<JobId, QueueError> {
        self.queue().create(prompt, blocks)
    }

    pub fn get(&self, id: JobId) -> Result<Job, QueueError> {
        self.queue().get(id)
    }

    pub fn list(&self) -> Vec<Job> {
        self.queue().list()
    }

    pub fn list_all(&self) -> Vec<Job> {
        self.queue().list_all()
    }

    pub fn patch(&self, id: JobId, patch: JobPatch) -> Result<Job, QueueError> {
        self.queue().patch(id, patch)
    }

    pub fn status(&self) -> QueueStatus {
        self.queue().status()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
