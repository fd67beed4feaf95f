// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job registry and bounded FIFO queue.
//!
//! Every operation takes the lock once and performs no I/O while holding it.

use crate::error::QueueError;
use forge_core::{BuildingBlock, Clock, Job, JobId, JobPatch, JobState};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

/// Snapshot of queue occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub size: usize,
    pub max_size: usize,
    pub is_full: bool,
}

impl QueueStatus {
    /// `size / max_size`; a zero-capacity queue counts as full.
    pub fn fill_ratio(&self) -> f64 {
        if self.max_size == 0 {
            1.0
        } else {
            self.size as f64 / self.max_size as f64
        }
    }
}

struct Registry {
    /// Pending ids, head is next to run
    pending: VecDeque<JobId>,
    /// Every job ever created
    jobs: BTreeMap<JobId, Job>,
    last_id: JobId,
}

/// In-memory job registry with a capacity-bounded queue of pending ids.
pub struct JobQueue<C: Clock> {
    registry: Mutex<Registry>,
    max_size: usize,
    clock: C,
}

impl<C: Clock> JobQueue<C> {
    pub fn new(max_size: usize, clock: C) -> Self {
        Self {
            registry: Mutex::new(Registry {
                pending: VecDeque::new(),
                jobs: BTreeMap::new(),
                last_id: JobId::new(0),
            }),
            max_size,
            clock,
        }
    }

    fn lock_registry<T>(&self, f: impl FnOnce(&mut Registry) -> T) -> T {
        f(&mut self.registry.lock())
    }

    /// Register a job and append it to the queue tail.
    pub fn create(&self, prompt: impl Into<String>, blocks: Vec<BuildingBlock>) -> Result<JobId, QueueError> {
        let prompt = prompt.into();
        let created_at = self.clock.utc_now();
        let max_size = self.max_size;
        let id = self.lock_registry(|reg| {
            if reg.pending.len() >= max_size {
                return Err(QueueError::QueueFull { max_size });
            }
            let id = reg.last_id.next();
            reg.last_id = id;
            reg.jobs.insert(id, Job::new(id, prompt, blocks, created_at));
            reg.pending.push_back(id);
            Ok(id)
        })?;
        tracing::info!(job_id = %id, "job created");
        Ok(id)
    }

    /// Remove and return the queue head. The job stays in the registry.
    pub fn pop(&self) -> Option<Job> {
        self.lock_registry(|reg| {
            let id = reg.pending.pop_front()?;
            reg.jobs.get(&id).cloned()
        })
    }

    pub fn get(&self, id: JobId) -> Result<Job, QueueError> {
        self.lock_registry(|reg| reg.jobs.get(&id).cloned().ok_or(QueueError::NotFound(id)))
    }

    /// Queued jobs in processing order.
    pub fn list(&self) -> Vec<Job> {
        self.lock_registry(|reg| reg.pending.iter().filter_map(|id| reg.jobs.get(id).cloned()).collect())
    }

    /// Every registered job in id order.
    pub fn list_all(&self) -> Vec<Job> {
        self.lock_registry(|reg| reg.jobs.values().cloned().collect())
    }

    /// Partially update a job, queued or not.
    pub fn patch(&self, id: JobId, patch: JobPatch) -> Result<Job, QueueError> {
        self.lock_registry(|reg| {
            let job = reg.jobs.get_mut(&id).ok_or(QueueError::NotFound(id))?;
            job.apply(patch);
            Ok(job.clone())
        })
    }

    pub fn status(&self) -> QueueStatus {
        let size = self.lock_registry(|reg| reg.pending.len());
        QueueStatus { size, max_size: self.max_size, is_full: size >= self.max_size }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Jobs in state `Completed`, in id order.
    pub fn completed(&self) -> Vec<Job> {
        self.lock_registry(|reg| {
            reg.jobs.values().filter(|j| j.state == JobState::Completed).cloned().collect()
        })
    }

    pub fn completed_count(&self) -> usize {
        self.lock_registry(|reg| reg.jobs.values().filter(|j| j.state == JobState::Completed).count())
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
