// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide run state: online and stop flags, the current job slot and
//! its interaction log.

use crate::queue::JobQueue;
use chrono::{DateTime, Utc};
use forge_core::{format_elapsed, AgentMessage, Clock, Job, JobId};
use parking_lot::Mutex;
use serde::Serialize;
use std::time::{Duration, Instant};

/// The job occupying the worker's single slot.
#[derive(Debug, Clone)]
struct CurrentJob {
    id: JobId,
    prompt: String,
    started_at: DateTime<Utc>,
    started: Instant,
}

#[derive(Default)]
struct Flags {
    online: bool,
    stop_requested: bool,
    running: bool,
    current: Option<CurrentJob>,
    messages: Vec<AgentMessage>,
}

/// Result of [`ProcessState::set_online`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlineChange {
    Changed,
    Unchanged,
}

/// Online/stop flags and current-job bookkeeping behind one lock.
pub struct ProcessState<C: Clock> {
    flags: Mutex<Flags>,
    clock: C,
}

impl<C: Clock> ProcessState<C> {
    pub fn new(clock: C) -> Self {
        Self { flags: Mutex::new(Flags::default()), clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Going online clears the stop flag. Setting the current value again
    /// changes nothing and reports `Unchanged`.
    pub fn set_online(&self, online: bool) -> OnlineChange {
        let mut flags = self.flags.lock();
        if flags.online == online {
            return OnlineChange::Unchanged;
        }
        flags.online = online;
        if online {
            flags.stop_requested = false;
        }
        OnlineChange::Changed
    }

    pub fn is_online(&self) -> bool {
        self.flags.lock().online
    }

    /// Ask both loops to exit at their next check.
    pub fn request_stop(&self) {
        self.flags.lock().stop_requested = true;
    }

    pub fn should_stop(&self) -> bool {
        self.flags.lock().stop_requested
    }

    pub fn is_running(&self) -> bool {
        self.flags.lock().running
    }

    /// Occupy the current-job slot and reset the interaction log.
    pub fn start_job(&self, id: JobId, prompt: &str) {
        let current = CurrentJob {
            id,
            prompt: prompt.to_string(),
            started_at: self.clock.utc_now(),
            started: self.clock.now(),
        };
        let mut flags = self.flags.lock();
        flags.running = true;
        flags.current = Some(current);
        flags.messages.clear();
    }

    /// Append to the interaction log of the current run.
    pub fn add_message(&self, kind: &str, content: &str) {
        let message = AgentMessage::new(self.clock.utc_now(), kind, content);
        self.flags.lock().messages.push(message);
    }

    /// Release the slot. The job id and log stay visible until the next start.
    pub fn finish_job(&self) {
        self.flags.lock().running = false;
    }

    /// Read-only view for external callers.
    pub fn snapshot(&self, queue: &JobQueue<C>) -> StateSnapshot {
        let now = self.clock.now();
        let (online, stop_requested, running, current, messages) = {
            let flags = self.flags.lock();
            (
                flags.online,
                flags.stop_requested,
                flags.running,
                flags.current.clone(),
                flags.messages.clone(),
            )
        };
        let current_job = current.map(|c| {
            let elapsed = if running { now.saturating_duration_since(c.started) } else { Duration::ZERO };
            CurrentJobView {
                id: c.id,
                prompt: c.prompt,
                started_at: c.started_at,
                elapsed_secs: elapsed.as_secs(),
                elapsed: format_elapsed(elapsed),
            }
        });
        StateSnapshot {
            online,
            stop_requested,
            running,
            current_job,
            message_count: messages.len(),
            messages,
            queue: queue.list(),
            completed_count: queue.completed_count(),
        }
    }
}

/// Current job as exposed in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentJobView {
    pub id: JobId,
    pub prompt: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: u64,
    /// e.g. `3m12s`
    pub elapsed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub online: bool,
    pub stop_requested: bool,
    pub running: bool,
    pub current_job: Option<CurrentJobView>,
    pub message_count: usize,
    pub messages: Vec<AgentMessage>,
    pub queue: Vec<Job>,
    pub completed_count: usize,
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
