// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker loop and the per-job execution pipeline.
//!
//! One job at a time: dequeue, prepare the workspace, fan out cover art,
//! banner art and the agent, then finalize into storage and the manifest.
//! Cleanup runs after every job whatever the outcome.

use crate::artifacts::{generate_art, ArtKind};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::job_logger::JobLogger;
use crate::prompts;
use crate::queue::JobQueue;
use crate::state::ProcessState;
use crate::workspace::Workspace;
use forge_adapters::{AgentAdapter, AgentContext, AgentUpdate, ImageAdapter, JobTools, Validator};
use forge_core::{
    Category, Clock, GameMetadata, Job, JobId, JobPatch, JobReport, JobState, ManifestEntry,
    ObjectPath, SessionTimestamp,
};
use forge_storage::{Manifest, Storage};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the agent update channel.
const UPDATE_BUFFER: usize = 64;

/// Clears the online flag when the worker loop exits, however it exits.
struct OnlineGuard<C: Clock>(Arc<ProcessState<C>>);

impl<C: Clock> Drop for OnlineGuard<C> {
    fn drop(&mut self) {
        self.0.set_online(false);
        tracing::info!("worker offline");
    }
}

/// Everything the pipeline needs, shared between the loop and job tasks.
pub struct Worker<C: Clock, A, I, V> {
    pub(crate) queue: Arc<JobQueue<C>>,
    pub(crate) state: Arc<ProcessState<C>>,
    storage: Storage,
    manifest: Manifest,
    agent: A,
    image: I,
    validator: V,
    logger: JobLogger,
    config: EngineConfig,
    session: SessionTimestamp,
}

/// Adapters driven by the pipeline.
#[derive(Clone)]
pub struct Adapters<A, I, V> {
    pub agent: A,
    pub image: I,
    pub validator: V,
}

impl<C, A, I, V> Worker<C, A, I, V>
where
    C: Clock,
    A: AgentAdapter,
    I: ImageAdapter,
    V: Validator,
{
    pub fn new(
        queue: Arc<JobQueue<C>>,
        state: Arc<ProcessState<C>>,
        storage: Storage,
        adapters: Adapters<A, I, V>,
        config: EngineConfig,
        session: SessionTimestamp,
    ) -> Self {
        Self {
            queue,
            state,
            manifest: Manifest::new(storage.clone()),
            storage,
            agent: adapters.agent,
            image: adapters.image,
            validator: adapters.validator,
            logger: JobLogger::new(&config.log_dir),
            config,
            session,
        }
    }

    pub fn session(&self) -> &SessionTimestamp {
        &self.session
    }

    fn log(&self, id: JobId, step: &str, message: &str) {
        self.logger.append(id, self.state.clock().utc_now(), step, message);
    }

    /// Run jobs until the stop flag is seen between jobs.
    pub async fn run(self: Arc<Self>) {
        let _online = OnlineGuard(self.state.clone());
        tracing::info!(session = %self.session, "worker started");
        while !self.state.should_stop() {
            match self.queue.pop() {
                Some(job) => {
                    self.process(job).await;
                }
                None => tokio::time::sleep(self.config.idle_poll).await,
            }
        }
        tracing::info!("worker stopped");
    }

    /// Drive one job to a terminal state. Never fails; errors become `Failed`.
    pub async fn process(self: &Arc<Self>, job: Job) -> JobState {
        let id = job.id;
        let workspace = Workspace::new(&self.config.workspace_root, &self.session, id);
        let scratch = Workspace::new(&self.config.art_dir, &self.session, id);

        self.state.start_job(id, &job.prompt);
        let running = JobPatch::state(JobState::Running).workspace_path(format!("{}/{}", self.session, id));
        if let Err(e) = self.queue.patch(id, running) {
            tracing::warn!(job_id = %id, error = %e, "failed to mark job running");
        }
        tracing::info!(job_id = %id, session = %self.session, "job started");
        self.log(id, "start", &job.prompt);

        let task = tokio::spawn({
            let worker = Arc::clone(self);
            let workspace = workspace.clone();
            let scratch = scratch.clone();
            async move { worker.execute(job, &workspace, &scratch).await }
        });
        let outcome = match task.await {
            Ok(result) => result,
            Err(e) => Err(EngineError::Task(e.to_string())),
        };

        let terminal = match outcome {
            Ok(summary) => {
                tracing::info!(job_id = %id, "job completed");
                self.log(id, "done", &summary);
                self.set_terminal(id, JobPatch::state(JobState::Completed).summary(summary));
                JobState::Completed
            }
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "job failed");
                self.log(id, "failed", &e.to_string());
                self.set_terminal(id, JobPatch::state(JobState::Failed).error(e.to_string()));
                JobState::Failed
            }
        };

        self.state.finish_job();
        workspace.prune().await;
        scratch.prune().await;
        terminal
    }

    fn set_terminal(&self, id: JobId, patch: JobPatch) {
        if let Err(e) = self.queue.patch(id, patch) {
            tracing::warn!(job_id = %id, error = %e, "failed to record job outcome");
        }
    }

    async fn execute(&self, job: Job, workspace: &Workspace, scratch: &Workspace) -> Result<String, EngineError> {
        workspace.prepare(&job.blocks).await?;
        self.log(job.id, "workspace", &format!("prepared {}", workspace.path().display()));

        let (cover, banner, report) = tokio::join!(
            generate_art(&self.image, self.storage.as_ref(), scratch.path(), ArtKind::Cover, &self.session, job.id, &job.prompt),
            generate_art(&self.image, self.storage.as_ref(), scratch.path(), ArtKind::Banner, &self.session, job.id, &job.prompt),
            self.run_agent(&job, workspace),
        );

        let report = report.ok_or(EngineError::NoReport)?;
        self.finalize(&job, workspace, report, cover, banner).await
    }

    /// Run the agent with its update forwarder. `None` when no usable
    /// outcome was produced.
    async fn run_agent(&self, job: &Job, workspace: &Workspace) -> Option<JobReport> {
        let tools = JobTools::new(workspace.path(), self.image.clone(), self.validator.clone());
        let ctx = AgentContext {
            workspace: workspace.path().to_path_buf(),
            prompt: prompts::agent_prompt(&job.prompt),
            tools: Arc::new(tools),
        };
        let (tx, mut rx) = mpsc::channel::<AgentUpdate>(UPDATE_BUFFER);

        let agent = async {
            let run = self.agent.run(ctx, tx);
            match self.config.agent_timeout {
                Some(limit) => match tokio::time::timeout(limit, run).await {
                    Ok(result) => Some(result),
                    Err(_) => {
                        tracing::warn!(job_id = %job.id, timeout_ms = limit.as_millis() as u64, "agent timed out");
                        None
                    }
                },
                None => Some(run.await),
            }
        };
        let forward = async {
            while let Some(update) = rx.recv().await {
                tracing::debug!(job_id = %job.id, kind = %update.kind, "agent update");
                self.state.add_message(&update.kind, &update.content);
                self.log(job.id, &update.kind, &update.content);
            }
        };
        let (result, ()) = tokio::join!(agent, forward);

        match result? {
            Ok(Some(value)) => match JobReport::from_structured(&value) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!(job_id = %job.id, error = %e, "malformed completion report");
                    Some(JobReport::degraded(&job.prompt))
                }
            },
            Ok(None) => {
                tracing::warn!(job_id = %job.id, "agent ended without a report");
                None
            }
            Err(e) => {
                tracing::warn!(job_id = %job.id, error = %e, "agent failed");
                self.log(job.id, "agent", &format!("error: {e}"));
                None
            }
        }
    }

    async fn finalize(
        &self,
        job: &Job,
        workspace: &Workspace,
        report: JobReport,
        cover: Option<String>,
        banner: Option<String>,
    ) -> Result<String, EngineError> {
        let prefix = ObjectPath::job(Category::Projects, &self.session, job.id);
        let uploaded = self.storage.sync_dir(workspace.path(), prefix.as_str()).await?;
        self.log(job.id, "finalize", &format!("uploaded {} files to {prefix}", uploaded.len()));

        if let Ok(text) = serde_json::to_string_pretty(&report) {
            self.logger.append_fenced(job.id, self.state.clock().utc_now(), "report", "json", &text);
        }

        let entry = ManifestEntry {
            id: job.id.to_string(),
            timestamp: Some(self.session.to_string()),
            path_to_index_html: self.storage.url(prefix.join(report.entry_file()).as_str()),
            path_to_banner_art: banner,
            path_to_cover_art: cover,
            metadata: GameMetadata {
                name: report.name.clone(),
                summary: report.summary.clone(),
                base_game: job.blocks.iter().map(|b| b.folder_name.as_str()).collect::<Vec<_>>().join(", "),
                genre: report.genre_tags(),
                prompt: job.prompt.clone(),
            },
            job_report: Some(report.clone()),
        };
        self.manifest.append(entry).await?;
        Ok(report.summary)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
