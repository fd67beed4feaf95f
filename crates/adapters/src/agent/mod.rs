// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-generation agent adapter.
//!
//! An agent runs inside one job workspace, streams progress updates, may call
//! back into the tools it was handed, and finishes with at most one
//! structured report.

mod command;
mod protocol;

pub use command::CommandAgentAdapter;
pub use protocol::{AgentLine, ToolReply};

use crate::tools::ToolHandler;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to spawn agent: {0}")]
    SpawnFailed(String),
    #[error("agent io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("agent exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },
    #[error("agent failed: {0}")]
    Failed(String),
}

/// Progress update streamed while the agent runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentUpdate {
    pub kind: String,
    pub content: String,
}

impl AgentUpdate {
    pub fn new(kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self { kind: kind.into(), content: content.into() }
    }
}

/// Everything one agent run needs, passed explicitly per job.
#[derive(Clone)]
pub struct AgentContext {
    /// Job workspace, used as the agent's working directory
    pub workspace: PathBuf,
    /// Full prompt including authoring instructions
    pub prompt: String,
    /// Tools scoped to this workspace
    pub tools: Arc<dyn ToolHandler>,
}

/// Adapter for running a content-generation agent to completion.
#[async_trait]
pub trait AgentAdapter: Clone + Send + Sync + 'static {
    /// Run until the agent finishes. Updates go to `updates`; the return
    /// value is the agent's structured output, if it produced one.
    async fn run(
        &self,
        ctx: AgentContext,
        updates: mpsc::Sender<AgentUpdate>,
    ) -> Result<Option<Value>, AgentError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{AgentAdapter, AgentContext, AgentError, AgentUpdate};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// How a fake run ends.
    #[derive(Debug, Clone)]
    pub enum FakeOutcome {
        Report(Value),
        NoReport,
        Error(String),
        Panic,
    }

    /// Recorded agent invocation
    #[derive(Debug, Clone)]
    pub struct AgentCall {
        pub workspace: PathBuf,
        pub prompt: String,
    }

    struct FakeAgentState {
        calls: Vec<AgentCall>,
        delay: Duration,
        updates: Vec<AgentUpdate>,
        files: Vec<(String, String)>,
        tool_calls: Vec<(String, Value)>,
        tool_results: Vec<Result<Value, String>>,
        outcome: FakeOutcome,
    }

    /// Fake agent for testing. Optionally writes files into the workspace
    /// and calls tools before ending with the configured outcome.
    #[derive(Clone)]
    pub struct FakeAgentAdapter {
        inner: Arc<Mutex<FakeAgentState>>,
    }

    impl Default for FakeAgentAdapter {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeAgentState {
                    calls: Vec::new(),
                    delay: Duration::ZERO,
                    updates: Vec::new(),
                    files: Vec::new(),
                    tool_calls: Vec::new(),
                    tool_results: Vec::new(),
                    outcome: FakeOutcome::NoReport,
                })),
            }
        }
    }

    impl FakeAgentAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fake that writes `index.html` and reports success.
        pub fn reporting(name: &str) -> Self {
            Self::new()
                .writes("index.html", "<html><body>game</body></html>")
                .outcome(FakeOutcome::Report(serde_json::json!({
                    "name": name,
                    "summary": format!("{name} summary"),
                    "entry_point": "index.html",
                })))
        }

        pub fn delay(self, delay: Duration) -> Self {
            self.inner.lock().delay = delay;
            self
        }

        pub fn update(self, kind: &str, content: &str) -> Self {
            self.inner.lock().updates.push(AgentUpdate::new(kind, content));
            self
        }

        pub fn writes(self, rel: &str, contents: &str) -> Self {
            self.inner.lock().files.push((rel.to_string(), contents.to_string()));
            self
        }

        pub fn calls_tool(self, name: &str, input: Value) -> Self {
            self.inner.lock().tool_calls.push((name.to_string(), input));
            self
        }

        pub fn outcome(self, outcome: FakeOutcome) -> Self {
            self.inner.lock().outcome = outcome;
            self
        }

        pub fn calls(&self) -> Vec<AgentCall> {
            self.inner.lock().calls.clone()
        }

        /// Results of the tool calls made during runs, in order.
        pub fn tool_results(&self) -> Vec<Result<Value, String>> {
            self.inner.lock().tool_results.clone()
        }
    }

    #[async_trait]
    impl AgentAdapter for FakeAgentAdapter {
        async fn run(
            &self,
            ctx: AgentContext,
            updates: mpsc::Sender<AgentUpdate>,
        ) -> Result<Option<Value>, AgentError> {
            let (delay, msgs, files, tool_calls, outcome) = {
                let mut inner = self.inner.lock();
                inner.calls.push(AgentCall { workspace: ctx.workspace.clone(), prompt: ctx.prompt.clone() });
                (
                    inner.delay,
                    inner.updates.clone(),
                    inner.files.clone(),
                    inner.tool_calls.clone(),
                    inner.outcome.clone(),
                )
            };
            for update in msgs {
                let _ = updates.send(update).await;
            }
            for (rel, contents) in files {
                let path = ctx.workspace.join(rel);
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(path, contents).await?;
            }
            for (name, input) in tool_calls {
                let result = ctx.tools.call(&name, input).await.map_err(|e| e.to_string());
                self.inner.lock().tool_results.push(result);
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match outcome {
                FakeOutcome::Report(value) => Ok(Some(value)),
                FakeOutcome::NoReport => Ok(None),
                FakeOutcome::Error(msg) => Err(AgentError::Failed(msg)),
                #[allow(clippy::panic)]
                FakeOutcome::Panic => panic!("fake agent panic"),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{AgentCall, FakeAgentAdapter, FakeOutcome};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
