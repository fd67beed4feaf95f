// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::protocol::{AgentLine, ToolReply};
use super::{AgentAdapter, AgentContext, AgentError, AgentUpdate};
use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Bytes of agent stderr kept for error reporting.
const STDERR_TAIL: usize = 8 * 1024;

/// Agent backed by a subprocess speaking the JSON-lines protocol.
///
/// The prompt is passed as the last argument; the workspace is the working
/// directory. The process is killed if the run is dropped.
#[derive(Debug, Clone)]
pub struct CommandAgentAdapter {
    program: String,
    args: Vec<String>,
}

impl CommandAgentAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    forge_core::setters! {
        set {
            args: Vec<String>,
        }
    }
}

#[async_trait]
impl AgentAdapter for CommandAgentAdapter {
    async fn run(
        &self,
        ctx: AgentContext,
        updates: mpsc::Sender<AgentUpdate>,
    ) -> Result<Option<Value>, AgentError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&ctx.prompt)
            .current_dir(&ctx.workspace)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AgentError::SpawnFailed(format!("{}: {e}", self.program)))?;
        tracing::info!(program = %self.program, workspace = %ctx.workspace.display(), "agent started");

        let mut stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::SpawnFailed("agent stdout not captured".to_string()))?;
        let stderr = child.stderr.take().map(drain_stderr);
        let mut lines = BufReader::new(stdout).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match AgentLine::parse(&line) {
                AgentLine::Message { kind, content } => {
                    let _ = updates.send(AgentUpdate::new(kind, content)).await;
                }
                AgentLine::ToolCall { id, name, input } => {
                    let _ = updates.send(AgentUpdate::new("tool_call", line.clone())).await;
                    let reply = match ctx.tools.call(&name, input).await {
                        Ok(output) => ToolReply::ok(id, output),
                        Err(e) => {
                            tracing::warn!(tool = %name, error = %e, "agent tool call failed");
                            ToolReply::error(id, e.to_string())
                        }
                    };
                    if let Some(stdin) = stdin.as_mut() {
                        stdin.write_all(reply.to_line().as_bytes()).await?;
                        stdin.flush().await?;
                    }
                }
                AgentLine::Result { structured_output } => {
                    let _ = updates.send(AgentUpdate::new("result", line.clone())).await;
                    tracing::info!(program = %self.program, "agent produced structured output");
                    if let Some(task) = stderr {
                        task.abort();
                    }
                    return Ok(Some(structured_output));
                }
            }
        }

        drop(stdin);
        let status = child.wait().await?;
        if status.success() {
            return Ok(None);
        }
        let err = match stderr {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };
        Err(AgentError::Exited { status: status.to_string(), stderr: err.trim().to_string() })
    }
}

/// Read stderr as it arrives so a chatty agent never blocks on a full pipe.
/// Only the last [`STDERR_TAIL`] bytes are kept.
fn drain_stderr(mut stderr: ChildStderr) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut tail: Vec<u8> = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match stderr.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    tail.extend_from_slice(&buf[..n]);
                    if tail.len() > STDERR_TAIL {
                        tail.drain(..tail.len() - STDERR_TAIL);
                    }
                }
            }
        }
        String::from_utf8_lossy(&tail).into_owned()
    })
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
