// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-lines protocol spoken with an agent subprocess.
//!
//! Agent → forge (stdout), one JSON object per line:
//!
//! ```text
//! {"type":"message","kind":"assistant","content":"reading resources"}
//! {"type":"tool_call","id":"t1","name":"generate_image","input":{...}}
//! {"type":"result","structured_output":{"name":...,"summary":...}}
//! ```
//!
//! forge → agent (stdin), answering tool calls:
//!
//! ```text
//! {"type":"tool_result","id":"t1","ok":true,"output":"./assets/hero_0.png"}
//! ```
//!
//! Any other stdout line is kept as a progress message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One parsed stdout line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentLine {
    Message {
        #[serde(default = "default_kind")]
        kind: String,
        content: String,
    },
    ToolCall {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    Result {
        structured_output: Value,
    },
}

fn default_kind() -> String {
    "text".to_string()
}

impl AgentLine {
    /// Parse a stdout line. Lines outside the protocol become messages whose
    /// kind is their JSON `type` (or `text` for non-JSON).
    pub fn parse(line: &str) -> AgentLine {
        if let Ok(parsed) = serde_json::from_str::<AgentLine>(line) {
            return parsed;
        }
        let kind = serde_json::from_str::<Value>(line)
            .ok()
            .and_then(|v| v.get("type").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(default_kind);
        AgentLine::Message { kind, content: line.to_string() }
    }
}

/// Answer to a tool call, written to the agent's stdin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolReply {
    #[serde(rename = "type")]
    kind: &'static str,
    pub id: String,
    pub ok: bool,
    pub output: Value,
}

impl ToolReply {
    pub fn ok(id: impl Into<String>, output: Value) -> Self {
        Self { kind: "tool_result", id: id.into(), ok: true, output }
    }

    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: "tool_result", id: id.into(), ok: false, output: Value::String(message.into()) }
    }

    /// Serialized form, newline-terminated.
    pub fn to_line(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_default();
        line.push('\n');
        line
    }
}
