// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tools an agent may call back into during a run.

use crate::image::{generate_into, ImageAdapter, ImageError, ImageRequest};
use crate::validate::{ValidateError, Validator};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Image generation tool name.
pub const GENERATE_IMAGE: &str = "generate_image";
/// Static validation tool name.
pub const VALIDATE: &str = "validate";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    Unknown(String),
    #[error("invalid input for {tool}: {message}")]
    InvalidInput { tool: &'static str, message: String },
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Validate(#[from] ValidateError),
}

/// Dispatches tool calls made by an agent.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn names(&self) -> Vec<&'static str>;

    async fn call(&self, name: &str, input: Value) -> Result<Value, ToolError>;
}

#[derive(Debug, Deserialize)]
struct ImageInput {
    file_name: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct ValidateInput {
    #[serde(default = "default_document")]
    path: String,
}

fn default_document() -> String {
    "index.html".to_string()
}

/// Tools bound to one job workspace.
///
/// Generated images land in `{workspace}/assets`; validation paths resolve
/// against the workspace root.
#[derive(Clone)]
pub struct JobTools<I, V> {
    workspace: PathBuf,
    image: I,
    validator: V,
}

impl<I: ImageAdapter, V: Validator> JobTools<I, V> {
    pub fn new(workspace: impl Into<PathBuf>, image: I, validator: V) -> Self {
        Self { workspace: workspace.into(), image, validator }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    async fn generate_image(&self, input: Value) -> Result<Value, ToolError> {
        let input: ImageInput = serde_json::from_value(input).map_err(|e| {
            ToolError::InvalidInput { tool: GENERATE_IMAGE, message: e.to_string() }
        })?;
        let stem = sanitize_stem(&input.file_name);
        let req = ImageRequest::new(stem, input.prompt);
        let saved = generate_into(&self.image, &self.workspace.join("assets"), &req).await?;
        Ok(saved.map(|name| Value::String(format!("./assets/{name}"))).unwrap_or(Value::Null))
    }

    async fn validate(&self, input: Value) -> Result<Value, ToolError> {
        let input: ValidateInput = serde_json::from_value(input)
            .map_err(|e| ToolError::InvalidInput { tool: VALIDATE, message: e.to_string() })?;
        let rel = Path::new(input.path.trim_start_matches("./"));
        if rel.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(ToolError::InvalidInput {
                tool: VALIDATE,
                message: format!("path escapes workspace: {}", input.path),
            });
        }
        let issues = self.validator.validate(&self.workspace.join(rel)).await?;
        Ok(Value::from(issues))
    }
}

#[async_trait]
impl<I: ImageAdapter, V: Validator> ToolHandler for JobTools<I, V> {
    fn names(&self) -> Vec<&'static str> {
        vec![GENERATE_IMAGE, VALIDATE]
    }

    async fn call(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        tracing::debug!(tool = name, workspace = %self.workspace.display(), "tool call");
        match name {
            GENERATE_IMAGE => self.generate_image(input).await,
            VALIDATE => self.validate(input).await,
            other => Err(ToolError::Unknown(other.to_string())),
        }
    }
}

/// Keep a file stem to `[A-Za-z0-9_-]`, dropping any extension.
fn sanitize_stem(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let base = base.split('.').next().unwrap_or(base);
    let stem: String =
        base.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' }).collect();
    if stem.is_empty() {
        "image".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
