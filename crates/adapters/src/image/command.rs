// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{ImageAdapter, ImageError, ImageRequest};
use crate::subprocess::{run_with_timeout, IMAGE_COMMAND_TIMEOUT};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// Image generator backed by an external command.
///
/// The command receives the full prompt as its last argument and writes PNG
/// bytes to stdout. Empty stdout means no image.
#[derive(Debug, Clone)]
pub struct CommandImageAdapter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandImageAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), timeout: IMAGE_COMMAND_TIMEOUT }
    }

    forge_core::setters! {
        set {
            args: Vec<String>,
            timeout: Duration,
        }
    }
}

#[async_trait]
impl ImageAdapter for CommandImageAdapter {
    async fn render(&self, req: &ImageRequest) -> Result<Option<Vec<u8>>, ImageError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(req.full_prompt());
        tracing::debug!(program = %self.program, stem = %req.file_stem, "running image command");

        let output = run_with_timeout(cmd, self.timeout, "image command")
            .await
            .map_err(ImageError::Generation)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ImageError::Generation(format!(
                "image command exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Ok(None);
        }
        Ok(Some(output.stdout))
    }
}
