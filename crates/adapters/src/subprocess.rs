// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess helpers with bounded runtime.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Timeout for one image generation call.
pub const IMAGE_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Run `cmd` to completion, killing it if it outlives `timeout`.
///
/// `label` names the command in error messages.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, String> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(format!("{label} failed to run: {e}")),
        Err(_) => Err(format!("{label} timed out after {}s", timeout.as_secs())),
    }
}
