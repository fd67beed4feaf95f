// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only logger for per-job activity logs.

use chrono::{DateTime, Utc};
use forge_core::JobId;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LINE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Append-only logger for per-job activity logs.
///
/// Writes human-readable timestamped lines to:
///   `<log_dir>/job/<job_id>.log`
///
/// Each `append()` call opens, writes, and closes the file.
pub struct JobLogger {
    log_dir: PathBuf,
}

impl JobLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self { log_dir: log_dir.into() }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// `<log_dir>/job/<job_id>.log`
    pub fn path_for(&self, job_id: JobId) -> PathBuf {
        self.log_dir.join("job").join(format!("{job_id}.log"))
    }

    /// Append a log line for the given job.
    ///
    /// Format: `2026-01-30T08:14:09Z [step] message`
    ///
    /// Failures are logged via tracing and never propagate.
    pub fn append(&self, job_id: JobId, at: DateTime<Utc>, step: &str, message: &str) {
        let path = self.path_for(job_id);
        if let Err(e) = write_line(&path, at, step, message) {
            tracing::warn!(job_id = %job_id, error = %e, "failed to write job log");
        }
    }

    /// Append a fenced block, used for the completion report.
    ///
    /// ```text
    /// {timestamp} [{step}] ```{label}
    /// {content}
    /// {timestamp} [{step}] ```
    /// ```
    pub fn append_fenced(&self, job_id: JobId, at: DateTime<Utc>, step: &str, label: &str, content: &str) {
        let path = self.path_for(job_id);
        if let Err(e) = write_fenced(&path, at, step, label, content) {
            tracing::warn!(job_id = %job_id, error = %e, "failed to write job log");
        }
    }
}

fn open_append(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn write_line(path: &Path, at: DateTime<Utc>, step: &str, message: &str) -> std::io::Result<()> {
    let mut file = open_append(path)?;
    writeln!(file, "{} [{}] {}", at.format(LINE_TIME_FORMAT), step, message)
}

fn write_fenced(
    path: &Path,
    at: DateTime<Utc>,
    step: &str,
    label: &str,
    content: &str,
) -> std::io::Result<()> {
    let mut file = open_append(path)?;
    let ts = at.format(LINE_TIME_FORMAT);
    writeln!(file, "{ts} [{step}] ```{label}")?;
    write!(file, "{content}")?;
    if !content.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{ts} [{step}] ```")
}

#[cfg(test)]
#[path = "job_logger_tests.rs"]
mod tests;
