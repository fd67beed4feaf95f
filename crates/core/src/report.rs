// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion report produced by the agent at the end of a run.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Summary used when the agent's report cannot be read.
pub const NO_SUMMARY: &str = "no summary available";

/// Most genre tags kept from a report.
pub const MAX_GENRE_TAGS: usize = 2;

/// Entry file used when the report omits one.
pub const DEFAULT_ENTRY_POINT: &str = "index.html";

/// Structured report the agent returns when it finishes a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    /// Short name of the built deliverable
    pub name: String,
    /// Human-readable description of what was built
    pub summary: String,
    /// Path of the entry file, relative to the workspace root
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
    /// Optional genre tags chosen by the agent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre: Vec<String>,
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

#[derive(Debug, Error)]
pub enum ReportValidationError {
    #[error("report is not a JSON object")]
    NotAnObject,
    #[error("report is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("report field `{0}` is empty")]
    EmptyField(&'static str),
}

impl JobReport {
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            entry_point: entry_point.into(),
            genre: Vec::new(),
        }
    }

    pub fn with_genre(mut self, genre: Vec<String>) -> Self {
        self.genre = genre;
        self
    }

    /// Validate the agent's structured output against the report schema.
    pub fn from_structured(value: &Value) -> Result<Self, ReportValidationError> {
        if !value.is_object() {
            return Err(ReportValidationError::NotAnObject);
        }
        let report: JobReport = serde_json::from_value(value.clone())?;
        if report.name.trim().is_empty() {
            return Err(ReportValidationError::EmptyField("name"));
        }
        if report.summary.trim().is_empty() {
            return Err(ReportValidationError::EmptyField("summary"));
        }
        if report.entry_point.trim().is_empty() {
            return Err(ReportValidationError::EmptyField("entry_point"));
        }
        Ok(report)
    }

    /// Stand-in report for a job whose agent output failed validation.
    pub fn degraded(prompt: &str) -> Self {
        Self::new(name_from_prompt(prompt), NO_SUMMARY, DEFAULT_ENTRY_POINT)
    }

    /// Trimmed, de-duplicated genre tags, at most [`MAX_GENRE_TAGS`].
    pub fn genre_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.genre.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if tags.len() == MAX_GENRE_TAGS {
                break;
            }
            if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    /// Entry point as a path relative to the workspace root.
    pub fn entry_file(&self) -> &str {
        self.entry_point.trim_start_matches("./").trim_start_matches('/')
    }
}

/// First few words of a prompt, for naming a deliverable without a report.
pub fn name_from_prompt(prompt: &str) -> String {
    let words: Vec<&str> = prompt.split_whitespace().take(6).collect();
    if words.is_empty() {
        "untitled".to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
