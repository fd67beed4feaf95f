// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage path scheme: `{category}/{session}/{job_id}/{...}`.
//!
//! The path is the only index over stored artifacts. Discovery works by
//! constructing the expected path or by listing a prefix.

use crate::job::JobId;
use crate::session::SessionTimestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level storage namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Workspace trees (deliverables) and the manifest
    Projects,
    /// Cover and banner art
    CartridgeArts,
    /// Shared assets
    Assets,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Projects, Category::CartridgeArts, Category::Assets];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Projects => "projects",
            Category::CartridgeArts => "cartridge_arts",
            Category::Assets => "assets",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

crate::simple_display! {
    Category {
        Projects => "projects",
        CartridgeArts => "cartridge_arts",
        Assets => "assets",
    }
}

/// Relative storage path rooted at a job's prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// `{category}/{session}/{job_id}`
    pub fn job(category: Category, session: &SessionTimestamp, id: JobId) -> Self {
        Self(format!("{}/{}/{}", category.as_str(), session, id))
    }

    /// Append a relative path, normalizing separators and stray `./`.
    pub fn join(&self, rel: &str) -> Self {
        let rel = normalize_relative(rel);
        if rel.is_empty() {
            self.clone()
        } else {
            Self(format!("{}/{}", self.0, rel))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Split a stored path back into its components.
    ///
    /// Returns `None` unless the path has a known category, a valid session
    /// token and a numeric job id.
    pub fn parse(path: &str) -> Option<ParsedPath<'_>> {
        let mut parts = path.trim_start_matches('/').splitn(4, '/');
        let category = Category::parse(parts.next()?)?;
        let session = SessionTimestamp::parse(parts.next()?)?;
        let job_id = JobId::new(parts.next()?.parse().ok()?);
        let rest = parts.next().unwrap_or("");
        Some(ParsedPath { category, session, job_id, rest })
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Components of a parsed storage path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath<'a> {
    pub category: Category,
    pub session: SessionTimestamp,
    pub job_id: JobId,
    pub rest: &'a str,
}

/// Strip leading `./` and `/`, and convert backslashes to `/`.
pub fn normalize_relative(rel: &str) -> String {
    let mut rel = rel.replace('\\', "/");
    loop {
        if let Some(stripped) = rel.strip_prefix("./") {
            rel = stripped.to_string();
        } else if let Some(stripped) = rel.strip_prefix('/') {
            rel = stripped.to_string();
        } else {
            break;
        }
    }
    rel
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
