// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session timestamps group the jobs produced by one process lifetime.

use crate::clock::Clock;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// strftime format of a session timestamp, e.g. `20251123_005659`.
pub const SESSION_FORMAT: &str = "%Y%m%d_%H%M%S";

static SESSION_TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d{8}_\d{6}").ok());

/// A `YYYYMMDD_HHMMSS` token used as a storage path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTimestamp(String);

impl SessionTimestamp {
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(SESSION_FORMAT).to_string())
    }

    pub fn now(clock: &impl Clock) -> Self {
        Self::from_datetime(clock.utc_now())
    }

    /// Accept `s` only if it is exactly one session token.
    pub fn parse(s: &str) -> Option<Self> {
        let token = Self::extract(s)?;
        (token.0.len() == s.len()).then_some(token)
    }

    /// Find the first session token anywhere in `s` (typically a storage path).
    pub fn extract(s: &str) -> Option<Self> {
        let re = SESSION_TOKEN.as_ref()?;
        re.find(s).map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionTimestamp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
