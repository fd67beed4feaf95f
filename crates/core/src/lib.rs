// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! forge-core: shared data model for the forge job pipeline

pub mod macros;

pub mod block;
pub mod clock;
pub mod job;
pub mod manifest;
pub mod message;
pub mod path;
pub mod report;
pub mod session;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use block::{BlockFile, BuildingBlock, SeedBlock};
pub use clock::{Clock, FakeClock, SystemClock};
pub use job::{Job, JobId, JobPatch, JobState, ParseJobStateError};
pub use manifest::{GameMetadata, ManifestEntry};
pub use message::AgentMessage;
pub use path::{normalize_relative, Category, ObjectPath, ParsedPath};
pub use report::{JobReport, ReportValidationError, DEFAULT_ENTRY_POINT, NO_SUMMARY};
pub use session::SessionTimestamp;
pub use time_fmt::format_elapsed;
