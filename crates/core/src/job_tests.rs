// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::*;
use crate::FakeClock;
use crate::{BlockFile, Clock};
use proptest::prelude::*;

#[test]
fn job_id_display() {
    assert_eq!(JobId::new(42).to_string(), "42");
}

#[test]
fn job_id_next_is_strictly_greater() {
    let id = JobId::new(1);
    assert_eq!(id.next(), JobId::new(2));
    assert!(id.next() > id);
}

#[test]
fn job_id_serde() {
    let id = JobId::new(7);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "7");

    let parsed: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[yare::parameterized(
    not_started = { JobState::NotStarted, "NotStarted", false },
    running     = { JobState::Running,    "Running",    false },
    completed   = { JobState::Completed,  "Completed",  true },
    failed      = { JobState::Failed,     "Failed",     true },
)]
fn job_state_display_and_terminal(state: JobState, display: &str, terminal: bool) {
    assert_eq!(state.to_string(), display);
    assert_eq!(state.is_terminal(), terminal);
    assert_eq!(display.parse::<JobState>().unwrap(), state);
}

#[test]
fn job_state_parse_rejects_unknown() {
    let err = "Paused".parse::<JobState>().unwrap_err();
    assert_eq!(err, ParseJobStateError("Paused".to_string()));
}

#[test]
fn job_state_serializes_as_variant_name() {
    assert_eq!(serde_json::to_string(&JobState::NotStarted).unwrap(), "\"NotStarted\"");
}

fn test_job() -> Job {
    let clock = FakeClock::new();
    Job::new(
        JobId::new(1),
        "make me a snake game using phaser.js",
        vec![BuildingBlock::inline("snake", vec![BlockFile::new("main.js", "// snake")])],
        clock.utc_now(),
    )
}

#[test]
fn new_job_starts_not_started() {
    let job = test_job();
    assert_eq!(job.state, JobState::NotStarted);
    assert!(job.workspace_path.is_none());
    assert!(job.summary.is_none());
    assert!(job.error.is_none());
    assert!(!job.is_terminal());
}

#[test]
fn apply_replaces_only_present_fields() {
    let mut job = test_job();
    job.apply(JobPatch::new().prompt("make me a breakout game"));

    assert_eq!(job.prompt, "make me a breakout game");
    assert_eq!(job.blocks.len(), 1);
    assert_eq!(job.state, JobState::NotStarted);
}

#[test]
fn apply_state_and_worker_fields() {
    let mut job = test_job();
    job.apply(
        JobPatch::state(JobState::Completed)
            .workspace_path("20251123_005659/1")
            .summary("a snake game"),
    );

    assert_eq!(job.state, JobState::Completed);
    assert_eq!(job.workspace_path.as_deref(), Some("20251123_005659/1"));
    assert_eq!(job.summary.as_deref(), Some("a snake game"));
    assert!(job.is_terminal());
}

#[test]
fn empty_patch_is_noop() {
    let mut job = test_job();
    let before = job.clone();
    let patch = JobPatch::new();
    assert!(patch.is_empty());
    job.apply(patch);
    assert_eq!(job, before);
}

#[test]
fn patch_deserialization_ignores_worker_fields() {
    let patch: JobPatch =
        serde_json::from_str(r#"{"state":"Failed","summary":"nope","error":"x"}"#).unwrap();
    assert_eq!(patch.state, Some(JobState::Failed));
    assert!(patch.summary.is_none());
    assert!(patch.error.is_none());
}

#[test]
fn job_serde_omits_unset_optionals() {
    let json = serde_json::to_value(test_job()).unwrap();
    assert!(json.get("summary").is_none());
    assert!(json.get("error").is_none());
    assert_eq!(json["state"], "NotStarted");
}

proptest! {
    #[test]
    fn apply_state_patch_sets_state(initial in arb_job_state(), target in arb_job_state()) {
        let mut job = test_job();
        job.state = initial;
        job.apply(JobPatch::state(target));
        prop_assert_eq!(job.state, target);
    }
}
