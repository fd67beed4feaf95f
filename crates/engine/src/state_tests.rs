// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use forge_core::{FakeClock, JobPatch, JobState};

fn setup() -> (FakeClock, ProcessState<FakeClock>, JobQueue<FakeClock>) {
    let clock = FakeClock::new();
    (clock.clone(), ProcessState::new(clock.clone()), JobQueue::new(3, clock))
}

#[test]
fn online_again_is_unchanged_and_keeps_stop_flag() {
    let (_, state, _) = setup();
    assert_eq!(state.set_online(true), OnlineChange::Changed);
    state.request_stop();

    assert_eq!(state.set_online(true), OnlineChange::Unchanged);
    assert!(state.should_stop());
}

#[test]
fn going_online_clears_stop_flag() {
    let (_, state, _) = setup();
    state.request_stop();
    assert_eq!(state.set_online(true), OnlineChange::Changed);
    assert!(!state.should_stop());
    assert!(state.is_online());
}

#[test]
fn offline_twice_is_unchanged() {
    let (_, state, _) = setup();
    assert_eq!(state.set_online(false), OnlineChange::Unchanged);
    state.set_online(true);
    assert_eq!(state.set_online(false), OnlineChange::Changed);
    assert!(!state.is_online());
}

#[test]
fn start_job_resets_interaction_log() {
    let (_, state, queue) = setup();
    state.start_job(JobId::new(1), "first");
    state.add_message("text", "hello");
    state.add_message("tool_use", "generate_image");
    assert_eq!(state.snapshot(&queue).message_count, 2);

    state.finish_job();
    state.start_job(JobId::new(2), "second");

    let snap = state.snapshot(&queue);
    assert_eq!(snap.message_count, 0);
    assert_eq!(snap.current_job.map(|c| c.id), Some(JobId::new(2)));
}

#[test]
fn snapshot_reports_elapsed_for_running_job() {
    let (clock, state, queue) = setup();
    state.start_job(JobId::new(4), "make me a snake game using phaser.js");
    clock.advance(Duration::from_secs(192));

    let snap = state.snapshot(&queue);
    assert!(snap.running);
    let current = snap.current_job.unwrap();
    assert_eq!(current.elapsed_secs, 192);
    assert_eq!(current.elapsed, "3m12s");
    assert_eq!(current.prompt, "make me a snake game using phaser.js");
}

#[test]
fn finished_job_stays_visible_but_not_running() {
    let (_, state, queue) = setup();
    state.start_job(JobId::new(1), "p");
    state.add_message("text", "done");
    state.finish_job();

    let snap = state.snapshot(&queue);
    assert!(!snap.running);
    assert_eq!(snap.messages[0].content, "done");
    assert_eq!(snap.current_job.unwrap().elapsed_secs, 0);
}

#[test]
fn snapshot_includes_queue_and_completed_count() {
    let (_, state, queue) = setup();
    let done = queue.create("a", vec![]).unwrap();
    queue.pop();
    queue.patch(done, JobPatch::state(JobState::Completed)).unwrap();
    queue.create("b", vec![]).unwrap();

    let snap = state.snapshot(&queue);
    assert_eq!(snap.completed_count, 1);
    assert_eq!(snap.queue.len(), 1);
    assert_eq!(snap.queue[0].prompt, "b");
}
