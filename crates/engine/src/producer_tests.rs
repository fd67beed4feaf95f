// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use forge_core::test_support::inline_block;
use forge_core::{FakeClock, JobPatch, JobState};
use std::path::Path;
use tokio::time::Instant;

fn status(size: usize, max_size: usize) -> QueueStatus {
    QueueStatus { size, max_size, is_full: size >= max_size }
}

fn proposer() -> Proposer {
    Proposer::with_rng("resources", StdRng::seed_from_u64(7))
}

#[yare::parameterized(
    empty        = { 0, 3, Backpressure::Proceed },
    one_third    = { 1, 3, Backpressure::Proceed },
    two_thirds   = { 2, 3, Backpressure::Delay(Duration::from_secs(2)) },
    half         = { 2, 4, Backpressure::Delay(Duration::from_secs(2)) },
    eighty       = { 4, 5, Backpressure::Delay(Duration::from_secs(10)) },
    full         = { 3, 3, Backpressure::Skip(Duration::from_secs(30)) },
)]
fn backpressure_boundaries(size: usize, max_size: usize, expected: Backpressure) {
    assert_eq!(Backpressure::for_fill(status(size, max_size), &BackpressureDelays::default()), expected);
}

#[test]
fn seeds_until_more_than_three_completed() {
    let p = proposer();
    let completed: Vec<Job> = (1..=3).map(|i| forge_core::test_support::test_job(i, "done")).collect();

    for _ in 0..20 {
        let proposal = p.propose(&completed);
        assert!(proposal.prompt.starts_with("make me a "));
        assert!(proposal.prompt.ends_with(" game using phaser.js"));
        assert_eq!(proposal.blocks.len(), 1);
        let source = proposal.blocks[0].source().unwrap();
        assert!(source.starts_with(Path::new("resources")));
    }
}

#[test]
fn seed_draws_cover_exactly_the_seed_ideas() {
    let p = proposer();
    let drawn: std::collections::BTreeSet<String> =
        (0..200).map(|_| p.propose(&[]).blocks[0].folder_name.clone()).collect();
    let expected: std::collections::BTreeSet<String> =
        SEED_IDEAS.iter().map(|seed| seed.name().to_string()).collect();
    assert_eq!(drawn, expected);
}

#[test]
fn hybrid_after_threshold_unions_blocks() {
    let p = proposer();
    let completed: Vec<Job> = (1..=4)
        .map(|i| {
            let mut job = forge_core::test_support::test_job(i, &format!("prompt {i}"));
            job.blocks = vec![inline_block(&format!("block{i}"))];
            job
        })
        .collect();

    let proposal = p.propose(&completed);
    assert!(proposal.prompt.starts_with("Combine the following two prompts"));
    assert_eq!(proposal.blocks.len(), 2);
    for block in &proposal.blocks {
        assert!(proposal.prompt.contains(&format!("prompt {}", &block.folder_name[5..])));
    }
}

fn queue_with(size: usize, max_size: usize) -> JobQueue<FakeClock> {
    let q = JobQueue::new(max_size, FakeClock::new());
    for i in 0..size {
        q.create(format!("p{i}"), vec![]).unwrap();
    }
    q
}

#[tokio::test(start_paused = true)]
async fn empty_queue_proposes_immediately() {
    let q = queue_with(0, 3);
    let start = Instant::now();

    let outcome = tick(&q, &proposer(), &BackpressureDelays::default()).await;

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(matches!(outcome, Tick::Submitted(_)));
    assert_eq!(q.status().size, 1);
}

#[tokio::test(start_paused = true)]
async fn two_thirds_full_sleeps_two_seconds_then_proposes() {
    let q = queue_with(2, 3);
    let start = Instant::now();

    let outcome = tick(&q, &proposer(), &BackpressureDelays::default()).await;

    assert_eq!(start.elapsed(), Duration::from_secs(2));
    assert_eq!(outcome, Tick::Submitted(forge_core::JobId::new(3)));
}

#[tokio::test(start_paused = true)]
async fn full_queue_sleeps_thirty_seconds_without_proposing() {
    let q = queue_with(3, 3);
    let start = Instant::now();

    let outcome = tick(&q, &proposer(), &BackpressureDelays::default()).await;

    assert_eq!(start.elapsed(), Duration::from_secs(30));
    assert_eq!(outcome, Tick::Skipped);
    assert_eq!(q.list_all().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn hybrid_drawn_from_completed_registry() {
    let q = queue_with(0, 10);
    for i in 0..4 {
        let id = q.create(format!("done {i}"), vec![inline_block("snake")]).unwrap();
        q.pop();
        q.patch(id, JobPatch::state(JobState::Completed)).unwrap();
    }

    let outcome = tick(&q, &proposer(), &BackpressureDelays::default()).await;

    let Tick::Submitted(id) = outcome else { panic!("expected submission, got {outcome:?}") };
    let job = q.get(id).unwrap();
    assert!(job.prompt.contains("{ done "));
    assert_eq!(job.blocks.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn run_producer_exits_on_stop_flag() {
    let clock = FakeClock::new();
    let q = Arc::new(JobQueue::new(3, clock.clone()));
    let state = Arc::new(ProcessState::new(clock));
    state.set_online(true);

    let handle = tokio::spawn(run_producer(q.clone(), state.clone(), proposer(), BackpressureDelays::default()));
    // Fill to capacity, then the loop backs off in 30s sleeps
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(q.status().size, 3);

    state.request_stop();
    tokio::time::timeout(Duration::from_secs(31), handle).await.unwrap().unwrap();
    assert_eq!(q.list_all().len(), 3);
}
