// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use forge_adapters::{FakeAgentAdapter, FakeImageAdapter, FakeValidator};
use forge_core::{FakeClock, JobState};
use forge_storage::{LocalStorage, Manifest};
use tempfile::TempDir;

type TestEngine = Engine<FakeClock, FakeAgentAdapter, FakeImageAdapter, FakeValidator>;

fn engine() -> (TempDir, TestEngine, Storage) {
    let dir = tempfile::tempdir().unwrap();
    let resources = dir.path().join("resources");
    for seed in ["snake", "minesweeper", "breakout"] {
        std::fs::create_dir_all(resources.join(seed)).unwrap();
        std::fs::write(resources.join(seed).join("game.js"), format!("// {seed}")).unwrap();
    }
    let storage: Storage = Arc::new(LocalStorage::new(dir.path().join("store"), ""));
    let config = EngineConfig::with_state_dir(dir.path().join("state"))
        .resources_dir(resources)
        .idle_poll(Duration::from_millis(100));
    let adapters = Adapters {
        agent: FakeAgentAdapter::reporting("Game"),
        image: FakeImageAdapter::new(),
        validator: FakeValidator::new(),
    };
    let engine = Engine::new(FakeClock::new(), storage.clone(), adapters, config);
    (dir, engine, storage)
}

#[yare::parameterized(
    started         = { StartOutcome::Started.to_string(), "started" },
    already_running = { StartOutcome::AlreadyRunning.to_string(), "already_running" },
    stopping        = { StopOutcome::Stopping.to_string(), "stopping" },
    already_stopped = { StopOutcome::AlreadyStopped.to_string(), "already_stopped" },
)]
fn outcome_strings(actual: String, expected: &str) {
    assert_eq!(actual, expected);
}

#[tokio::test(start_paused = true)]
async fn second_start_is_already_running_and_keeps_stop_flag() {
    let (_dir, engine, _) = engine();
    assert_eq!(engine.start(), StartOutcome::Started);
    assert_eq!(engine.stop(), StopOutcome::Stopping);

    assert_eq!(engine.start(), StartOutcome::AlreadyRunning);
    assert!(engine.snapshot().stop_requested);

    assert!(engine.wait(Duration::from_secs(60)).await);
    assert!(!engine.snapshot().online);
    assert_eq!(engine.stop(), StopOutcome::AlreadyStopped);
}

#[tokio::test(start_paused = true)]
async fn restart_leaves_one_producer_and_one_worker() {
    let (_dir, engine, _) = engine();
    assert_eq!(engine.start(), StartOutcome::Started);
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.stop();
    while engine.snapshot().online {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(engine.start(), StartOutcome::Started);
    tokio::time::sleep(Duration::from_secs(40)).await;

    let alive = engine.loops.lock().iter().filter(|h| !h.is_finished()).count();
    assert_eq!(alive, 2);
    assert_eq!(engine.loops.lock().len(), 2);

    engine.stop();
    assert!(engine.wait(Duration::from_secs(60)).await);
}

#[tokio::test]
async fn stop_when_never_started() {
    let (_dir, engine, _) = engine();
    assert_eq!(engine.stop(), StopOutcome::AlreadyStopped);
    assert!(engine.wait(Duration::from_millis(10)).await);
}

#[tokio::test(start_paused = true)]
async fn produces_and_completes_seed_jobs() {
    let (_dir, engine, storage) = engine();
    engine.start();

    for _ in 0..600 {
        if engine.snapshot().completed_count >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    engine.stop();
    assert!(engine.wait(Duration::from_secs(60)).await);

    let jobs = engine.list_all();
    let completed: Vec<_> = jobs.iter().filter(|j| j.state == JobState::Completed).collect();
    assert!(completed.len() >= 2, "jobs: {jobs:?}");
    for job in &completed {
        assert!(job.prompt.starts_with("make me a "));
        assert_eq!(job.blocks.len(), 1);
    }
    let entries = Manifest::new(storage).load().await.unwrap();
    assert_eq!(entries.len(), completed.len());
}

#[tokio::test]
async fn registry_pass_throughs() {
    let (_dir, engine, _) = engine();
    let id = engine.create("make a maze", vec![]).unwrap();
    engine.create("b", vec![]).unwrap();
    engine.create("c", vec![]).unwrap();
    assert_eq!(engine.create("d", vec![]), Err(QueueError::QueueFull { max_size: 3 }));
    assert!(engine.status().is_full);

    let job = engine.patch(id, JobPatch::new().prompt("make a bigger maze")).unwrap();
    assert_eq!(job.prompt, "make a bigger maze");
    assert_eq!(engine.get(id).unwrap().prompt, "make a bigger maze");
    assert_eq!(engine.list().len(), 3);
    assert_eq!(engine.snapshot().queue.len(), 3);
    assert_eq!(engine.session().as_str(), "20251123_005659");
}
