// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::image::FakeImageAdapter;
use crate::tools::JobTools;
use crate::validate::FakeValidator;
use std::sync::Arc;
use tempfile::TempDir;

fn context(dir: &TempDir) -> AgentContext {
    AgentContext {
        workspace: dir.path().to_path_buf(),
        prompt: "make me a snake game".to_string(),
        tools: Arc::new(JobTools::new(dir.path(), FakeImageAdapter::new(), FakeValidator::new())),
    }
}

fn script(body: &str) -> CommandAgentAdapter {
    CommandAgentAdapter::new("sh").args(vec!["-c".to_string(), body.to_string()])
}

async fn drain(mut rx: mpsc::Receiver<AgentUpdate>) -> Vec<AgentUpdate> {
    let mut out = Vec::new();
    while let Some(update) = rx.recv().await {
        out.push(update);
    }
    out
}

#[tokio::test]
async fn streams_messages_and_returns_report() {
    let dir = TempDir::new().unwrap();
    let (tx, rx) = mpsc::channel(16);
    let agent = script(
        r#"echo 'reading resources'
echo '{"type":"message","kind":"assistant","content":"writing game"}'
echo '{"type":"result","structured_output":{"name":"Snake","summary":"s","entry_point":"index.html"}}'"#,
    );

    let report = agent.run(context(&dir), tx).await.unwrap();

    assert_eq!(report.unwrap()["name"], "Snake");
    let updates = drain(rx).await;
    assert_eq!(updates[0], AgentUpdate::new("text", "reading resources"));
    assert_eq!(updates[1], AgentUpdate::new("assistant", "writing game"));
    assert_eq!(updates[2].kind, "result");
}

#[tokio::test]
async fn runs_in_workspace() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    script("echo hi > marker.txt").run(context(&dir), tx).await.unwrap();
    assert!(dir.path().join("marker.txt").exists());
}

#[tokio::test]
async fn clean_exit_without_result_is_none() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    assert!(script("echo done").run(context(&dir), tx).await.unwrap().is_none());
}

#[tokio::test]
async fn failing_exit_is_error() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    let err = script("echo broken >&2; exit 3").run(context(&dir), tx).await.unwrap_err();
    match err {
        AgentError::Exited { stderr, .. } => assert_eq!(stderr, "broken"),
        other => panic!("expected Exited, got {other:?}"),
    }
}

#[tokio::test]
async fn answers_tool_calls_on_stdin() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    let agent = script(
        r#"echo '{"type":"tool_call","id":"t1","name":"generate_image","input":{"file_name":"food","prompt":"apple"}}'
read reply
echo "$reply" > reply.json"#,
    );

    agent.run(context(&dir), tx).await.unwrap();

    let reply: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("reply.json")).unwrap()).unwrap();
    assert_eq!(reply["id"], "t1");
    assert_eq!(reply["ok"], true);
    assert_eq!(reply["output"], "./assets/food_0.png");
    assert!(dir.path().join("assets/food_0.png").exists());
}

#[tokio::test]
async fn missing_program_fails_to_spawn() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    let err = CommandAgentAdapter::new("forge-no-such-agent").run(context(&dir), tx).await.unwrap_err();
    assert!(matches!(err, AgentError::SpawnFailed(_)));
}

#[tokio::test]
async fn heavy_stderr_does_not_block_the_run() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    let agent = script(
        r#"head -c 300000 /dev/zero | tr '\0' 'x' >&2
echo '{"type":"result","structured_output":{"name":"Snake","summary":"s","entry_point":"index.html"}}'"#,
    );

    let report = tokio::time::timeout(std::time::Duration::from_secs(10), agent.run(context(&dir), tx))
        .await
        .expect("agent run blocked on stderr")
        .unwrap();

    assert_eq!(report.unwrap()["name"], "Snake");
}

#[tokio::test]
async fn failing_exit_keeps_stderr_tail() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    let err = script("head -c 100000 /dev/zero | tr '\\0' 'x' >&2; echo last-words >&2; exit 1")
        .run(context(&dir), tx)
        .await
        .unwrap_err();
    match err {
        AgentError::Exited { stderr, .. } => {
            assert!(stderr.ends_with("last-words"));
            assert!(stderr.len() <= STDERR_TAIL);
        }
        other => panic!("expected Exited, got {other:?}"),
    }
}
