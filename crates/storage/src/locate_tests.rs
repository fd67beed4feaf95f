// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::LocalStorage;
use tempfile::TempDir;

fn session(s: &str) -> SessionTimestamp {
    SessionTimestamp::parse(s).unwrap()
}

fn storage() -> (TempDir, LocalStorage) {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(dir.path(), "");
    (dir, storage)
}

#[tokio::test]
async fn entry_point_prefers_root_index() {
    let (_dir, storage) = storage();
    storage.save_text("projects/20251123_005659/1/index.html", "x").await.unwrap();
    storage.save_text("projects/20251123_005659/1/game/index.html", "x").await.unwrap();

    let url = entry_point(&storage, &session("20251123_005659"), JobId::new(1)).await.unwrap();
    assert_eq!(url.as_deref(), Some("/projects/20251123_005659/1/index.html"));
}

#[tokio::test]
async fn entry_point_falls_back_to_nested_index() {
    let (_dir, storage) = storage();
    storage.save_text("projects/20251123_005659/2/dist/index.html", "x").await.unwrap();

    let url = entry_point(&storage, &session("20251123_005659"), JobId::new(2)).await.unwrap();
    assert_eq!(url.as_deref(), Some("/projects/20251123_005659/2/dist/index.html"));
}

#[tokio::test]
async fn entry_point_missing() {
    let (_dir, storage) = storage();
    storage.save_text("projects/20251123_005659/3/main.js", "x").await.unwrap();
    let url = entry_point(&storage, &session("20251123_005659"), JobId::new(3)).await.unwrap();
    assert!(url.is_none());
}

#[tokio::test]
async fn asset_url_by_kind() {
    let (_dir, storage) = storage();
    let s = session("20251123_005659");
    storage.save_binary("cartridge_arts/20251123_005659/4/cover_art.png", vec![0]).await.unwrap();
    storage.save_binary("projects/20251123_005659/4/assets/hero_0.png", vec![0]).await.unwrap();

    assert_eq!(
        asset_url(&storage, AssetKind::CartridgeArt, &s, JobId::new(4), "cover_art.png").await.unwrap().as_deref(),
        Some("/cartridge_arts/20251123_005659/4/cover_art.png")
    );
    assert_eq!(
        asset_url(&storage, AssetKind::ProjectAsset, &s, JobId::new(4), "hero_0.png").await.unwrap().as_deref(),
        Some("/projects/20251123_005659/4/assets/hero_0.png")
    );
    assert!(asset_url(&storage, AssetKind::CartridgeArt, &s, JobId::new(4), "banner_art.png")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn list_sessions_newest_first() {
    let (_dir, storage) = storage();
    storage.save_text("projects/20240101_120000/1/index.html", "x").await.unwrap();
    storage.save_text("projects/20251123_005659/3/index.html", "x").await.unwrap();
    storage.save_text("projects/20251123_005659/2/index.html", "x").await.unwrap();
    storage.save_text("projects/20251123_005659/2/assets/a.png", "x").await.unwrap();
    storage.save_text("projects/manifest.json", "[]").await.unwrap();
    storage.save_text("projects/scratch/9/index.html", "x").await.unwrap();

    let sessions = list_sessions(&storage).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].timestamp, "20251123_005659");
    assert_eq!(sessions[0].games, vec!["2", "3"]);
    assert_eq!(sessions[0].name, "Game Pack #2 (2 games)");
    assert_eq!(sessions[1].timestamp, "20240101_120000");
    assert_eq!(sessions[1].name, "Game Pack #1 (1 games)");
}
