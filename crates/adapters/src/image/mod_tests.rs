// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn full_prompt_carries_background() {
    let req = ImageRequest::new("hero", "a knight");
    assert_eq!(
        req.full_prompt(),
        "When generating images, the background color MUST be #ffffff. a knight"
    );
}

#[tokio::test]
async fn generate_into_numbers_files() {
    let dir = TempDir::new().unwrap();
    let adapter = FakeImageAdapter::new();
    let req = ImageRequest::new("hero", "a knight");

    let first = generate_into(&adapter, dir.path(), &req).await.unwrap();
    let second = generate_into(&adapter, dir.path(), &req).await.unwrap();

    assert_eq!(first.as_deref(), Some("hero_0.png"));
    assert_eq!(second.as_deref(), Some("hero_1.png"));
    assert!(dir.path().join("hero_1.png").exists());
    assert_eq!(adapter.requests().len(), 2);
}

#[tokio::test]
async fn generated_png_has_transparent_background() {
    let dir = TempDir::new().unwrap();
    let adapter = FakeImageAdapter::new();
    generate_into(&adapter, dir.path(), &ImageRequest::new("tile", "grass")).await.unwrap();

    let img = image::open(dir.path().join("tile_0.png")).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0)[3], 0);
    assert_eq!(img.get_pixel(2, 2)[3], 255);
}

#[tokio::test]
async fn no_image_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let adapter = FakeImageAdapter::new().empty("tile");
    let saved = generate_into(&adapter, dir.path(), &ImageRequest::new("tile", "grass")).await.unwrap();
    assert!(saved.is_none());
    assert!(!dir.path().join("tile_0.png").exists());
}

#[tokio::test]
async fn failure_propagates() {
    let dir = TempDir::new().unwrap();
    let adapter = FakeImageAdapter::new().failing("tile");
    let err = generate_into(&adapter, dir.path(), &ImageRequest::new("tile", "grass")).await.unwrap_err();
    assert!(matches!(err, ImageError::Generation(_)));
}

#[tokio::test]
async fn command_adapter_reads_stdout() {
    let adapter = CommandImageAdapter::new("sh").args(vec!["-c".into(), "printf PNG; true".into()]);
    let bytes = adapter.render(&ImageRequest::new("x", "y")).await.unwrap();
    assert_eq!(bytes.as_deref(), Some(&b"PNG"[..]));
}

#[tokio::test]
async fn command_adapter_empty_stdout_is_none() {
    let adapter = CommandImageAdapter::new("true");
    assert!(adapter.render(&ImageRequest::new("x", "y")).await.unwrap().is_none());
}

#[tokio::test]
async fn command_adapter_nonzero_exit_fails() {
    let adapter = CommandImageAdapter::new("false");
    let err = adapter.render(&ImageRequest::new("x", "y")).await.unwrap_err();
    assert!(matches!(err, ImageError::Generation(_)));
}

#[tokio::test]
async fn noop_adapter_never_renders() {
    let dir = TempDir::new().unwrap();
    let saved = generate_into(&NoopImageAdapter, dir.path(), &ImageRequest::new("cover_art", "x")).await.unwrap();
    assert!(saved.is_none());
}
