// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image generation capability.

mod command;
mod transparency;

pub use command::CommandImageAdapter;
pub use transparency::{make_white_transparent, WHITE_THRESHOLD};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Background every generated image is requested with. Near-white pixels
/// are made transparent afterwards.
pub const WHITE_BACKGROUND: &str = "#ffffff";

/// Errors from image generation
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image generation failed: {0}")]
    Generation(String),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One image to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// File name stem; the saved file is `{file_stem}_{n}.png`
    pub file_stem: String,
    pub prompt: String,
    pub background: String,
}

impl ImageRequest {
    pub fn new(file_stem: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            file_stem: file_stem.into(),
            prompt: prompt.into(),
            background: WHITE_BACKGROUND.to_string(),
        }
    }

    /// Prompt text as sent to the generator.
    pub fn full_prompt(&self) -> String {
        format!(
            "When generating images, the background color MUST be {}. {}",
            self.background, self.prompt
        )
    }
}

/// Adapter for an image generator.
#[async_trait]
pub trait ImageAdapter: Clone + Send + Sync + 'static {
    /// Render PNG bytes for the request. `None` when the generator returned
    /// no image.
    async fn render(&self, req: &ImageRequest) -> Result<Option<Vec<u8>>, ImageError>;
}

/// Image adapter used when no generator is configured. Never produces an
/// image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImageAdapter;

#[async_trait]
impl ImageAdapter for NoopImageAdapter {
    async fn render(&self, req: &ImageRequest) -> Result<Option<Vec<u8>>, ImageError> {
        tracing::debug!(stem = %req.file_stem, "image generation disabled");
        Ok(None)
    }
}

/// Render an image, clear its white background, and save it into `dir` as
/// `{stem}_{n}.png` with the first free `n`.
///
/// Returns the saved file name.
pub async fn generate_into<I: ImageAdapter>(
    adapter: &I,
    dir: &Path,
    req: &ImageRequest,
) -> Result<Option<String>, ImageError> {
    let Some(png) = adapter.render(req).await? else {
        tracing::info!(stem = %req.file_stem, "generator returned no image");
        return Ok(None);
    };
    let png = tokio::task::spawn_blocking(move || make_white_transparent(&png))
        .await
        .map_err(|e| ImageError::Generation(e.to_string()))??;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ImageError::Io { path: dir.to_path_buf(), source: e })?;
    let mut n = 0;
    let (name, path) = loop {
        let name = format!("{}_{n}.png", req.file_stem);
        let path = dir.join(&name);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            break (name, path);
        }
        n += 1;
    };
    tokio::fs::write(&path, png).await.map_err(|e| ImageError::Io { path: path.clone(), source: e })?;
    tracing::info!(path = %path.display(), "saved generated image");
    Ok(Some(name))
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ImageAdapter, ImageError, ImageRequest};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;

    /// A tiny opaque PNG with a white border.
    pub fn test_png() -> Vec<u8> {
        use image::{ImageBuffer, ImageFormat, Rgba};
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(4, 4, |x, y| {
            if x == 0 || y == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([(x * 40) as u8, (y * 40) as u8, 10, 255])
            }
        });
        let mut out = std::io::Cursor::new(Vec::new());
        match img.write_to(&mut out, ImageFormat::Png) {
            Ok(()) => out.into_inner(),
            Err(_) => Vec::new(),
        }
    }

    #[derive(Default)]
    struct FakeImageState {
        requests: Vec<ImageRequest>,
        delays: HashMap<String, Duration>,
        failing: HashSet<String>,
        empty: HashSet<String>,
    }

    /// Fake image generator. Succeeds with [`test_png`] unless configured
    /// otherwise per file stem.
    #[derive(Clone, Default)]
    pub struct FakeImageAdapter {
        inner: Arc<Mutex<FakeImageState>>,
    }

    impl FakeImageAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sleep before answering requests for `stem`.
        pub fn with_delay(self, stem: &str, delay: Duration) -> Self {
            self.inner.lock().delays.insert(stem.to_string(), delay);
            self
        }

        /// Fail requests for `stem`.
        pub fn failing(self, stem: &str) -> Self {
            self.inner.lock().failing.insert(stem.to_string());
            self
        }

        /// Return no image for `stem`.
        pub fn empty(self, stem: &str) -> Self {
            self.inner.lock().empty.insert(stem.to_string());
            self
        }

        pub fn requests(&self) -> Vec<ImageRequest> {
            self.inner.lock().requests.clone()
        }
    }

    #[async_trait]
    impl ImageAdapter for FakeImageAdapter {
        async fn render(&self, req: &ImageRequest) -> Result<Option<Vec<u8>>, ImageError> {
            let (delay, fail, empty) = {
                let mut inner = self.inner.lock();
                inner.requests.push(req.clone());
                (
                    inner.delays.get(&req.file_stem).copied(),
                    inner.failing.contains(&req.file_stem),
                    inner.empty.contains(&req.file_stem),
                )
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if fail {
                return Err(ImageError::Generation(format!("fake failure for {}", req.file_stem)));
            }
            if empty {
                return Ok(None);
            }
            Ok(Some(test_png()))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{test_png, FakeImageAdapter};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
