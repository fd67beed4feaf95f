// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cover and banner art for a finished job.

use crate::prompts;
use forge_adapters::{generate_into, ImageAdapter, ImageRequest};
use forge_core::{Category, JobId, ObjectPath, SessionTimestamp};
use forge_storage::StorageBackend;
use std::path::Path;

/// Which piece of box art to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtKind {
    /// Square
    Cover,
    /// Tall
    Banner,
}

impl ArtKind {
    pub fn stem(self) -> &'static str {
        match self {
            ArtKind::Cover => "cover_art",
            ArtKind::Banner => "banner_art",
        }
    }

    pub fn prompt(self, job_prompt: &str) -> String {
        match self {
            ArtKind::Cover => prompts::cover_art_prompt(job_prompt),
            ArtKind::Banner => prompts::banner_art_prompt(job_prompt),
        }
    }

    /// `cartridge_arts/{session}/{id}/{stem}.png`
    pub fn object_path(self, session: &SessionTimestamp, id: JobId) -> ObjectPath {
        ObjectPath::job(Category::CartridgeArts, session, id).join(&format!("{}.png", self.stem()))
    }
}

forge_core::simple_display! {
    ArtKind {
        Cover => "cover",
        Banner => "banner",
    }
}

/// Render one artifact into `scratch`, then upload it.
///
/// Returns the public URL, or `None` when generation or upload failed.
/// Failures are logged and never affect the rest of the pipeline.
pub async fn generate_art<I: ImageAdapter>(
    image: &I,
    storage: &dyn StorageBackend,
    scratch: &Path,
    kind: ArtKind,
    session: &SessionTimestamp,
    id: JobId,
    job_prompt: &str,
) -> Option<String> {
    let req = ImageRequest::new(kind.stem(), kind.prompt(job_prompt));
    let name = match generate_into(image, scratch, &req).await {
        Ok(Some(name)) => name,
        Ok(None) => {
            tracing::info!(job_id = %id, art = %kind, "no art produced");
            return None;
        }
        Err(e) => {
            tracing::warn!(job_id = %id, art = %kind, error = %e, "art generation failed");
            return None;
        }
    };

    let local = scratch.join(&name);
    let bytes = match tokio::fs::read(&local).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(job_id = %id, path = %local.display(), error = %e, "failed to read art");
            return None;
        }
    };
    let path = kind.object_path(session, id);
    let url = match storage.save_binary(path.as_str(), bytes).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(job_id = %id, path = %path, error = %e, "failed to upload art");
            return None;
        }
    };
    if let Err(e) = tokio::fs::remove_file(&local).await {
        tracing::debug!(path = %local.display(), error = %e, "failed to remove scratch art");
    }
    tracing::info!(job_id = %id, art = %kind, url = %url, "art uploaded");
    Some(url)
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
