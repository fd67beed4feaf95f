// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ImageRouter: delegates image generation to the configured adapter.

use async_trait::async_trait;
use forge_adapters::{CommandImageAdapter, ImageAdapter, ImageError, ImageRequest, NoopImageAdapter};

/// Image adapter chosen at startup from `FORGE_IMAGE_COMMAND`.
#[derive(Debug, Clone)]
pub enum ImageRouter {
    Command(CommandImageAdapter),
    Disabled(NoopImageAdapter),
}

#[async_trait]
impl ImageAdapter for ImageRouter {
    async fn render(&self, req: &ImageRequest) -> Result<Option<Vec<u8>>, ImageError> {
        match self {
            ImageRouter::Command(adapter) => adapter.render(req).await,
            ImageRouter::Disabled(adapter) => adapter.render(req).await,
        }
    }
}
