// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building blocks: named, read-only template bundles seeded into a
//! job's workspace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single in-memory seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFile {
    pub filename: String,
    pub code: String,
}

impl BlockFile {
    pub fn new(filename: impl Into<String>, code: impl Into<String>) -> Self {
        Self { filename: filename.into(), code: code.into() }
    }
}

/// Reference to a template bundle.
///
/// A block is either backed by a directory (or single file) on disk, by a
/// set of inline files, or both. It materializes under
/// `resources/{folder_name}` in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingBlock {
    pub folder_name: String,
    #[serde(default)]
    pub files: Vec<BlockFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl BuildingBlock {
    /// Block backed by a directory or file on disk. The folder name is the
    /// last path component.
    pub fn from_path(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let folder_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        Self { folder_name, files: Vec::new(), source: Some(source) }
    }

    /// Block made of inline files only.
    pub fn inline(folder_name: impl Into<String>, files: Vec<BlockFile>) -> Self {
        Self { folder_name: folder_name.into(), files, source: None }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// The seed template bundles shipped with the resources directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedBlock {
    Snake,
    Minesweeper,
    Breakout,
}

impl SeedBlock {
    pub fn name(self) -> &'static str {
        match self {
            SeedBlock::Snake => "snake",
            SeedBlock::Minesweeper => "minesweeper",
            SeedBlock::Breakout => "breakout",
        }
    }

    /// Resolve against the resources directory.
    pub fn block(self, resources_dir: &Path) -> BuildingBlock {
        BuildingBlock::from_path(resources_dir.join(self.name()))
    }
}

crate::simple_display! {
    SeedBlock {
        Snake => "snake",
        Minesweeper => "minesweeper",
        Breakout => "breakout",
    }
}
