// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! forge-storage: object storage backends and the manifest

mod backend;
mod content_type;
mod error;
mod factory;
mod local;
pub mod locate;
mod manifest;
mod s3;

pub use backend::{BackendKind, StorageBackend, StorageDescriptor};
pub use content_type::{content_type, OCTET_STREAM};
pub use error::StorageError;
pub use factory::{global, init, BackendName, Storage, StorageConfig};
pub use local::LocalStorage;
pub use locate::{asset_url, entry_point, list_sessions, AssetKind, SessionListing};
pub use manifest::{Manifest, SessionGroup, MANIFEST_PATH};
pub use s3::{S3Config, S3Storage};
