// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S3-compatible object store backend.

use crate::backend::{BackendKind, StorageBackend, StorageDescriptor};
use crate::content_type::content_type;
use crate::error::StorageError;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use forge_core::normalize_relative;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Connection settings for [`S3Storage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2)
    pub endpoint: Option<String>,
    /// CDN domain that fronts the bucket
    pub cdn_domain: Option<String>,
}

impl S3Config {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), region: region.into(), endpoint: None, cdn_domain: None }
    }

    forge_core::setters! {
        option {
            endpoint: String,
            cdn_domain: String,
        }
    }

    /// URL prefix objects are served from.
    pub fn public_base(&self) -> String {
        match &self.cdn_domain {
            Some(cdn) => format!("https://{}", cdn.trim_end_matches('/')),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }

    pub fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base(), normalize_relative(path))
    }
}

/// Objects stored as keys in a single bucket.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
    config: S3Config,
}

impl S3Storage {
    /// Build a client from the ambient AWS credential chain.
    pub async fn connect(config: S3Config) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if config.endpoint.is_some() {
            builder = builder.force_path_style(true);
        }
        tracing::info!(bucket = %config.bucket, region = %config.region, "using s3 storage");
        Self { client: Client::from_conf(builder.build()), config }
    }

    pub fn with_client(client: Client, config: S3Config) -> Self {
        Self { client, config }
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn key(path: &str) -> String {
        normalize_relative(path)
    }
}

fn remote<E>(err: E) -> StorageError
where
    E: std::error::Error,
{
    StorageError::Remote(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl StorageBackend for S3Storage {
    fn kind(&self) -> BackendKind {
        BackendKind::S3
    }

    fn url(&self, path: &str) -> String {
        self.config.object_url(path)
    }

    fn describe(&self) -> StorageDescriptor {
        StorageDescriptor {
            kind: BackendKind::S3,
            base_url: format!("{}/", self.config.public_base()),
            bucket: Some(self.config.bucket.clone()),
        }
    }

    async fn save_binary(&self, path: &str, data: Vec<u8>) -> Result<String, StorageError> {
        let key = Self::key(path);
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type(&key))
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(remote)?;
        tracing::debug!(key, "uploaded object");
        Ok(self.url(&key))
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let key = Self::key(path);
        let result = self.client.get_object().bucket(&self.config.bucket).key(&key).send().await;
        match result {
            Ok(out) => {
                let bytes = out.body.collect().await.map_err(remote)?;
                Ok(bytes.into_bytes().to_vec())
            }
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                Err(StorageError::NotFound(key))
            }
            Err(e) => Err(remote(e)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let key = Self::key(path);
        let result = self.client.head_object().bucket(&self.config.bucket).key(&key).send().await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(remote(e)),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let key = Self::key(path);
        match self.client.delete_object().bucket(&self.config.bucket).key(&key).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(key, error = %DisplayErrorContext(&e), "delete failed");
                Ok(false)
            }
        }
    }

    async fn list_files(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.config.bucket)
            .prefix(Self::key(prefix))
            .into_paginator()
            .send();
        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(remote)?;
            keys.extend(page.contents().iter().filter_map(|obj| obj.key().map(str::to_string)));
        }
        Ok(keys)
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<String, StorageError> {
        let (src, dst) = (Self::key(src), Self::key(dst));
        self.client
            .copy_object()
            .bucket(&self.config.bucket)
            .copy_source(copy_source(&self.config.bucket, &src))
            .key(&dst)
            .send()
            .await
            .map_err(remote)?;
        Ok(self.url(&dst))
    }
}

/// Characters left as-is in a `CopyObject` source key.
const KEY_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'/').remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// `bucket/key` with the key percent-encoded, as `x-amz-copy-source` expects.
fn copy_source(bucket: &str, key: &str) -> String {
    format!("{bucket}/{}", utf8_percent_encode(key, KEY_SAFE))
}
