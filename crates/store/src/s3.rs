/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! S3 storage backend.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::Region,
    primitives::ByteStream,
    types::{Delete, ObjectIdentifier},
    Client,
};
use bytes::Bytes;
use tracing::debug;

use crate::{
    backend::{ListPage, ObjectStore, MAX_DELETE_BATCH},
    config::StoreConfig,
    error::{Result, StoreError},
};

/// S3 client bound to one bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from the configured profile, region and endpoint.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        if config.bucket.is_empty() {
            return Err(StoreError::Config("bucket name must not be empty".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = config.profile.as_deref() {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = config.endpoint.as_deref() {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }

    /// The bucket this client operates on.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        debug!("Uploading {} bytes to s3://{}/{}", data.len(), self.bucket, key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| StoreError::Upload(err.to_string()))?;
        Ok(())
    }

    async fn list_page(&self, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .set_continuation_token(token.map(str::to_string))
            .send()
            .await
            .map_err(|err| StoreError::List(err.to_string()))?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();
        let next_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListPage { keys, next_token })
    }

    async fn delete_batch(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        if keys.len() > MAX_DELETE_BATCH {
            return Err(StoreError::BatchTooLarge(keys.len()));
        }

        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key.as_str()).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| StoreError::Delete(err.to_string()))?;
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|err| StoreError::Delete(err.to_string()))?;

        debug!("Deleting batch of {} keys from s3://{}", keys.len(), self.bucket);
        let response = self
            .client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|err| StoreError::Delete(err.to_string()))?;

        // A DeleteObjects call can succeed overall while rejecting
        // individual keys; surface those as a batch failure.
        let errors = response.errors();
        if !errors.is_empty() {
            let first = &errors[0];
            return Err(StoreError::Delete(format!(
                "{} of {} keys rejected, first: {} ({})",
                errors.len(),
                keys.len(),
                first.key().unwrap_or("unknown key"),
                first.message().unwrap_or("no message"),
            )));
        }
        Ok(())
    }
}
