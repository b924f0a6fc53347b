/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Storage backend trait definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Largest number of keys accepted by a single delete request. Object stores
/// cap batch deletes at this size; callers chunk larger sets.
pub const MAX_DELETE_BATCH: usize = 1000;

/// One page of a key listing.
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Keys returned on this page, in lexicographic order.
    pub keys: Vec<String>,
    /// Continuation token for the next page; `None` when the listing is
    /// complete.
    pub next_token: Option<String>,
}

/// Trait for object store backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object under `key`.
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// List one page of keys below `prefix`, resuming from `token` when
    /// given. Callers loop until `next_token` comes back `None`.
    async fn list_page(&self, prefix: &str, token: Option<&str>) -> Result<ListPage>;

    /// Delete up to [`MAX_DELETE_BATCH`] keys in one request. Keys that do
    /// not exist are silently skipped, matching S3 semantics.
    async fn delete_batch(&self, keys: &[String]) -> Result<()>;
}
