/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! In-memory storage backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::{
    backend::{ListPage, ObjectStore, MAX_DELETE_BATCH},
    error::{Result, StoreError},
};

const DEFAULT_PAGE_SIZE: usize = 1000;

/// In-memory backend used by tests and local development.
///
/// Mirrors the S3 listing contract: keys come back in lexicographic order,
/// pages carry at most `page_size` keys and a continuation token points at
/// the last key of the page served. Delete batches are capped at
/// [`MAX_DELETE_BATCH`] exactly like the real store.
#[derive(Debug)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// A store that serves listings in pages of `page_size` keys, letting
    /// tests drive the pagination loop with small fixtures.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// Whether `key` is currently stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.objects.lock().contains_key(key)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        self.objects.lock().insert(key.to_string(), data);
        Ok(())
    }

    async fn list_page(&self, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let objects = self.objects.lock();
        let mut keys = Vec::with_capacity(self.page_size);
        let mut next_token = None;
        for key in objects.keys().filter(|key| key.starts_with(prefix)) {
            if let Some(after) = token {
                if key.as_str() <= after {
                    continue;
                }
            }
            if keys.len() == self.page_size {
                // More matching keys remain; resume after the last one served.
                next_token = keys.last().cloned();
                break;
            }
            keys.push(key.clone());
        }
        Ok(ListPage { keys, next_token })
    }

    async fn delete_batch(&self, keys: &[String]) -> Result<()> {
        if keys.len() > MAX_DELETE_BATCH {
            return Err(StoreError::BatchTooLarge(keys.len()));
        }
        let mut objects = self.objects.lock();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(page_size: usize, keys: &[&str]) -> MemoryStore {
        let store = MemoryStore::with_page_size(page_size);
        for key in keys {
            store.put(key, Bytes::from_static(b"data")).await.unwrap();
        }
        store
    }

    async fn collect_all(store: &MemoryStore, prefix: &str) -> Vec<String> {
        let mut keys = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = store.list_page(prefix, token.as_deref()).await.unwrap();
            keys.extend(page.keys);
            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        keys
    }

    #[tokio::test]
    async fn lists_only_matching_prefix() {
        let store = seeded(10, &["a/1", "a/2", "b/1"]).await;
        assert_eq!(collect_all(&store, "a/").await, vec!["a/1", "a/2"]);
    }

    #[tokio::test]
    async fn paginates_with_continuation_tokens() {
        let keys: Vec<String> = (0..25).map(|i| format!("p/{i:02}")).collect();
        let store = MemoryStore::with_page_size(7);
        for key in &keys {
            store.put(key, Bytes::from_static(b"data")).await.unwrap();
        }

        let first = store.list_page("p/", None).await.unwrap();
        assert_eq!(first.keys.len(), 7);
        assert_eq!(first.next_token.as_deref(), Some("p/06"));

        assert_eq!(collect_all(&store, "p/").await, keys);
    }

    #[tokio::test]
    async fn final_page_has_no_token() {
        let store = seeded(3, &["x/1", "x/2", "x/3"]).await;
        let page = store.list_page("x/", None).await.unwrap();
        assert_eq!(page.keys.len(), 3);
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn rejects_oversized_delete_batches() {
        let store = MemoryStore::new();
        let keys: Vec<String> = (0..MAX_DELETE_BATCH + 1).map(|i| format!("k/{i}")).collect();
        assert!(matches!(
            store.delete_batch(&keys).await,
            Err(StoreError::BatchTooLarge(_))
        ));
    }

    #[tokio::test]
    async fn deleting_missing_keys_is_a_noop() {
        let store = seeded(10, &["a/1"]).await;
        store
            .delete_batch(&["a/1".to_string(), "a/ghost".to_string()])
            .await
            .unwrap();
        assert!(store.is_empty());
    }
}
