/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Remote-state reconciliation.
//!
//! Lists the dated folders that exist under a prefix, diffs them against the
//! keep set and deletes everything outside it. Folder names are compared to
//! the keep set as `YYYY-MM-DD` strings, so a date-shaped folder that is not
//! a valid calendar date is still listed and swept.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use store::{ObjectStore, StoreError, MAX_DELETE_BATCH};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, RetentionError},
    schedule::DATE_FORMAT,
};

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Folders present remotely and in the keep set.
    pub retained: Vec<String>,
    /// Folders deleted this run.
    pub deleted: Vec<DeletedFolder>,
    /// Folders whose deletion failed; the run continued past them.
    pub failed: Vec<FolderFailure>,
}

/// One folder removed by reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedFolder {
    pub folder: String,
    /// Number of objects removed from the folder.
    pub objects: u64,
}

/// One folder that could not be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderFailure {
    pub folder: String,
    pub reason: String,
}

impl ReconcileOutcome {
    /// True when every folder outside the keep set was deleted.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total objects removed across all deleted folders.
    pub fn objects_deleted(&self) -> u64 {
        self.deleted.iter().map(|folder| folder.objects).sum()
    }
}

/// Reconcile the dated folders under `prefix` against `keep`, deleting every
/// folder whose date is not in the set.
///
/// A failure while listing the existing folders aborts before any deletion
/// is attempted. A failure while deleting one folder is recorded in the
/// outcome and the remaining folders are still attempted; callers inspect
/// [`ReconcileOutcome::is_clean`] and report a non-zero status at the end.
/// That best-effort policy is deliberate: one unreachable folder must not
/// block the rest of the cleanup.
///
/// Running twice in a row with no new folders deletes nothing the second
/// time; the operation is idempotent.
pub async fn reconcile(
    store: &dyn ObjectStore,
    prefix: &str,
    keep: &BTreeSet<NaiveDate>,
) -> Result<ReconcileOutcome> {
    let existing = list_dated_folders(store, prefix).await?;
    let keep: BTreeSet<String> = keep
        .iter()
        .map(|date| date.format(DATE_FORMAT).to_string())
        .collect();
    debug!(
        "Found {} dated folders under {}/, keeping up to {}",
        existing.len(),
        prefix,
        keep.len()
    );

    let mut outcome = ReconcileOutcome::default();
    for folder in existing {
        if keep.contains(&folder) {
            outcome.retained.push(folder);
            continue;
        }
        match delete_folder(store, prefix, &folder).await {
            Ok(objects) => {
                info!("Deleted expired folder {}/{} ({} objects)", prefix, folder, objects);
                outcome.deleted.push(DeletedFolder { folder, objects });
            }
            Err(err) => {
                warn!("Failed to delete folder {}/{}, continuing: {}", prefix, folder, err);
                outcome.failed.push(FolderFailure {
                    folder,
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(outcome)
}

/// List the distinct dated folders below `prefix`, following continuation
/// tokens until the store reports the listing complete. No bound is assumed
/// on the number of objects or pages.
async fn list_dated_folders(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<BTreeSet<String>> {
    let pattern = Regex::new(&format!(
        r"^{}/(\d{{4}}-\d{{2}}-\d{{2}})/",
        regex::escape(prefix)
    ))?;

    let mut folders = BTreeSet::new();
    let mut token: Option<String> = None;
    loop {
        let page = store
            .list_page(prefix, token.as_deref())
            .await
            .map_err(RetentionError::Listing)?;
        for key in &page.keys {
            if let Some(folder) = pattern.captures(key).and_then(|captures| captures.get(1)) {
                folders.insert(folder.as_str().to_string());
            }
        }
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(folders)
}

/// Delete every object under one dated folder, in batches no larger than the
/// store's per-request cap. A folder with no objects left is a no-op.
async fn delete_folder(store: &dyn ObjectStore, prefix: &str, folder: &str) -> Result<u64> {
    let wrap = |source: StoreError| RetentionError::Deletion {
        folder: folder.to_string(),
        source,
    };

    let folder_prefix = format!("{prefix}/{folder}/");
    let mut keys = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = store
            .list_page(&folder_prefix, token.as_deref())
            .await
            .map_err(wrap)?;
        keys.extend(page.keys);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    for batch in keys.chunks(MAX_DELETE_BATCH) {
        store.delete_batch(batch).await.map_err(wrap)?;
    }
    Ok(keys.len() as u64)
}
