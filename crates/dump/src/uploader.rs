/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Upload pipeline.

use serde::{Deserialize, Serialize};
use store::ObjectStore;
use tracing::{error, info};

use crate::{
    error::{DumpError, Result},
    producer,
};

/// Where one run's artifacts land: `<prefix>/<date>/<time>/<db>.sql.gz`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPlan {
    /// Destination folder in the bucket.
    pub prefix: String,
    /// Run date, rendered `YYYY-MM-DD`.
    pub date: String,
    /// Run time, rendered `HH-MM`.
    pub time: String,
    /// Database user performing the dumps.
    pub user: String,
}

impl BackupPlan {
    /// Object key for one database's artifact.
    pub fn object_key(&self, database: &str) -> String {
        format!("{}/{}/{}/{}.sql.gz", self.prefix, self.date, self.time, database)
    }
}

/// Per-run upload summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupSummary {
    /// Databases dumped and uploaded successfully.
    pub uploaded: Vec<String>,
    /// Databases whose dump or upload failed; the run continued past them.
    pub failed: Vec<DatabaseFailure>,
}

/// One database that could not be backed up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseFailure {
    pub database: String,
    pub reason: String,
}

impl BackupSummary {
    /// True when every database was dumped and uploaded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Dump and upload every database in turn. A failed dump or upload is
/// recorded and the remaining databases are still attempted; callers report
/// a non-zero status at the end of the run.
pub async fn backup_all(
    store: &dyn ObjectStore,
    plan: &BackupPlan,
    databases: &[String],
) -> BackupSummary {
    let mut summary = BackupSummary::default();
    for database in databases {
        match backup_one(store, plan, database).await {
            Ok(()) => summary.uploaded.push(database.clone()),
            Err(err) => {
                error!("Backup of {} failed: {}", database, err);
                summary.failed.push(DatabaseFailure {
                    database: database.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    summary
}

async fn backup_one(store: &dyn ObjectStore, plan: &BackupPlan, database: &str) -> Result<()> {
    let data = producer::dump_database(&plan.user, database).await?;
    let key = plan.object_key(database);
    store
        .put(&key, data)
        .await
        .map_err(|err| DumpError::Upload {
            key: key.clone(),
            reason: err.to_string(),
        })?;
    info!("Uploaded {}", key);
    Ok(())
}
