/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Database enumeration.

use tokio::process::Command;
use tracing::debug;

use crate::error::{DumpError, Result};

/// Default exclusions: the server's own system schemas.
pub const DEFAULT_EXCLUDE: &str = "information_schema performance_schema mysql sys";

/// List the databases visible to `user` by shelling out to the `mysql`
/// client, dropping the excluded names.
pub async fn list_databases(user: &str, exclude: &[String]) -> Result<Vec<String>> {
    let output = Command::new("mysql")
        .args(["-u", user, "-e", "SHOW DATABASES;"])
        .output()
        .await?;
    if !output.status.success() {
        return Err(DumpError::Enumerate(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let databases = filter_databases(&String::from_utf8_lossy(&output.stdout), exclude);
    debug!("Found {} databases to back up", databases.len());
    Ok(databases)
}

/// Split `SHOW DATABASES;` output on whitespace, dropping the column header
/// and the excluded names.
pub fn filter_databases(raw: &str, exclude: &[String]) -> Vec<String> {
    raw.split_whitespace()
        .filter(|name| *name != "Database" && !exclude.iter().any(|excluded| excluded == name))
        .map(str::to_string)
        .collect()
}
