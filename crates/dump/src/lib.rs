/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! # Dump producer
//!
//! The mechanical half of the backup tool: enumerate the databases visible
//! to the configured user, produce a gzip-compressed `mysqldump` stream per
//! database and push each artifact to the object store under the dated key
//! layout `<prefix>/<YYYY-MM-DD>/<HH-MM>/<database>.sql.gz`.

pub mod catalog;
pub mod error;
pub mod producer;
pub mod uploader;

pub use catalog::{filter_databases, list_databases, DEFAULT_EXCLUDE};
pub use error::{DumpError, Result};
pub use producer::dump_database;
pub use uploader::{backup_all, BackupPlan, BackupSummary, DatabaseFailure};
