/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! # Backup retention
//!
//! Grandfather-father-son retention for date-named backup folders in an
//! object store:
//!
//! - A pure schedule computation mapping a reference date to the set of
//!   dates whose backups must survive (a week of daily backups, four weekly
//!   checkpoints, three monthly checkpoints)
//! - A reconciliation pass that diffs the dated folders existing remotely
//!   against that set and deletes everything else, best-effort

pub mod error;
pub mod reconcile;
pub mod schedule;

pub use error::{Result, RetentionError};
pub use reconcile::{reconcile, DeletedFolder, FolderFailure, ReconcileOutcome};
pub use schedule::{parse_reference_date, RetentionPolicy, DATE_FORMAT};
