/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Error types for retention operations.

use store::StoreError;
use thiserror::Error;

/// Result type for retention operations.
pub type Result<T> = std::result::Result<T, RetentionError>;

/// Retention-specific errors.
#[derive(Error, Debug)]
pub enum RetentionError {
    /// Malformed reference date; fails the run before any retention
    /// decision is made.
    #[error("invalid reference date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    #[error("invalid folder pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The remote listing could not be completed. Fatal: without a
    /// trustworthy view of the existing folders the delete decision cannot
    /// be trusted, so reconciliation aborts before deleting anything.
    #[error("listing existing folders failed: {0}")]
    Listing(#[source] StoreError),

    /// Deleting one folder failed. Recorded against that folder while the
    /// remaining folders are still attempted.
    #[error("deleting folder {folder} failed: {source}")]
    Deletion {
        folder: String,
        #[source]
        source: StoreError,
    },
}
