/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Error types for dump production.

use thiserror::Error;

/// Result type for dump operations.
pub type Result<T> = std::result::Result<T, DumpError>;

/// Dump-specific errors.
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("listing databases failed: {0}")]
    Enumerate(String),

    #[error("dumping database {database} failed: {reason}")]
    Dump { database: String, reason: String },

    #[error("uploading {key} failed: {reason}")]
    Upload { key: String, reason: String },
}
