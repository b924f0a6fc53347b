/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Error types for object store operations.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("listing failed: {0}")]
    List(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete batch of {0} keys exceeds the per-request limit")]
    BatchTooLarge(usize),
}
