/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Store configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the S3 backend.
///
/// Threaded explicitly into [`crate::S3Store::connect`] so callers stay
/// testable with synthetic configurations; nothing here is read from
/// process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Destination bucket.
    pub bucket: String,
    /// Named credentials profile; falls back to the default provider chain
    /// when absent.
    pub profile: Option<String>,
    /// Region override.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores; switches the client to
    /// path-style addressing.
    pub endpoint: Option<String>,
}

impl StoreConfig {
    /// Minimal configuration against the default provider chain.
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            profile: None,
            region: None,
            endpoint: None,
        }
    }
}
