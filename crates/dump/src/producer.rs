/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Per-database dump production.

use std::io::Write;

use bytes::Bytes;
use flate2::{write::GzEncoder, Compression};
use tokio::process::Command;
use tracing::debug;

use crate::error::{DumpError, Result};

/// Dump one database with `mysqldump` and gzip-compress the result.
pub async fn dump_database(user: &str, database: &str) -> Result<Bytes> {
    let output = Command::new("mysqldump")
        .args(["-u", user, "--databases", database])
        .output()
        .await?;
    if !output.status.success() {
        return Err(DumpError::Dump {
            database: database.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    debug!("Dumped {} ({} bytes raw)", database, output.stdout.len());
    compress(&output.stdout)
}

/// Gzip-compress a dump stream at the default level.
pub fn compress(data: &[u8]) -> Result<Bytes> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(data.len() / 4 + 64),
        Compression::default(),
    );
    encoder.write_all(data)?;
    Ok(Bytes::from(encoder.finish()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_output_carries_the_gzip_magic() {
        let compressed = compress(b"CREATE TABLE t (id INT);").unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn compresses_empty_input() {
        let compressed = compress(b"").unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
    }
}
