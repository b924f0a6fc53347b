/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! # Object store client
//!
//! Storage backends for backup artifacts:
//!
//! - An S3 backend for production use, speaking `ListObjectsV2` with
//!   continuation tokens and batched `DeleteObjects`
//! - An in-memory backend with a configurable listing page size, used by
//!   tests to exercise pagination and batching

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod s3;

pub use backend::{ListPage, ObjectStore, MAX_DELETE_BATCH};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use s3::S3Store;
