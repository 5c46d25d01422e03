// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Versioned secret stores.
//!
//! A store keeps immutable [`SecretRecord`]s keyed by `(name, version)` and
//! offers one atomic primitive, [`VersionedSecretStore::put_if_absent`], on
//! which the credential service builds its optimistic versioning.
//!
//! [`SecretRecord`]: strongbox_common_core::SecretRecord

pub mod backend;
pub mod error;
pub mod memory;
pub mod pool;
pub mod sqlite;
pub mod store;

#[cfg(test)]
mod conformance;

pub use backend::StoreBackend;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pool::create_pool;
pub use sqlite::SqliteStore;
pub use store::VersionedSecretStore;
