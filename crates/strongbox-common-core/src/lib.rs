// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types shared by every Strongbox crate.
//!
//! - [`SecretName`]: validated caller-chosen identifier
//! - [`Version`]: strictly increasing version number, persisted zero-padded
//! - [`EncryptionContext`]: authenticated key/value pairs bound to a record
//! - [`DigestAlgorithm`]: HMAC digest used for a record's integrity tag
//! - [`SecretRecord`]: the immutable persisted row for one `(name, version)`

pub mod context;
pub mod digest;
pub mod error;
pub mod name;
pub mod record;
pub mod version;

pub use context::EncryptionContext;
pub use digest::DigestAlgorithm;
pub use error::{CoreError, CoreResult};
pub use name::SecretName;
pub use record::{SecretRecord, SecretSummary};
pub use version::{Version, VersionSelector, VERSION_WIDTH};
