// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Versioned, envelope-encrypted credential storage.
//!
//! Each write generates a fresh data key from the key service, encrypts the
//! payload with AES-256-CTR, authenticates ciphertext and encryption context
//! with HMAC, and stores the record under the next version of its name with a
//! conditional write.
//!
//! ```ignore
//! use strongbox_common_core::{EncryptionContext, VersionSelector};
//! use strongbox_service::{bootstrap::build_service, telemetry::init_tracing};
//!
//! let config = strongbox_config::load_config()?;
//! init_tracing(&config.logging)?;
//! let svc = build_service(&config).await?;
//!
//! let ctx = EncryptionContext::new().with("env", "prod");
//! let v = svc.put("db-pass", b"hunter2", &ctx).await?;
//! let secret = svc.get("db-pass", VersionSelector::Exact(v), &ctx).await?;
//! ```

pub mod bootstrap;
pub mod error;
pub mod service;
pub mod telemetry;

pub use bootstrap::{build_service, ConfiguredCredentialService};
pub use error::{BootstrapError, CredentialError, CredentialResult, Operation};
pub use service::{CredentialService, ServiceOptions};
