// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.
//!
//! Each section has a `*ConfigLayer` (all fields optional, mergeable) and a
//! finalized `*Config` with defaults applied.

mod envelope;
mod kms;
mod logging;
mod retry;
mod store;

pub use envelope::{EnvelopeConfig, EnvelopeConfigLayer};
pub use kms::{KmsConfig, KmsConfigLayer, KmsKind, KmsSecrets};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use retry::{RetryConfig, RetryConfigLayer};
pub use store::{StoreConfig, StoreConfigLayer, StoreKind};
