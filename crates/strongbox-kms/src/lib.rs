// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Master key clients.
//!
//! A [`MasterKeyClient`] issues fresh data keys together with a wrapped copy,
//! and unwraps previously issued keys. The secret name is bound to every wrap
//! as authenticated context, so a wrapped key copied onto another name will not
//! unwrap.
//!
//! Backends:
//! - [`SoftwareKms`]: KEK held in process memory (development, single host)
//! - [`HttpKms`]: remote key service reached over HTTPS
//!
//! [`KmsBackend`] selects one of them at construction time.

pub mod backend;
pub mod client;
pub mod error;
pub mod http;
pub mod software;

pub use backend::KmsBackend;
pub use client::{GeneratedDataKey, MasterKeyClient};
pub use error::{KmsError, KmsResult};
pub use http::{HttpKms, HttpKmsConfig};
pub use software::{SoftwareKms, KEK_SIZE};
