// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Envelope crypto engine.
//!
//! Every stored credential is encrypted under its own 64-byte [`DataKey`]:
//! the first half keys AES-256-CTR, the second half keys an HMAC over the
//! ciphertext and the record's [`EncryptionContext`]. The data key itself is
//! only ever persisted in wrapped form by a master key client.
//!
//! ```
//! use strongbox_common_core::EncryptionContext;
//! use strongbox_envelope::{decrypt, encrypt, DataKey};
//!
//! let key = DataKey::generate();
//! let ctx = EncryptionContext::new().with("env", "prod");
//! let sealed = encrypt(&key, b"hunter2", &ctx).unwrap();
//! let plain = decrypt(&key, &sealed.ciphertext, &sealed.hmac_tag, &ctx, sealed.digest).unwrap();
//! assert_eq!(plain.expose(), b"hunter2");
//! ```
//!
//! [`EncryptionContext`]: strongbox_common_core::EncryptionContext

pub mod envelope;
pub mod error;
pub mod key;

pub use envelope::{decrypt, encrypt, encrypt_with_digest, Sealed};
pub use error::{EnvelopeError, EnvelopeResult};
pub use key::{DataKey, DATA_KEY_LEN, HALF_KEY_LEN};
