// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DigestAlgorithm, EncryptionContext, SecretName, Version};

/// One immutable stored version of a secret.
///
/// Holds only ciphertext and wrapped key material; never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
	pub name: SecretName,
	pub version: Version,
	pub ciphertext: Vec<u8>,
	pub wrapped_key: Vec<u8>,
	pub hmac_tag: Vec<u8>,
	pub digest: DigestAlgorithm,
	pub context: EncryptionContext,
	pub created_at: DateTime<Utc>,
}

/// A stored name and its highest version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSummary {
	pub name: SecretName,
	pub latest_version: Version,
}
