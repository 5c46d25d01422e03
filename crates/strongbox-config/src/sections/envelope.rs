// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use strongbox_common_core::DigestAlgorithm;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeConfigLayer {
	pub digest: Option<DigestAlgorithm>,
}

impl EnvelopeConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.digest.is_some() {
			self.digest = other.digest;
		}
	}

	pub fn finalize(self) -> EnvelopeConfig {
		EnvelopeConfig {
			digest: self.digest.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeConfig {
	/// Digest for newly written records. Existing records keep their own.
	pub digest: DigestAlgorithm,
}
