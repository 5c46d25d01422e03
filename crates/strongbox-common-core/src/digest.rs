// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Hash function used for a record's HMAC tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DigestAlgorithm {
	#[default]
	Sha256,
	Sha384,
	Sha512,
}

impl DigestAlgorithm {
	pub fn as_str(&self) -> &'static str {
		match self {
			DigestAlgorithm::Sha256 => "SHA256",
			DigestAlgorithm::Sha384 => "SHA384",
			DigestAlgorithm::Sha512 => "SHA512",
		}
	}

	/// Length in bytes of a tag produced with this digest.
	pub fn tag_len(&self) -> usize {
		match self {
			DigestAlgorithm::Sha256 => 32,
			DigestAlgorithm::Sha384 => 48,
			DigestAlgorithm::Sha512 => 64,
		}
	}
}

impl fmt::Display for DigestAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DigestAlgorithm {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().replace('-', "").as_str() {
			"SHA256" => Ok(DigestAlgorithm::Sha256),
			"SHA384" => Ok(DigestAlgorithm::Sha384),
			"SHA512" => Ok(DigestAlgorithm::Sha512),
			_ => Err(CoreError::UnknownDigest(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_common_spellings() {
		assert_eq!("SHA256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
		assert_eq!("sha-384".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha384);
		assert_eq!("sha512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha512);
		assert!(matches!(
			"MD5".parse::<DigestAlgorithm>(),
			Err(CoreError::UnknownDigest(_))
		));
	}

	#[test]
	fn display_round_trips() {
		for d in [DigestAlgorithm::Sha256, DigestAlgorithm::Sha384, DigestAlgorithm::Sha512] {
			assert_eq!(d.to_string().parse::<DigestAlgorithm>().unwrap(), d);
		}
	}

	#[test]
	fn default_is_sha256() {
		assert_eq!(DigestAlgorithm::default(), DigestAlgorithm::Sha256);
		assert_eq!(DigestAlgorithm::default().tag_len(), 32);
	}
}
