// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{EnvelopeError, EnvelopeResult};

/// Size of a data key in bytes.
pub const DATA_KEY_LEN: usize = 64;

/// Size of each half (encryption key, MAC key).
pub const HALF_KEY_LEN: usize = 32;

/// Per-record key material: 32-byte cipher key followed by 32-byte MAC key.
///
/// Zeroed on drop. Not `Clone`; a data key is used for one encryption and
/// then discarded.
pub struct DataKey(Zeroizing<[u8; DATA_KEY_LEN]>);

impl DataKey {
	/// Fresh key from the OS RNG.
	pub fn generate() -> Self {
		let mut bytes = Zeroizing::new([0u8; DATA_KEY_LEN]);
		OsRng.fill_bytes(bytes.as_mut());
		Self(bytes)
	}

	pub fn from_bytes(bytes: &[u8]) -> EnvelopeResult<Self> {
		if bytes.len() != DATA_KEY_LEN {
			return Err(EnvelopeError::InvalidKeySize {
				expected: DATA_KEY_LEN,
				actual: bytes.len(),
			});
		}
		let mut key = Zeroizing::new([0u8; DATA_KEY_LEN]);
		key.copy_from_slice(bytes);
		Ok(Self(key))
	}

	pub fn encryption_key(&self) -> &[u8] {
		&self.0[..HALF_KEY_LEN]
	}

	pub fn mac_key(&self) -> &[u8] {
		&self.0[HALF_KEY_LEN..]
	}

	/// Full 64 bytes, for handing to a key wrapper.
	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_slice()
	}
}

impl fmt::Debug for DataKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("DataKey").field(&"[REDACTED]").finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generated_keys_differ() {
		let a = DataKey::generate();
		let b = DataKey::generate();
		assert_ne!(a.as_bytes(), b.as_bytes());
	}

	#[test]
	fn halves_split_the_key() {
		let bytes: Vec<u8> = (0..64).collect();
		let key = DataKey::from_bytes(&bytes).unwrap();
		assert_eq!(key.encryption_key(), &bytes[..32]);
		assert_eq!(key.mac_key(), &bytes[32..]);
	}

	#[test]
	fn wrong_length_rejected() {
		assert_eq!(
			DataKey::from_bytes(&[0u8; 32]).unwrap_err(),
			EnvelopeError::InvalidKeySize {
				expected: 64,
				actual: 32
			}
		);
	}

	#[test]
	fn debug_is_redacted() {
		let key = DataKey::from_bytes(&[0xAB; 64]).unwrap();
		let rendered = format!("{key:?}");
		assert!(rendered.contains("REDACTED"));
		assert!(!rendered.contains("171"));
	}
}
