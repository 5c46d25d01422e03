// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process master key.
//!
//! Data keys are wrapped with AES-256-GCM under the KEK. The AAD is
//! `key_id || 0x00 || name`, so a blob only unwraps for the name it was issued
//! to. Blob layout: `0x01 || nonce(12) || ciphertext+tag`.

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use strongbox_common_core::SecretName;
use strongbox_common_secret::SecretString;
use strongbox_envelope::{DataKey, DATA_KEY_LEN};
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::client::{GeneratedDataKey, MasterKeyClient};
use crate::error::{KmsError, KmsResult};

/// Size of the master key in bytes (AES-256).
pub const KEK_SIZE: usize = 32;

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;
const FORMAT_V1: u8 = 0x01;

pub struct SoftwareKms {
	key_id: String,
	kek: Zeroizing<[u8; KEK_SIZE]>,
}

impl SoftwareKms {
	pub fn new(key_id: impl Into<String>, kek: Zeroizing<[u8; KEK_SIZE]>) -> Self {
		Self {
			key_id: key_id.into(),
			kek,
		}
	}

	/// Random KEK. Wrapped keys die with the process; use for tests and demos.
	pub fn generate(key_id: impl Into<String>) -> Self {
		let mut kek = Zeroizing::new([0u8; KEK_SIZE]);
		OsRng.fill_bytes(kek.as_mut());
		Self::new(key_id, kek)
	}

	/// Create from a base64-encoded 32-byte KEK.
	pub fn from_base64(key_id: impl Into<String>, kek_base64: &SecretString) -> KmsResult<Self> {
		let kek_bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
			BASE64
				.decode(kek_base64.expose().trim().as_bytes())
				.map_err(|e| KmsError::Configuration(format!("invalid master key base64: {e}")))?,
		);

		if kek_bytes.len() != KEK_SIZE {
			return Err(KmsError::Configuration(format!(
				"master key must be {} bytes, got {}",
				KEK_SIZE,
				kek_bytes.len()
			)));
		}

		let mut kek = Zeroizing::new([0u8; KEK_SIZE]);
		kek.copy_from_slice(&kek_bytes);
		Ok(Self::new(key_id, kek))
	}

	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	fn cipher(&self) -> Aes256Gcm {
		Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.kek.as_slice()))
	}

	fn aad(&self, name: &SecretName) -> Vec<u8> {
		let mut aad = Vec::with_capacity(self.key_id.len() + 1 + name.as_str().len());
		aad.extend_from_slice(self.key_id.as_bytes());
		aad.push(0);
		aad.extend_from_slice(name.as_str().as_bytes());
		aad
	}

	fn wrap(&self, name: &SecretName, key: &DataKey) -> KmsResult<Vec<u8>> {
		let mut nonce = [0u8; NONCE_SIZE];
		OsRng.fill_bytes(&mut nonce);

		let aad = self.aad(name);
		let sealed = self
			.cipher()
			.encrypt(
				Nonce::from_slice(&nonce),
				Payload {
					msg: key.as_bytes(),
					aad: &aad,
				},
			)
			.map_err(|e| KmsError::Configuration(format!("data key wrap failed: {e}")))?;

		let mut blob = Vec::with_capacity(1 + NONCE_SIZE + sealed.len());
		blob.push(FORMAT_V1);
		blob.extend_from_slice(&nonce);
		blob.extend_from_slice(&sealed);
		Ok(blob)
	}

	fn unwrap(&self, name: &SecretName, blob: &[u8]) -> KmsResult<DataKey> {
		if blob.len() < 1 + NONCE_SIZE + TAG_SIZE {
			return Err(KmsError::UnwrapMismatch(format!(
				"wrapped key is {} bytes, too short",
				blob.len()
			)));
		}
		if blob[0] != FORMAT_V1 {
			return Err(KmsError::UnwrapMismatch(format!(
				"unknown wrapped key format {:#04x}",
				blob[0]
			)));
		}

		let (nonce, sealed) = blob[1..].split_at(NONCE_SIZE);
		let aad = self.aad(name);
		let plaintext: Zeroizing<Vec<u8>> = Zeroizing::new(
			self.cipher()
				.decrypt(
					Nonce::from_slice(nonce),
					Payload {
						msg: sealed,
						aad: &aad,
					},
				)
				.map_err(|_| {
					KmsError::UnwrapMismatch("authentication failed for this name or master key".into())
				})?,
		);

		if plaintext.len() != DATA_KEY_LEN {
			return Err(KmsError::InvalidResponse(format!(
				"unwrapped key is {} bytes, expected {DATA_KEY_LEN}",
				plaintext.len()
			)));
		}

		DataKey::from_bytes(&plaintext).map_err(|e| KmsError::InvalidResponse(e.to_string()))
	}
}

impl fmt::Debug for SoftwareKms {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SoftwareKms")
			.field("key_id", &self.key_id)
			.field("kek", &"[REDACTED]")
			.finish()
	}
}

#[async_trait]
impl MasterKeyClient for SoftwareKms {
	#[instrument(skip(self), fields(key_id = %self.key_id))]
	async fn generate_data_key(&self, name: &SecretName) -> KmsResult<GeneratedDataKey> {
		let plaintext = DataKey::generate();
		let wrapped_key = self.wrap(name, &plaintext)?;
		debug!(wrapped_len = wrapped_key.len(), "generated data key");
		Ok(GeneratedDataKey {
			plaintext,
			wrapped_key,
		})
	}

	#[instrument(skip(self, wrapped_key), fields(key_id = %self.key_id))]
	async fn unwrap_data_key(&self, name: &SecretName, wrapped_key: &[u8]) -> KmsResult<DataKey> {
		self.unwrap(name, wrapped_key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn name(s: &str) -> SecretName {
		SecretName::new(s).unwrap()
	}

	#[tokio::test]
	async fn wrap_unwrap_round_trip() {
		let kms = SoftwareKms::generate("test-key");
		let generated = kms.generate_data_key(&name("db-pass")).await.unwrap();
		assert_eq!(generated.wrapped_key[0], FORMAT_V1);
		assert_eq!(
			generated.wrapped_key.len(),
			1 + NONCE_SIZE + DATA_KEY_LEN + TAG_SIZE
		);

		let unwrapped = kms
			.unwrap_data_key(&name("db-pass"), &generated.wrapped_key)
			.await
			.unwrap();
		assert_eq!(unwrapped.as_bytes(), generated.plaintext.as_bytes());
	}

	#[tokio::test]
	async fn each_call_issues_a_new_key() {
		let kms = SoftwareKms::generate("test-key");
		let a = kms.generate_data_key(&name("x")).await.unwrap();
		let b = kms.generate_data_key(&name("x")).await.unwrap();
		assert_ne!(a.plaintext.as_bytes(), b.plaintext.as_bytes());
		assert_ne!(a.wrapped_key, b.wrapped_key);
	}

	#[tokio::test]
	async fn other_name_is_unwrap_mismatch() {
		let kms = SoftwareKms::generate("test-key");
		let generated = kms.generate_data_key(&name("db-pass")).await.unwrap();
		let err = kms
			.unwrap_data_key(&name("api-key"), &generated.wrapped_key)
			.await
			.unwrap_err();
		assert!(matches!(err, KmsError::UnwrapMismatch(_)));
	}

	#[tokio::test]
	async fn other_master_key_is_unwrap_mismatch() {
		let a = SoftwareKms::generate("test-key");
		let b = SoftwareKms::generate("test-key");
		let generated = a.generate_data_key(&name("db-pass")).await.unwrap();
		let err = b
			.unwrap_data_key(&name("db-pass"), &generated.wrapped_key)
			.await
			.unwrap_err();
		assert!(matches!(err, KmsError::UnwrapMismatch(_)));
	}

	#[tokio::test]
	async fn malformed_blobs_are_unwrap_mismatch() {
		let kms = SoftwareKms::generate("test-key");
		let generated = kms.generate_data_key(&name("n")).await.unwrap();

		let mut wrong_format = generated.wrapped_key.clone();
		wrong_format[0] = 0x02;

		for blob in [vec![], vec![FORMAT_V1; 10], wrong_format] {
			let err = kms.unwrap_data_key(&name("n"), &blob).await.unwrap_err();
			assert!(matches!(err, KmsError::UnwrapMismatch(_)), "{err:?}");
		}
	}

	#[test]
	fn from_base64_validates_length() {
		let good = SecretString::new(BASE64.encode([7u8; KEK_SIZE]));
		assert!(SoftwareKms::from_base64("k", &good).is_ok());

		let short = SecretString::new(BASE64.encode([7u8; 16]));
		assert!(matches!(
			SoftwareKms::from_base64("k", &short),
			Err(KmsError::Configuration(_))
		));

		let junk = SecretString::new("not base64!!".to_string());
		assert!(matches!(
			SoftwareKms::from_base64("k", &junk),
			Err(KmsError::Configuration(_))
		));
	}

	#[test]
	fn debug_hides_master_key() {
		let kms = SoftwareKms::new("k", Zeroizing::new([0x5A; KEK_SIZE]));
		let rendered = format!("{kms:?}");
		assert!(rendered.contains("REDACTED"));
		assert!(!rendered.contains("90"));
	}
}
