// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Seal and open credential payloads.
//!
//! Tag input is `ciphertext || canonical(context) || be64(len(ciphertext))`.
//! The counter block is fixed, which is only sound because a data key never
//! encrypts more than one plaintext.

use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use strongbox_common_core::{DigestAlgorithm, EncryptionContext};
use strongbox_common_secret::SecretBytes;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::key::DataKey;

type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

const INITIAL_COUNTER: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];

/// Output of [`encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
	pub ciphertext: Vec<u8>,
	pub hmac_tag: Vec<u8>,
	pub digest: DigestAlgorithm,
}

/// Encrypt with the default digest (SHA256).
pub fn encrypt(
	key: &DataKey,
	plaintext: &[u8],
	context: &EncryptionContext,
) -> EnvelopeResult<Sealed> {
	encrypt_with_digest(key, plaintext, context, DigestAlgorithm::default())
}

pub fn encrypt_with_digest(
	key: &DataKey,
	plaintext: &[u8],
	context: &EncryptionContext,
	digest: DigestAlgorithm,
) -> EnvelopeResult<Sealed> {
	let mut ciphertext = plaintext.to_vec();
	apply_keystream(key, &mut ciphertext)?;
	let hmac_tag = sign(digest, key.mac_key(), &ciphertext, context)?;

	Ok(Sealed {
		ciphertext,
		hmac_tag,
		digest,
	})
}

/// Verify the tag in constant time, then decrypt.
///
/// Returns [`EnvelopeError::Integrity`] for any tag mismatch, including a tag
/// of the wrong length or a context that differs from the one sealed.
pub fn decrypt(
	key: &DataKey,
	ciphertext: &[u8],
	hmac_tag: &[u8],
	context: &EncryptionContext,
	digest: DigestAlgorithm,
) -> EnvelopeResult<SecretBytes> {
	verify(digest, key.mac_key(), ciphertext, context, hmac_tag)?;

	let mut plaintext = ciphertext.to_vec();
	apply_keystream(key, &mut plaintext)?;
	Ok(SecretBytes::new(plaintext))
}

fn apply_keystream(key: &DataKey, buf: &mut [u8]) -> EnvelopeResult<()> {
	let mut cipher = Aes256Ctr::new_from_slices(key.encryption_key(), &INITIAL_COUNTER)
		.map_err(|e| EnvelopeError::Cipher(e.to_string()))?;
	cipher
		.try_apply_keystream(buf)
		.map_err(|e| EnvelopeError::Cipher(e.to_string()))
}

fn keyed<M>(mac_key: &[u8], ciphertext: &[u8], context: &EncryptionContext) -> EnvelopeResult<M>
where
	M: Mac + KeyInit,
{
	let mut mac = <M as KeyInit>::new_from_slice(mac_key)
		.map_err(|e| EnvelopeError::Cipher(e.to_string()))?;
	mac.update(ciphertext);
	mac.update(&context.canonical_bytes());
	mac.update(&(ciphertext.len() as u64).to_be_bytes());
	Ok(mac)
}

fn sign(
	digest: DigestAlgorithm,
	mac_key: &[u8],
	ciphertext: &[u8],
	context: &EncryptionContext,
) -> EnvelopeResult<Vec<u8>> {
	let tag = match digest {
		DigestAlgorithm::Sha256 => keyed::<Hmac<Sha256>>(mac_key, ciphertext, context)?
			.finalize()
			.into_bytes()
			.to_vec(),
		DigestAlgorithm::Sha384 => keyed::<Hmac<Sha384>>(mac_key, ciphertext, context)?
			.finalize()
			.into_bytes()
			.to_vec(),
		DigestAlgorithm::Sha512 => keyed::<Hmac<Sha512>>(mac_key, ciphertext, context)?
			.finalize()
			.into_bytes()
			.to_vec(),
	};
	Ok(tag)
}

fn verify(
	digest: DigestAlgorithm,
	mac_key: &[u8],
	ciphertext: &[u8],
	context: &EncryptionContext,
	tag: &[u8],
) -> EnvelopeResult<()> {
	let verified = match digest {
		DigestAlgorithm::Sha256 => {
			keyed::<Hmac<Sha256>>(mac_key, ciphertext, context)?.verify_slice(tag)
		}
		DigestAlgorithm::Sha384 => {
			keyed::<Hmac<Sha384>>(mac_key, ciphertext, context)?.verify_slice(tag)
		}
		DigestAlgorithm::Sha512 => {
			keyed::<Hmac<Sha512>>(mac_key, ciphertext, context)?.verify_slice(tag)
		}
	};
	verified.map_err(|_| EnvelopeError::Integrity)
}
