// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type EnvelopeResult<T> = std::result::Result<T, EnvelopeError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
	/// The tag did not verify. Nothing was decrypted.
	#[error("integrity check failed")]
	Integrity,

	#[error("invalid data key size: expected {expected} bytes, got {actual}")]
	InvalidKeySize { expected: usize, actual: usize },

	#[error("cipher error: {0}")]
	Cipher(String),
}
