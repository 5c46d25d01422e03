// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use strongbox_common_http::RetryableError;
use thiserror::Error;

pub type KmsResult<T> = std::result::Result<T, KmsError>;

/// Master key client failures. Messages never contain key material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KmsError {
	/// Network failure, timeout, throttling or server error.
	#[error("key service unavailable: {0}")]
	Unavailable(String),

	#[error("key service denied the request: {0}")]
	Denied(String),

	/// The wrapped key was not produced for this name or this master key.
	#[error("wrapped key does not unwrap for this name: {0}")]
	UnwrapMismatch(String),

	#[error("invalid key service response: {0}")]
	InvalidResponse(String),

	#[error("key service configuration error: {0}")]
	Configuration(String),
}

impl KmsError {
	pub fn is_retryable(&self) -> bool {
		matches!(self, KmsError::Unavailable(_))
	}
}

impl RetryableError for KmsError {
	fn is_retryable(&self) -> bool {
		KmsError::is_retryable(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_unavailable_is_retryable() {
		assert!(KmsError::Unavailable("503".into()).is_retryable());
		assert!(!KmsError::Denied("403".into()).is_retryable());
		assert!(!KmsError::UnwrapMismatch("bad".into()).is_retryable());
		assert!(!KmsError::InvalidResponse("json".into()).is_retryable());
		assert!(!KmsError::Configuration("key".into()).is_retryable());
	}
}
