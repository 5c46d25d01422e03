// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the credential service.
//!
//! Every variant names the secret involved. None carries plaintext or key
//! material.

use std::fmt;

use strongbox_common_core::{CoreError, Version};
use strongbox_envelope::EnvelopeError;
use strongbox_kms::KmsError;
use strongbox_store::StoreError;
use thiserror::Error;

/// Result type alias for credential service operations.
pub type CredentialResult<T> = Result<T, CredentialError>;

/// The public operation during which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	Put,
	Get,
	Rotate,
	ListVersions,
	Delete,
	DeleteAll,
	List,
	GetAll,
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Operation::Put => "put",
			Operation::Get => "get",
			Operation::Rotate => "rotate",
			Operation::ListVersions => "list_versions",
			Operation::Delete => "delete",
			Operation::DeleteAll => "delete_all",
			Operation::List => "list",
			Operation::GetAll => "get_all",
		};
		f.write_str(s)
	}
}

#[derive(Debug, Error)]
pub enum CredentialError {
	// =========================================================================
	// Key Service Errors
	// =========================================================================
	/// Still unavailable after the configured retries.
	#[error("key service unavailable during {operation} of {name}: {message}")]
	KeyServiceUnavailable {
		name: String,
		operation: Operation,
		message: String,
	},

	#[error("key service denied {operation} of {name}: {message}")]
	KeyServiceDenied {
		name: String,
		operation: Operation,
		message: String,
	},

	/// Malformed response or misconfigured client.
	#[error("key service fault during {operation} of {name}: {message}")]
	KeyServiceFault {
		name: String,
		operation: Operation,
		message: String,
	},

	// =========================================================================
	// Record Errors
	// =========================================================================
	#[error("integrity check failed for {name} version {version}")]
	Integrity { name: String, version: Version },

	#[error("wrapped key for {name} version {version} does not unwrap for this name or master key")]
	UnwrapMismatch { name: String, version: Version },

	#[error("gave up writing {name} after {attempts} version conflicts")]
	WriteConflict { name: String, attempts: u32 },

	#[error("{}", not_found_message(.name, .version))]
	NotFound {
		name: String,
		version: Option<Version>,
	},

	// =========================================================================
	// Input Errors
	// =========================================================================
	#[error("invalid secret name: {0}")]
	InvalidName(String),

	#[error("invalid version: {0}")]
	InvalidVersion(String),

	// =========================================================================
	// Infrastructure Errors
	// =========================================================================
	#[error("store error during {operation} of {name}: {source}")]
	Store {
		name: String,
		operation: Operation,
		#[source]
		source: StoreError,
	},

	#[error("envelope error for {name}: {source}")]
	Envelope {
		name: String,
		#[source]
		source: EnvelopeError,
	},
}

fn not_found_message(name: &str, version: &Option<Version>) -> String {
	match version {
		Some(v) => format!("secret {name} version {v} not found"),
		None => format!("secret {name} not found"),
	}
}

impl CredentialError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, CredentialError::NotFound { .. })
	}

	/// Whether the same call may succeed later without any change.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			CredentialError::KeyServiceUnavailable { .. } | CredentialError::WriteConflict { .. }
		)
	}

	/// Errors that indicate tampering or misrouted key material.
	pub fn is_integrity_failure(&self) -> bool {
		matches!(
			self,
			CredentialError::Integrity { .. } | CredentialError::UnwrapMismatch { .. }
		)
	}

	/// Name of the secret this error concerns, if any.
	pub fn secret_name(&self) -> Option<&str> {
		match self {
			CredentialError::KeyServiceUnavailable { name, .. }
			| CredentialError::KeyServiceDenied { name, .. }
			| CredentialError::KeyServiceFault { name, .. }
			| CredentialError::Integrity { name, .. }
			| CredentialError::UnwrapMismatch { name, .. }
			| CredentialError::WriteConflict { name, .. }
			| CredentialError::NotFound { name, .. }
			| CredentialError::Store { name, .. }
			| CredentialError::Envelope { name, .. } => Some(name),
			CredentialError::InvalidName(_) | CredentialError::InvalidVersion(_) => None,
		}
	}

	pub(crate) fn from_kms(
		err: KmsError,
		name: &str,
		operation: Operation,
		version: Option<Version>,
	) -> Self {
		let name = name.to_string();
		match err {
			KmsError::Unavailable(message) => CredentialError::KeyServiceUnavailable {
				name,
				operation,
				message,
			},
			KmsError::Denied(message) => CredentialError::KeyServiceDenied {
				name,
				operation,
				message,
			},
			KmsError::UnwrapMismatch(message) => match version {
				Some(version) => CredentialError::UnwrapMismatch { name, version },
				None => CredentialError::KeyServiceFault {
					name,
					operation,
					message,
				},
			},
			KmsError::InvalidResponse(message) | KmsError::Configuration(message) => {
				CredentialError::KeyServiceFault {
					name,
					operation,
					message,
				}
			}
		}
	}

	pub(crate) fn from_store(err: StoreError, name: &str, operation: Operation) -> Self {
		CredentialError::Store {
			name: name.to_string(),
			operation,
			source: err,
		}
	}

	pub(crate) fn from_envelope(err: EnvelopeError, name: &str, version: Version) -> Self {
		match err {
			EnvelopeError::Integrity => CredentialError::Integrity {
				name: name.to_string(),
				version,
			},
			other => CredentialError::Envelope {
				name: name.to_string(),
				source: other,
			},
		}
	}
}

impl From<CoreError> for CredentialError {
	fn from(err: CoreError) -> Self {
		match err {
			CoreError::InvalidVersion(m) => CredentialError::InvalidVersion(m),
			CoreError::InvalidName(m) => CredentialError::InvalidName(m),
			other => CredentialError::InvalidName(other.to_string()),
		}
	}
}

/// Errors building a service from configuration.
#[derive(Debug, Error)]
pub enum BootstrapError {
	#[error("failed to build key service client: {0}")]
	Kms(#[from] KmsError),

	#[error("failed to open secret store: {0}")]
	Store(#[from] StoreError),

	#[error("configuration error: {0}")]
	Config(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	fn v(n: u64) -> Version {
		Version::new(n).unwrap()
	}

	#[test]
	fn not_found_message_mentions_version_when_known() {
		let err = CredentialError::NotFound {
			name: "db-pass".into(),
			version: Some(v(3)),
		};
		assert_eq!(err.to_string(), "secret db-pass version 3 not found");

		let err = CredentialError::NotFound {
			name: "db-pass".into(),
			version: None,
		};
		assert_eq!(err.to_string(), "secret db-pass not found");
		assert!(err.is_not_found());
		assert!(!err.is_retryable());
	}

	#[test]
	fn kms_errors_map_by_kind() {
		let unavailable =
			CredentialError::from_kms(KmsError::Unavailable("503".into()), "n", Operation::Put, None);
		assert!(unavailable.is_retryable());
		assert!(matches!(
			unavailable,
			CredentialError::KeyServiceUnavailable {
				operation: Operation::Put,
				..
			}
		));

		let denied =
			CredentialError::from_kms(KmsError::Denied("403".into()), "n", Operation::Get, Some(v(1)));
		assert!(!denied.is_retryable());
		assert!(!denied.is_not_found());

		let mismatch = CredentialError::from_kms(
			KmsError::UnwrapMismatch("x".into()),
			"n",
			Operation::Get,
			Some(v(2)),
		);
		assert!(mismatch.is_integrity_failure());
		assert!(!mismatch.is_not_found());
	}

	#[test]
	fn envelope_integrity_maps_to_integrity() {
		let err = CredentialError::from_envelope(EnvelopeError::Integrity, "n", v(4));
		assert!(matches!(err, CredentialError::Integrity { ref name, version } if name == "n" && version == v(4)));
		assert_eq!(err.secret_name(), Some("n"));
	}

	#[test]
	fn core_errors_map_to_input_errors() {
		let err: CredentialError = CoreError::InvalidName("empty".into()).into();
		assert!(matches!(err, CredentialError::InvalidName(_)));
		assert_eq!(err.secret_name(), None);

		let err: CredentialError = CoreError::InvalidVersion("0".into()).into();
		assert!(matches!(err, CredentialError::InvalidVersion(_)));
	}
}
