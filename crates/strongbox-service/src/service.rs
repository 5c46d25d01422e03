// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential service orchestrating the key service, envelope and store.
//!
//! A `put` moves through these states, each emitted as a tracing event with
//! a `state` field:
//!
//! ```text
//! START -> KEY_REQUESTED -> ENCRYPTED -> VERSION_RESOLVED -> WRITTEN
//!                ^                              |
//!                +-------- RETRY_VERSION <------+  (VersionExists)
//! ```
//!
//! The loop is bounded by [`ServiceOptions::write_attempts`]. Exhausting it
//! yields [`CredentialError::WriteConflict`].

use std::sync::Arc;

use chrono::Utc;
use strongbox_common_core::{
	DigestAlgorithm, EncryptionContext, SecretName, SecretRecord, SecretSummary, Version,
	VersionSelector,
};
use strongbox_common_http::{retry, RetryConfig};
use strongbox_common_secret::SecretBytes;
use strongbox_envelope::{decrypt, encrypt_with_digest, DataKey};
use strongbox_kms::MasterKeyClient;
use strongbox_store::{StoreError, VersionedSecretStore};
use tracing::{debug, info, instrument, warn};

use crate::error::{CredentialError, CredentialResult, Operation};

/// Tunables for [`CredentialService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
	/// Digest used for new records. Reads use the digest stored on the record.
	pub digest: DigestAlgorithm,
	/// Conditional-write attempts per `put` before giving up.
	pub write_attempts: u32,
	/// Backoff policy for transient key service failures.
	pub key_service_retry: RetryConfig,
}

impl Default for ServiceOptions {
	fn default() -> Self {
		Self {
			digest: DigestAlgorithm::default(),
			write_attempts: 5,
			key_service_retry: RetryConfig::default(),
		}
	}
}

/// Versioned, envelope-encrypted credential storage.
///
/// Holds no per-call state; share it behind an `Arc` across tasks.
pub struct CredentialService<K: MasterKeyClient, S: VersionedSecretStore> {
	kms: Arc<K>,
	store: Arc<S>,
	options: ServiceOptions,
}

impl<K: MasterKeyClient, S: VersionedSecretStore> std::fmt::Debug for CredentialService<K, S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CredentialService")
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

impl<K: MasterKeyClient, S: VersionedSecretStore> CredentialService<K, S> {
	pub fn new(kms: Arc<K>, store: Arc<S>) -> Self {
		Self::with_options(kms, store, ServiceOptions::default())
	}

	pub fn with_options(kms: Arc<K>, store: Arc<S>, options: ServiceOptions) -> Self {
		Self {
			kms,
			store,
			options,
		}
	}

	pub fn options(&self) -> &ServiceOptions {
		&self.options
	}

	pub fn kms(&self) -> &Arc<K> {
		&self.kms
	}

	pub fn store(&self) -> &Arc<S> {
		&self.store
	}

	/// Store `plaintext` as the next version of `name`.
	///
	/// Every attempt uses a freshly generated data key; no key ever encrypts
	/// two records.
	///
	/// # Cancellation
	/// Dropping the future before the conditional write is issued leaves no
	/// record behind. Once the write has been issued the record may persist
	/// even though the caller never sees the returned version.
	#[instrument(skip(self, plaintext, context), fields(name = %name))]
	pub async fn put(
		&self,
		name: &str,
		plaintext: &[u8],
		context: &EncryptionContext,
	) -> CredentialResult<Version> {
		let name = parse_name(name)?;
		self.put_inner(&name, plaintext, context, Operation::Put).await
	}

	/// Read and decrypt one version of `name`.
	///
	/// `context` must equal the context the version was written with.
	#[instrument(skip(self, context), fields(name = %name, selector = %selector))]
	pub async fn get(
		&self,
		name: &str,
		selector: VersionSelector,
		context: &EncryptionContext,
	) -> CredentialResult<SecretBytes> {
		let name = parse_name(name)?;
		let record = self.resolve(&name, selector, Operation::Get).await?;
		self.open(&record, context, Operation::Get).await
	}

	/// Re-encrypt the latest plaintext under a fresh data key as a new version.
	///
	/// Prior versions are kept.
	#[instrument(skip(self, context), fields(name = %name))]
	pub async fn rotate(&self, name: &str, context: &EncryptionContext) -> CredentialResult<Version> {
		let name = parse_name(name)?;
		let record = self
			.resolve(&name, VersionSelector::Latest, Operation::Rotate)
			.await?;
		let plaintext = self.open(&record, context, Operation::Rotate).await?;

		let version = self
			.put_inner(&name, plaintext.expose(), context, Operation::Rotate)
			.await?;
		info!(from = %record.version, to = %version, "rotated secret");
		Ok(version)
	}

	/// Versions of `name`, ascending. Empty if the name has none.
	#[instrument(skip(self), fields(name = %name))]
	pub async fn list_versions(&self, name: &str) -> CredentialResult<Vec<Version>> {
		let name = parse_name(name)?;
		self.store
			.list_versions(&name)
			.await
			.map_err(|e| CredentialError::from_store(e, name.as_str(), Operation::ListVersions))
	}

	/// Delete one version. Returns whether it existed.
	#[instrument(skip(self), fields(name = %name, version = %version))]
	pub async fn delete(&self, name: &str, version: Version) -> CredentialResult<bool> {
		let name = parse_name(name)?;
		let deleted = self
			.store
			.delete(&name, version)
			.await
			.map_err(|e| CredentialError::from_store(e, name.as_str(), Operation::Delete))?;

		if deleted {
			info!("deleted secret version");
		}
		Ok(deleted)
	}

	/// Delete every version of `name`. Returns how many were removed.
	#[instrument(skip(self), fields(name = %name))]
	pub async fn delete_all(&self, name: &str) -> CredentialResult<u64> {
		let name = parse_name(name)?;
		let removed = self
			.store
			.delete_all(&name)
			.await
			.map_err(|e| CredentialError::from_store(e, name.as_str(), Operation::DeleteAll))?;

		info!(removed, "deleted all secret versions");
		Ok(removed)
	}

	/// Every stored name with its latest version, ordered by name.
	#[instrument(skip(self))]
	pub async fn list(&self) -> CredentialResult<Vec<SecretSummary>> {
		self.store
			.list_names()
			.await
			.map_err(|e| CredentialError::from_store(e, "*", Operation::List))
	}

	/// Decrypt the latest version of every name with the same context.
	///
	/// Names deleted between listing and reading are skipped. Any other
	/// failure aborts the whole call.
	#[instrument(skip(self, context))]
	pub async fn get_all(
		&self,
		context: &EncryptionContext,
	) -> CredentialResult<Vec<(SecretName, SecretBytes)>> {
		let summaries = self
			.store
			.list_names()
			.await
			.map_err(|e| CredentialError::from_store(e, "*", Operation::GetAll))?;

		let mut secrets = Vec::with_capacity(summaries.len());
		for summary in summaries {
			let record = match self
				.resolve(&summary.name, VersionSelector::Latest, Operation::GetAll)
				.await
			{
				Ok(record) => record,
				Err(e) if e.is_not_found() => {
					debug!(name = %summary.name, "secret vanished while listing, skipping");
					continue;
				}
				Err(e) => return Err(e),
			};
			let plaintext = self.open(&record, context, Operation::GetAll).await?;
			secrets.push((summary.name, plaintext));
		}

		Ok(secrets)
	}

	async fn put_inner(
		&self,
		name: &SecretName,
		plaintext: &[u8],
		context: &EncryptionContext,
		operation: Operation,
	) -> CredentialResult<Version> {
		let attempts = self.options.write_attempts.max(1);
		debug!(state = "START", attempts, "writing secret");

		for attempt in 1..=attempts {
			let record = self
				.seal(name, plaintext, context, operation, attempt)
				.await?;

			match self.store.put_if_absent(&record).await {
				Ok(()) => {
					info!(
						state = "WRITTEN",
						version = %record.version,
						attempt,
						"stored secret version"
					);
					return Ok(record.version);
				}
				Err(StoreError::VersionExists { version, .. }) => {
					debug!(
						state = "RETRY_VERSION",
						version = %version,
						attempt,
						"version taken by a concurrent writer"
					);
				}
				Err(e) => return Err(CredentialError::from_store(e, name.as_str(), operation)),
			}
		}

		warn!(attempts, "giving up after repeated version conflicts");
		Err(CredentialError::WriteConflict {
			name: name.to_string(),
			attempts,
		})
	}

	/// Build the record for one write attempt with a fresh data key.
	async fn seal(
		&self,
		name: &SecretName,
		plaintext: &[u8],
		context: &EncryptionContext,
		operation: Operation,
		attempt: u32,
	) -> CredentialResult<SecretRecord> {
		let generated = retry(&self.options.key_service_retry, || {
			self.kms.generate_data_key(name)
		})
		.await
		.map_err(|e| CredentialError::from_kms(e, name.as_str(), operation, None))?;
		debug!(state = "KEY_REQUESTED", attempt);

		let sealed = encrypt_with_digest(&generated.plaintext, plaintext, context, self.options.digest);
		let wrapped_key = generated.wrapped_key;
		drop(generated.plaintext);
		let sealed = sealed.map_err(|e| CredentialError::Envelope {
			name: name.to_string(),
			source: e,
		})?;
		debug!(state = "ENCRYPTED", attempt, digest = %sealed.digest);

		let version = self.next_version(name, operation).await?;
		debug!(state = "VERSION_RESOLVED", version = %version, attempt);

		Ok(SecretRecord {
			name: name.clone(),
			version,
			ciphertext: sealed.ciphertext,
			wrapped_key,
			hmac_tag: sealed.hmac_tag,
			digest: sealed.digest,
			context: context.clone(),
			created_at: Utc::now(),
		})
	}

	async fn next_version(&self, name: &SecretName, operation: Operation) -> CredentialResult<Version> {
		let latest = self
			.store
			.get_latest(name)
			.await
			.map_err(|e| CredentialError::from_store(e, name.as_str(), operation))?;

		match latest {
			Some(record) => Ok(record.version.next()?),
			None => Ok(Version::FIRST),
		}
	}

	async fn resolve(
		&self,
		name: &SecretName,
		selector: VersionSelector,
		operation: Operation,
	) -> CredentialResult<SecretRecord> {
		let found = match selector {
			VersionSelector::Latest => self.store.get_latest(name).await,
			VersionSelector::Exact(v) => self.store.get(name, v).await,
		}
		.map_err(|e| CredentialError::from_store(e, name.as_str(), operation))?;

		found.ok_or_else(|| CredentialError::NotFound {
			name: name.to_string(),
			version: match selector {
				VersionSelector::Latest => None,
				VersionSelector::Exact(v) => Some(v),
			},
		})
	}

	/// Unwrap the record's key and decrypt under the caller's context.
	async fn open(
		&self,
		record: &SecretRecord,
		context: &EncryptionContext,
		operation: Operation,
	) -> CredentialResult<SecretBytes> {
		let key: DataKey = retry(&self.options.key_service_retry, || {
			self.kms.unwrap_data_key(&record.name, &record.wrapped_key)
		})
		.await
		.map_err(|e| {
			CredentialError::from_kms(e, record.name.as_str(), operation, Some(record.version))
		})?;

		let opened = decrypt(
			&key,
			&record.ciphertext,
			&record.hmac_tag,
			context,
			record.digest,
		);
		drop(key);

		opened.map_err(|e| {
			if matches!(e, strongbox_envelope::EnvelopeError::Integrity) {
				warn!(
					name = %record.name,
					version = %record.version,
					"integrity check failed"
				);
			}
			CredentialError::from_envelope(e, record.name.as_str(), record.version)
		})
	}
}

fn parse_name(name: &str) -> CredentialResult<SecretName> {
	SecretName::new(name).map_err(CredentialError::from)
}
