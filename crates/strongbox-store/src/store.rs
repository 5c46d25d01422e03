// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use strongbox_common_core::{SecretName, SecretRecord, SecretSummary, Version};

use crate::error::StoreResult;

/// Storage for immutable, versioned secret records.
///
/// `get_latest` must observe every completed `put_if_absent`.
#[async_trait]
pub trait VersionedSecretStore: Send + Sync {
	/// Insert `record` unless `(name, version)` exists, in which case
	/// [`StoreError::VersionExists`](crate::StoreError::VersionExists).
	async fn put_if_absent(&self, record: &SecretRecord) -> StoreResult<()>;

	async fn get(&self, name: &SecretName, version: Version) -> StoreResult<Option<SecretRecord>>;

	async fn get_latest(&self, name: &SecretName) -> StoreResult<Option<SecretRecord>>;

	/// Ascending.
	async fn list_versions(&self, name: &SecretName) -> StoreResult<Vec<Version>>;

	/// Returns whether a record was removed.
	async fn delete(&self, name: &SecretName, version: Version) -> StoreResult<bool>;

	/// Returns the number of records removed.
	async fn delete_all(&self, name: &SecretName) -> StoreResult<u64>;

	/// Every stored name with its highest version, sorted by name.
	async fn list_names(&self) -> StoreResult<Vec<SecretSummary>>;
}

#[async_trait]
impl<T> VersionedSecretStore for Arc<T>
where
	T: VersionedSecretStore + ?Sized,
{
	async fn put_if_absent(&self, record: &SecretRecord) -> StoreResult<()> {
		(**self).put_if_absent(record).await
	}

	async fn get(&self, name: &SecretName, version: Version) -> StoreResult<Option<SecretRecord>> {
		(**self).get(name, version).await
	}

	async fn get_latest(&self, name: &SecretName) -> StoreResult<Option<SecretRecord>> {
		(**self).get_latest(name).await
	}

	async fn list_versions(&self, name: &SecretName) -> StoreResult<Vec<Version>> {
		(**self).list_versions(name).await
	}

	async fn delete(&self, name: &SecretName, version: Version) -> StoreResult<bool> {
		(**self).delete(name, version).await
	}

	async fn delete_all(&self, name: &SecretName) -> StoreResult<u64> {
		(**self).delete_all(name).await
	}

	async fn list_names(&self) -> StoreResult<Vec<SecretSummary>> {
		(**self).list_names().await
	}
}
