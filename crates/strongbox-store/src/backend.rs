// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use strongbox_common_core::{SecretName, SecretRecord, SecretSummary, Version};

use crate::error::StoreResult;
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;
use crate::store::VersionedSecretStore;

/// Store chosen from configuration.
#[derive(Debug)]
pub enum StoreBackend {
	Memory(MemoryStore),
	Sqlite(SqliteStore),
}

impl StoreBackend {
	pub fn kind(&self) -> &'static str {
		match self {
			StoreBackend::Memory(_) => "memory",
			StoreBackend::Sqlite(_) => "sqlite",
		}
	}

	/// Prepare the backend for use. No-op for the memory store.
	pub async fn migrate(&self) -> StoreResult<()> {
		match self {
			StoreBackend::Memory(_) => Ok(()),
			StoreBackend::Sqlite(store) => store.migrate().await,
		}
	}
}

impl From<MemoryStore> for StoreBackend {
	fn from(store: MemoryStore) -> Self {
		StoreBackend::Memory(store)
	}
}

impl From<SqliteStore> for StoreBackend {
	fn from(store: SqliteStore) -> Self {
		StoreBackend::Sqlite(store)
	}
}

#[async_trait]
impl VersionedSecretStore for StoreBackend {
	async fn put_if_absent(&self, record: &SecretRecord) -> StoreResult<()> {
		match self {
			StoreBackend::Memory(s) => s.put_if_absent(record).await,
			StoreBackend::Sqlite(s) => s.put_if_absent(record).await,
		}
	}

	async fn get(&self, name: &SecretName, version: Version) -> StoreResult<Option<SecretRecord>> {
		match self {
			StoreBackend::Memory(s) => s.get(name, version).await,
			StoreBackend::Sqlite(s) => s.get(name, version).await,
		}
	}

	async fn get_latest(&self, name: &SecretName) -> StoreResult<Option<SecretRecord>> {
		match self {
			StoreBackend::Memory(s) => s.get_latest(name).await,
			StoreBackend::Sqlite(s) => s.get_latest(name).await,
		}
	}

	async fn list_versions(&self, name: &SecretName) -> StoreResult<Vec<Version>> {
		match self {
			StoreBackend::Memory(s) => s.list_versions(name).await,
			StoreBackend::Sqlite(s) => s.list_versions(name).await,
		}
	}

	async fn delete(&self, name: &SecretName, version: Version) -> StoreResult<bool> {
		match self {
			StoreBackend::Memory(s) => s.delete(name, version).await,
			StoreBackend::Sqlite(s) => s.delete(name, version).await,
		}
	}

	async fn delete_all(&self, name: &SecretName) -> StoreResult<u64> {
		match self {
			StoreBackend::Memory(s) => s.delete_all(name).await,
			StoreBackend::Sqlite(s) => s.delete_all(name).await,
		}
	}

	async fn list_names(&self) -> StoreResult<Vec<SecretSummary>> {
		match self {
			StoreBackend::Memory(s) => s.list_names().await,
			StoreBackend::Sqlite(s) => s.list_names().await,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::conformance;

	#[tokio::test]
	async fn memory_variant_delegates() {
		let store = StoreBackend::from(MemoryStore::new());
		assert_eq!(store.kind(), "memory");
		store.migrate().await.unwrap();
		conformance::latest_and_versions_follow_numeric_order(&store).await;
	}

	#[tokio::test]
	async fn sqlite_variant_migrates_and_delegates() {
		let pool = crate::create_pool("sqlite::memory:").await.unwrap();
		let store = StoreBackend::from(SqliteStore::new(pool));
		assert_eq!(store.kind(), "sqlite");
		store.migrate().await.unwrap();
		conformance::list_names_reports_latest(&store).await;
	}
}
