// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use strongbox_common_core::{SecretName, SecretRecord, SecretSummary, Version};

use crate::error::{StoreError, StoreResult};
use crate::store::VersionedSecretStore;

/// Process-local store. The conditional insert happens under the write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
	records: RwLock<BTreeMap<SecretName, BTreeMap<Version, SecretRecord>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Total number of stored records across all names.
	pub fn len(&self) -> usize {
		self.records.read().values().map(BTreeMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}
}

#[async_trait]
impl VersionedSecretStore for MemoryStore {
	async fn put_if_absent(&self, record: &SecretRecord) -> StoreResult<()> {
		let mut records = self.records.write();
		let versions = records.entry(record.name.clone()).or_default();
		if versions.contains_key(&record.version) {
			return Err(StoreError::VersionExists {
				name: record.name.to_string(),
				version: record.version,
			});
		}
		versions.insert(record.version, record.clone());
		Ok(())
	}

	async fn get(&self, name: &SecretName, version: Version) -> StoreResult<Option<SecretRecord>> {
		Ok(self
			.records
			.read()
			.get(name)
			.and_then(|versions| versions.get(&version))
			.cloned())
	}

	async fn get_latest(&self, name: &SecretName) -> StoreResult<Option<SecretRecord>> {
		Ok(self
			.records
			.read()
			.get(name)
			.and_then(|versions| versions.last_key_value())
			.map(|(_, record)| record.clone()))
	}

	async fn list_versions(&self, name: &SecretName) -> StoreResult<Vec<Version>> {
		Ok(self
			.records
			.read()
			.get(name)
			.map(|versions| versions.keys().copied().collect())
			.unwrap_or_default())
	}

	async fn delete(&self, name: &SecretName, version: Version) -> StoreResult<bool> {
		let mut records = self.records.write();
		let Some(versions) = records.get_mut(name) else {
			return Ok(false);
		};
		let removed = versions.remove(&version).is_some();
		if versions.is_empty() {
			records.remove(name);
		}
		Ok(removed)
	}

	async fn delete_all(&self, name: &SecretName) -> StoreResult<u64> {
		Ok(self
			.records
			.write()
			.remove(name)
			.map(|versions| versions.len() as u64)
			.unwrap_or(0))
	}

	async fn list_names(&self) -> StoreResult<Vec<SecretSummary>> {
		Ok(self
			.records
			.read()
			.iter()
			.filter_map(|(name, versions)| {
				versions.last_key_value().map(|(version, _)| SecretSummary {
					name: name.clone(),
					latest_version: *version,
				})
			})
			.collect())
	}
}
