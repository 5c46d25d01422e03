// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use strongbox_common_core::SecretName;
use strongbox_envelope::DataKey;

use crate::error::KmsResult;

/// A fresh data key and its wrapped form.
#[derive(Debug)]
pub struct GeneratedDataKey {
	pub plaintext: DataKey,
	pub wrapped_key: Vec<u8>,
}

/// Trait for master key operations.
///
/// Implementations must not cache plaintext key material.
#[async_trait]
pub trait MasterKeyClient: Send + Sync {
	/// Issue a new 64-byte data key bound to `name`.
	async fn generate_data_key(&self, name: &SecretName) -> KmsResult<GeneratedDataKey>;

	/// Recover the data key from `wrapped_key`. Fails with
	/// [`KmsError::UnwrapMismatch`](crate::KmsError::UnwrapMismatch) if it was
	/// wrapped for a different name or master key.
	async fn unwrap_data_key(&self, name: &SecretName, wrapped_key: &[u8]) -> KmsResult<DataKey>;
}

#[async_trait]
impl<T> MasterKeyClient for Arc<T>
where
	T: MasterKeyClient + ?Sized,
{
	async fn generate_data_key(&self, name: &SecretName) -> KmsResult<GeneratedDataKey> {
		(**self).generate_data_key(name).await
	}

	async fn unwrap_data_key(&self, name: &SecretName, wrapped_key: &[u8]) -> KmsResult<DataKey> {
		(**self).unwrap_data_key(name, wrapped_key).await
	}
}
