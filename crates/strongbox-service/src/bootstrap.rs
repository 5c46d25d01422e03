// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire a [`CredentialService`] from resolved configuration.

use std::sync::Arc;

use strongbox_config::{KmsConfig, KmsKind, StoreConfig, StoreKind, StrongboxConfig};
use strongbox_kms::{HttpKms, HttpKmsConfig, KmsBackend, SoftwareKms};
use strongbox_store::{create_pool, MemoryStore, SqliteStore, StoreBackend};
use tracing::info;

use crate::error::BootstrapError;
use crate::service::{CredentialService, ServiceOptions};

/// Service over whichever backends configuration selected.
pub type ConfiguredCredentialService = CredentialService<KmsBackend, StoreBackend>;

/// Build the key service client, open and migrate the store, and assemble
/// the service.
pub async fn build_service(
	config: &StrongboxConfig,
) -> Result<ConfiguredCredentialService, BootstrapError> {
	let kms = build_kms(&config.kms)?;
	let store = build_store(&config.store).await?;

	info!(
		kms_backend = kms.kind(),
		store_backend = store.kind(),
		"credential service ready"
	);

	Ok(CredentialService::with_options(
		Arc::new(kms),
		Arc::new(store),
		service_options(config),
	))
}

pub fn service_options(config: &StrongboxConfig) -> ServiceOptions {
	ServiceOptions {
		digest: config.envelope.digest,
		write_attempts: config.retry.write_attempts,
		key_service_retry: config.retry.key_service_policy(),
	}
}

pub fn build_kms(config: &KmsConfig) -> Result<KmsBackend, BootstrapError> {
	match config.backend {
		KmsKind::Software => {
			let master_key = config.master_key.as_ref().ok_or_else(|| {
				BootstrapError::Config("software key service requires a master key".to_string())
			})?;
			Ok(SoftwareKms::from_base64(config.key_id.clone(), master_key)?.into())
		}
		KmsKind::Http => {
			let endpoint = config.endpoint.clone().ok_or_else(|| {
				BootstrapError::Config("http key service requires an endpoint".to_string())
			})?;
			Ok(HttpKms::new(HttpKmsConfig {
				endpoint,
				key_id: config.key_id.clone(),
				auth_token: config.auth_token.clone(),
				timeout: config.timeout(),
			})?
			.into())
		}
	}
}

pub async fn build_store(config: &StoreConfig) -> Result<StoreBackend, BootstrapError> {
	let store: StoreBackend = match config.backend {
		StoreKind::Memory => MemoryStore::new().into(),
		StoreKind::Sqlite => SqliteStore::new(create_pool(&config.url).await?).into(),
	};
	store.migrate().await?;
	Ok(store)
}
