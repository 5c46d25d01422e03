// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use strongbox_common_core::SecretName;
use strongbox_envelope::DataKey;

use crate::client::{GeneratedDataKey, MasterKeyClient};
use crate::error::KmsResult;
use crate::http::HttpKms;
use crate::software::SoftwareKms;

/// Master key client chosen from configuration.
#[derive(Debug)]
pub enum KmsBackend {
	Software(SoftwareKms),
	Http(HttpKms),
}

impl KmsBackend {
	pub fn kind(&self) -> &'static str {
		match self {
			KmsBackend::Software(_) => "software",
			KmsBackend::Http(_) => "http",
		}
	}
}

impl From<SoftwareKms> for KmsBackend {
	fn from(kms: SoftwareKms) -> Self {
		KmsBackend::Software(kms)
	}
}

impl From<HttpKms> for KmsBackend {
	fn from(kms: HttpKms) -> Self {
		KmsBackend::Http(kms)
	}
}

#[async_trait]
impl MasterKeyClient for KmsBackend {
	async fn generate_data_key(&self, name: &SecretName) -> KmsResult<GeneratedDataKey> {
		match self {
			KmsBackend::Software(kms) => kms.generate_data_key(name).await,
			KmsBackend::Http(kms) => kms.generate_data_key(name).await,
		}
	}

	async fn unwrap_data_key(&self, name: &SecretName, wrapped_key: &[u8]) -> KmsResult<DataKey> {
		match self {
			KmsBackend::Software(kms) => kms.unwrap_data_key(name, wrapped_key).await,
			KmsBackend::Http(kms) => kms.unwrap_data_key(name, wrapped_key).await,
		}
	}
}
