// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Master key client configuration section.
//!
//! The master key and bearer token are never read from TOML; they come from
//! `STRONGBOX_KMS_MASTER_KEY` and `STRONGBOX_KMS_AUTH_TOKEN` (or their `_FILE`
//! variants).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strongbox_common_secret::SecretString;

fn default_key_id() -> String {
	"alias/strongbox".to_string()
}

fn default_timeout_secs() -> u64 {
	10
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KmsKind {
	#[default]
	Software,
	Http,
}

impl fmt::Display for KmsKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			KmsKind::Software => write!(f, "software"),
			KmsKind::Http => write!(f, "http"),
		}
	}
}

impl FromStr for KmsKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"software" => Ok(KmsKind::Software),
			"http" => Ok(KmsKind::Http),
			other => Err(format!("unknown kms backend '{other}', expected software or http")),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KmsConfigLayer {
	pub backend: Option<KmsKind>,
	pub key_id: Option<String>,
	pub endpoint: Option<String>,
	pub timeout_secs: Option<u64>,
}

/// Secret inputs for the KMS section, loaded outside the layer merge.
#[derive(Debug, Clone, Default)]
pub struct KmsSecrets {
	pub master_key: Option<SecretString>,
	pub auth_token: Option<SecretString>,
}

impl KmsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.key_id.is_some() {
			self.key_id = other.key_id;
		}
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self, secrets: KmsSecrets) -> KmsConfig {
		KmsConfig {
			backend: self.backend.unwrap_or_default(),
			key_id: self.key_id.unwrap_or_else(default_key_id),
			endpoint: self.endpoint,
			timeout_secs: self.timeout_secs.unwrap_or_else(default_timeout_secs),
			master_key: secrets.master_key,
			auth_token: secrets.auth_token,
		}
	}
}

#[derive(Debug, Clone)]
pub struct KmsConfig {
	pub backend: KmsKind,
	pub key_id: String,
	pub endpoint: Option<String>,
	pub timeout_secs: u64,
	/// Base64 32-byte KEK for the software backend.
	pub master_key: Option<SecretString>,
	/// Bearer token for the HTTP backend.
	pub auth_token: Option<SecretString>,
}

impl KmsConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl Default for KmsConfig {
	fn default() -> Self {
		KmsConfigLayer::default().finalize(KmsSecrets::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = KmsConfig::default();
		assert_eq!(config.backend, KmsKind::Software);
		assert_eq!(config.key_id, "alias/strongbox");
		assert_eq!(config.timeout(), Duration::from_secs(10));
		assert!(config.endpoint.is_none());
		assert!(config.master_key.is_none());
	}

	#[test]
	fn toml_cannot_carry_secrets() {
		let layer: KmsConfigLayer = toml::from_str(
			r#"
backend = "http"
endpoint = "https://kms.internal"
master_key = "ignored"
"#,
		)
		.unwrap();
		let config = layer.finalize(KmsSecrets::default());
		assert_eq!(config.backend, KmsKind::Http);
		assert_eq!(config.endpoint.as_deref(), Some("https://kms.internal"));
		assert!(config.master_key.is_none());
	}

	#[test]
	fn debug_redacts_secrets() {
		let config = KmsConfigLayer::default().finalize(KmsSecrets {
			master_key: Some(SecretString::new("kek-material".into())),
			auth_token: Some(SecretString::new("bearer-material".into())),
		});
		let rendered = format!("{config:?}");
		assert!(!rendered.contains("kek-material"));
		assert!(!rendered.contains("bearer-material"));
	}
}
