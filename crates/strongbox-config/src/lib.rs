// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Strongbox.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`STRONGBOX_*`)
//! - Secrets loaded only from the environment, with `*_FILE` support
//!
//! # Usage
//!
//! ```ignore
//! use strongbox_config::load_config;
//!
//! let config = load_config()?;
//! println!("store backend: {}", config.store.backend);
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::StrongboxConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved Strongbox configuration.
#[derive(Debug, Clone, Default)]
pub struct StrongboxConfig {
	pub store: StoreConfig,
	pub kms: KmsConfig,
	pub retry: RetryConfig,
	pub envelope: EnvelopeConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`STRONGBOX_*`)
/// 2. Config file (`/etc/strongbox/strongbox.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<StrongboxConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<StrongboxConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<StrongboxConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<StrongboxConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = StrongboxConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged, load_kms_secrets()?)
}

fn load_kms_secrets() -> Result<KmsSecrets, ConfigError> {
	Ok(KmsSecrets {
		master_key: load_secret_env("STRONGBOX_KMS_MASTER_KEY")?,
		auth_token: load_secret_env("STRONGBOX_KMS_AUTH_TOKEN")?,
	})
}

/// Finalize a merged layer into resolved, validated config.
pub fn finalize(
	layer: StrongboxConfigLayer,
	secrets: KmsSecrets,
) -> Result<StrongboxConfig, ConfigError> {
	let config = StrongboxConfig {
		store: layer.store.unwrap_or_default().finalize(),
		kms: layer.kms.unwrap_or_default().finalize(secrets),
		retry: layer.retry.unwrap_or_default().finalize(),
		envelope: layer.envelope.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		store_backend = %config.store.backend,
		kms_backend = %config.kms.backend,
		key_id = %config.kms.key_id,
		master_key_configured = config.kms.master_key.is_some(),
		auth_token_configured = config.kms.auth_token.is_some(),
		digest = %config.envelope.digest,
		write_attempts = config.retry.write_attempts,
		"Strongbox configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
pub fn validate_config(config: &StrongboxConfig) -> Result<(), ConfigError> {
	match config.kms.backend {
		KmsKind::Software if config.kms.master_key.is_none() => {
			return Err(ConfigError::Validation(
				"kms.backend = \"software\" requires STRONGBOX_KMS_MASTER_KEY or \
				 STRONGBOX_KMS_MASTER_KEY_FILE"
					.to_string(),
			));
		}
		KmsKind::Http if config.kms.endpoint.is_none() => {
			return Err(ConfigError::Validation(
				"kms.backend = \"http\" requires kms.endpoint or STRONGBOX_KMS_ENDPOINT".to_string(),
			));
		}
		_ => {}
	}

	if config.kms.timeout_secs == 0 {
		return Err(ConfigError::InvalidValue {
			key: "kms.timeout_secs".to_string(),
			message: "must be at least 1".to_string(),
		});
	}
	if config.retry.write_attempts == 0 {
		return Err(ConfigError::InvalidValue {
			key: "retry.write_attempts".to_string(),
			message: "must be at least 1".to_string(),
		});
	}
	if config.retry.key_service_attempts == 0 {
		return Err(ConfigError::InvalidValue {
			key: "retry.key_service_attempts".to_string(),
			message: "must be at least 1".to_string(),
		});
	}
	if config.retry.max_delay_ms < config.retry.base_delay_ms {
		return Err(ConfigError::InvalidValue {
			key: "retry.max_delay_ms".to_string(),
			message: format!(
				"{} is below retry.base_delay_ms ({})",
				config.retry.max_delay_ms, config.retry.base_delay_ms
			),
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use strongbox_common_core::DigestAlgorithm;
	use strongbox_common_secret::SecretString;

	fn with_master_key() -> KmsSecrets {
		KmsSecrets {
			master_key: Some(SecretString::new("a2V5".to_string())),
			auth_token: None,
		}
	}

	#[test]
	fn defaults_need_a_master_key() {
		let err = finalize(StrongboxConfigLayer::default(), KmsSecrets::default()).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("MASTER_KEY")));

		let config = finalize(StrongboxConfigLayer::default(), with_master_key()).unwrap();
		assert_eq!(config.store.backend, StoreKind::Sqlite);
		assert_eq!(config.kms.backend, KmsKind::Software);
		assert_eq!(config.envelope.digest, DigestAlgorithm::Sha256);
		assert_eq!(config.retry.write_attempts, 5);
	}

	#[test]
	fn http_backend_needs_endpoint() {
		let layer = StrongboxConfigLayer {
			kms: Some(KmsConfigLayer {
				backend: Some(KmsKind::Http),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer.clone(), KmsSecrets::default()).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("endpoint")));

		let mut layer = layer;
		layer.kms.as_mut().unwrap().endpoint = Some("https://kms.internal".into());
		assert!(finalize(layer, KmsSecrets::default()).is_ok());
	}

	#[test]
	fn zero_attempts_rejected() {
		for retry in [
			RetryConfigLayer {
				write_attempts: Some(0),
				..Default::default()
			},
			RetryConfigLayer {
				key_service_attempts: Some(0),
				..Default::default()
			},
		] {
			let layer = StrongboxConfigLayer {
				retry: Some(retry),
				..Default::default()
			};
			let err = finalize(layer, with_master_key()).unwrap_err();
			assert!(matches!(err, ConfigError::InvalidValue { .. }), "{err:?}");
		}
	}

	#[test]
	fn inverted_delays_rejected() {
		let layer = StrongboxConfigLayer {
			retry: Some(RetryConfigLayer {
				base_delay_ms: Some(500),
				max_delay_ms: Some(100),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer, with_master_key()).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "retry.max_delay_ms"));
	}

	// The only test that sets real STRONGBOX_* variables; keep it that way so
	// parallel tests do not observe each other's environment.
	#[test]
	fn file_then_environment_precedence() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[store]
backend = "memory"
url = "sqlite:/from/file.db"

[kms]
key_id = "alias/from-file"

[envelope]
digest = "SHA384"
"#
		)
		.unwrap();

		std::env::set_var("STRONGBOX_KMS_MASTER_KEY", "a2V5");
		std::env::set_var("STRONGBOX_KMS_KEY_ID", "alias/from-env");
		std::env::set_var("STRONGBOX_LOG_FORMAT", "json");

		let from_file = load_config_with_file(file.path());
		let from_env = load_config_from_env();

		std::env::set_var("STRONGBOX_STORE_BACKEND", "cassandra");
		let bad_env = load_config_from_env();

		for var in [
			"STRONGBOX_KMS_MASTER_KEY",
			"STRONGBOX_KMS_KEY_ID",
			"STRONGBOX_LOG_FORMAT",
			"STRONGBOX_STORE_BACKEND",
		] {
			std::env::remove_var(var);
		}

		let config = from_file.unwrap();
		assert_eq!(config.store.backend, StoreKind::Memory);
		assert_eq!(config.store.url, "sqlite:/from/file.db");
		assert_eq!(config.kms.key_id, "alias/from-env");
		assert_eq!(config.envelope.digest, DigestAlgorithm::Sha384);
		assert_eq!(config.logging.format, LogFormat::Json);
		assert_eq!(config.kms.master_key.as_ref().unwrap().expose(), "a2V5");

		let config = from_env.unwrap();
		assert_eq!(config.store.backend, StoreKind::Sqlite);
		assert_eq!(config.kms.key_id, "alias/from-env");

		assert!(matches!(
			bad_env.unwrap_err(),
			ConfigError::InvalidValue { ref key, .. } if key == "STRONGBOX_STORE_BACKEND"
		));
	}
}
