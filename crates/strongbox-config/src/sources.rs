// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use strongbox_common_core::DigestAlgorithm;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::StrongboxConfigLayer;
use crate::sections::{
	EnvelopeConfigLayer, KmsConfigLayer, KmsKind, LogFormat, LoggingConfigLayer, RetryConfigLayer,
	StoreConfigLayer, StoreKind,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<StrongboxConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<StrongboxConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(StrongboxConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/strongbox/strongbox.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<StrongboxConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(StrongboxConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: StrongboxConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: STRONGBOX_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<StrongboxConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(StrongboxConfigLayer {
			store: Some(load_store_from_env()?),
			kms: Some(load_kms_from_env()?),
			retry: Some(load_retry_from_env()?),
			envelope: Some(load_envelope_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T>(name: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|e| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("'{v}': {e}"),
		}),
		None => Ok(None),
	}
}

fn load_store_from_env() -> Result<StoreConfigLayer, ConfigError> {
	Ok(StoreConfigLayer {
		backend: env_parse::<StoreKind>("STRONGBOX_STORE_BACKEND")?,
		url: env_var("STRONGBOX_STORE_URL"),
	})
}

fn load_kms_from_env() -> Result<KmsConfigLayer, ConfigError> {
	Ok(KmsConfigLayer {
		backend: env_parse::<KmsKind>("STRONGBOX_KMS_BACKEND")?,
		key_id: env_var("STRONGBOX_KMS_KEY_ID"),
		endpoint: env_var("STRONGBOX_KMS_ENDPOINT"),
		timeout_secs: env_parse::<u64>("STRONGBOX_KMS_TIMEOUT_SECS")?,
	})
}

fn load_retry_from_env() -> Result<RetryConfigLayer, ConfigError> {
	Ok(RetryConfigLayer {
		write_attempts: env_parse::<u32>("STRONGBOX_RETRY_WRITE_ATTEMPTS")?,
		key_service_attempts: env_parse::<u32>("STRONGBOX_RETRY_KEY_SERVICE_ATTEMPTS")?,
		base_delay_ms: env_parse::<u64>("STRONGBOX_RETRY_BASE_DELAY_MS")?,
		max_delay_ms: env_parse::<u64>("STRONGBOX_RETRY_MAX_DELAY_MS")?,
		jitter: env_bool("STRONGBOX_RETRY_JITTER"),
	})
}

fn load_envelope_from_env() -> Result<EnvelopeConfigLayer, ConfigError> {
	Ok(EnvelopeConfigLayer {
		digest: env_parse::<DigestAlgorithm>("STRONGBOX_ENVELOPE_DIGEST")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("STRONGBOX_LOG_LEVEL"),
		format: env_parse::<LogFormat>("STRONGBOX_LOG_FORMAT")?,
	})
}
