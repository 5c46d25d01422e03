// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret store configuration section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

fn default_url() -> String {
	"sqlite:./strongbox.db".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
	Memory,
	#[default]
	Sqlite,
}

impl fmt::Display for StoreKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StoreKind::Memory => write!(f, "memory"),
			StoreKind::Sqlite => write!(f, "sqlite"),
		}
	}
}

impl FromStr for StoreKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"memory" => Ok(StoreKind::Memory),
			"sqlite" => Ok(StoreKind::Sqlite),
			other => Err(format!("unknown store backend '{other}', expected memory or sqlite")),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfigLayer {
	pub backend: Option<StoreKind>,
	pub url: Option<String>,
}

impl StoreConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.url.is_some() {
			self.url = other.url;
		}
	}

	pub fn finalize(self) -> StoreConfig {
		StoreConfig {
			backend: self.backend.unwrap_or_default(),
			url: self.url.unwrap_or_else(default_url),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
	pub backend: StoreKind,
	pub url: String,
}

impl Default for StoreConfig {
	fn default() -> Self {
		StoreConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_sqlite_file() {
		let config = StoreConfig::default();
		assert_eq!(config.backend, StoreKind::Sqlite);
		assert_eq!(config.url, "sqlite:./strongbox.db");
	}

	#[test]
	fn deserialize_partial_layer() {
		let layer: StoreConfigLayer = toml::from_str(r#"backend = "memory""#).unwrap();
		assert_eq!(layer.backend, Some(StoreKind::Memory));
		assert!(layer.url.is_none());
	}

	#[test]
	fn merge_overwrites_only_set_fields() {
		let mut base = StoreConfigLayer {
			backend: Some(StoreKind::Sqlite),
			url: Some("sqlite:/var/lib/strongbox.db".into()),
		};
		base.merge(StoreConfigLayer {
			backend: Some(StoreKind::Memory),
			url: None,
		});
		assert_eq!(base.backend, Some(StoreKind::Memory));
		assert_eq!(base.url.as_deref(), Some("sqlite:/var/lib/strongbox.db"));
	}

	#[test]
	fn parse_kind() {
		assert_eq!("SQLite".parse::<StoreKind>().unwrap(), StoreKind::Sqlite);
		assert!("dynamodb".parse::<StoreKind>().is_err());
	}
}
