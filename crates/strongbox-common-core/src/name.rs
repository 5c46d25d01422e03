// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const MAX_NAME_LEN: usize = 256;

/// A validated secret name: 1 to 256 bytes, no control characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretName(String);

impl SecretName {
	pub fn new(name: impl Into<String>) -> CoreResult<Self> {
		let name = name.into();
		if name.is_empty() {
			return Err(CoreError::InvalidName("name must not be empty".into()));
		}
		if name.len() > MAX_NAME_LEN {
			return Err(CoreError::InvalidName(format!(
				"name is {} bytes, maximum is {MAX_NAME_LEN}",
				name.len()
			)));
		}
		if name.chars().any(char::is_control) {
			return Err(CoreError::InvalidName(
				"name must not contain control characters".into(),
			));
		}
		Ok(Self(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl AsRef<str> for SecretName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SecretName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for SecretName {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<String> for SecretName {
	type Error = CoreError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl TryFrom<&str> for SecretName {
	type Error = CoreError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<SecretName> for String {
	fn from(name: SecretName) -> Self {
		name.0
	}
}
