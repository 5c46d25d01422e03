// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret versions.
//!
//! Versions start at 1 and are persisted as [`VERSION_WIDTH`]-digit
//! zero-padded strings so that a store's lexicographic ordering matches
//! numeric ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// Width of the persisted, zero-padded version string.
pub const VERSION_WIDTH: usize = 19;

const MAX_VERSION: u64 = 9_999_999_999_999_999_999;

/// A secret version number, always in `1..=10^19-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
	pub const FIRST: Version = Version(1);

	pub fn new(n: u64) -> CoreResult<Self> {
		if n == 0 {
			return Err(CoreError::InvalidVersion("versions start at 1".into()));
		}
		if n > MAX_VERSION {
			return Err(CoreError::InvalidVersion(format!(
				"{n} does not fit in {VERSION_WIDTH} digits"
			)));
		}
		Ok(Self(n))
	}

	pub fn get(self) -> u64 {
		self.0
	}

	/// The version after this one.
	pub fn next(self) -> CoreResult<Self> {
		Self::new(self.0 + 1)
	}

	/// The persisted form, e.g. `0000000000000000042`.
	pub fn padded(self) -> String {
		format!("{:0width$}", self.0, width = VERSION_WIDTH)
	}

	/// Parse either the padded form or a plain decimal number.
	pub fn parse(s: &str) -> CoreResult<Self> {
		let s = s.trim();
		if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
			return Err(CoreError::InvalidVersion(format!("'{s}' is not a decimal number")));
		}
		let digits = s.trim_start_matches('0');
		if digits.len() > VERSION_WIDTH {
			return Err(CoreError::InvalidVersion(format!(
				"'{s}' does not fit in {VERSION_WIDTH} digits"
			)));
		}
		let n = if digits.is_empty() {
			0
		} else {
			digits
				.parse::<u64>()
				.map_err(|e| CoreError::InvalidVersion(format!("'{s}': {e}")))?
		};
		Self::new(n)
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for Version {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for Version {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.padded())
	}
}

impl<'de> Deserialize<'de> for Version {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Version::parse(&s).map_err(serde::de::Error::custom)
	}
}

/// Which version of a secret to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionSelector {
	#[default]
	Latest,
	Exact(Version),
}

impl From<Version> for VersionSelector {
	fn from(version: Version) -> Self {
		VersionSelector::Exact(version)
	}
}

impl FromStr for VersionSelector {
	type Err = CoreError;

	/// Accepts `latest` (case-insensitive) or a version number.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.trim().eq_ignore_ascii_case("latest") {
			return Ok(VersionSelector::Latest);
		}
		Version::parse(s).map(VersionSelector::Exact)
	}
}

impl fmt::Display for VersionSelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VersionSelector::Latest => f.write_str("latest"),
			VersionSelector::Exact(v) => write!(f, "{v}"),
		}
	}
}
