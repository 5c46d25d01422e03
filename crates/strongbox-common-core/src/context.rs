// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Encryption context: authenticated, non-secret key/value pairs bound to a
//! record's integrity tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// String-to-string map authenticated alongside a ciphertext.
///
/// Backed by a `BTreeMap` so iteration order is the canonical (sorted) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptionContext(BTreeMap<String, String>);

impl EncryptionContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(key.into(), value.into())
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Unambiguous byte encoding used as MAC input.
	///
	/// `be32(count)` followed by `be32(len(k)) || k || be32(len(v)) || v` for
	/// each entry in key order.
	pub fn canonical_bytes(&self) -> Vec<u8> {
		let body: usize = self.0.iter().map(|(k, v)| 8 + k.len() + v.len()).sum();
		let mut out = Vec::with_capacity(4 + body);
		out.extend_from_slice(&(self.0.len() as u32).to_be_bytes());
		for (key, value) in &self.0 {
			out.extend_from_slice(&(key.len() as u32).to_be_bytes());
			out.extend_from_slice(key.as_bytes());
			out.extend_from_slice(&(value.len() as u32).to_be_bytes());
			out.extend_from_slice(value.as_bytes());
		}
		out
	}

	pub fn to_json(&self) -> CoreResult<String> {
		serde_json::to_string(&self.0).map_err(|e| CoreError::InvalidContext(e.to_string()))
	}

	pub fn from_json(json: &str) -> CoreResult<Self> {
		serde_json::from_str(json)
			.map(Self)
			.map_err(|e| CoreError::InvalidContext(e.to_string()))
	}
}

impl From<BTreeMap<String, String>> for EncryptionContext {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}

impl<K, V> FromIterator<(K, V)> for EncryptionContext
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn empty_context_encodes_count_only() {
		assert_eq!(EncryptionContext::new().canonical_bytes(), vec![0, 0, 0, 0]);
	}

	#[test]
	fn canonical_bytes_layout() {
		let ctx = EncryptionContext::new().with("env", "prod");
		let mut expected = vec![0, 0, 0, 1];
		expected.extend_from_slice(&[0, 0, 0, 3]);
		expected.extend_from_slice(b"env");
		expected.extend_from_slice(&[0, 0, 0, 4]);
		expected.extend_from_slice(b"prod");
		assert_eq!(ctx.canonical_bytes(), expected);
	}

	#[test]
	fn insertion_order_does_not_matter() {
		let a = EncryptionContext::new().with("b", "2").with("a", "1");
		let b = EncryptionContext::new().with("a", "1").with("b", "2");
		assert_eq!(a.canonical_bytes(), b.canonical_bytes());
	}

	#[test]
	fn shifting_bytes_between_key_and_value_changes_encoding() {
		let a = EncryptionContext::new().with("ab", "c");
		let b = EncryptionContext::new().with("a", "bc");
		assert_ne!(a.canonical_bytes(), b.canonical_bytes());
	}

	#[test]
	fn json_round_trip_and_rejects_non_strings() {
		let ctx = EncryptionContext::new().with("app", "billing").with("env", "prod");
		let json = ctx.to_json().unwrap();
		assert_eq!(json, r#"{"app":"billing","env":"prod"}"#);
		assert_eq!(EncryptionContext::from_json(&json).unwrap(), ctx);
		assert!(matches!(
			EncryptionContext::from_json(r#"{"n":1}"#),
			Err(CoreError::InvalidContext(_))
		));
	}

	proptest! {
		#[test]
		fn distinct_contexts_encode_distinctly(
			a in proptest::collection::btree_map("[a-z]{0,6}", "[a-z]{0,6}", 0..4),
			b in proptest::collection::btree_map("[a-z]{0,6}", "[a-z]{0,6}", 0..4),
		) {
			let ca = EncryptionContext::from(a.clone());
			let cb = EncryptionContext::from(b.clone());
			prop_assert_eq!(ca.canonical_bytes() == cb.canonical_bytes(), a == b);
		}
	}
}
