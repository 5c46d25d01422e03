// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{
	EnvelopeConfigLayer, KmsConfigLayer, LoggingConfigLayer, RetryConfigLayer, StoreConfigLayer,
};

/// Strongbox configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrongboxConfigLayer {
	#[serde(default)]
	pub store: Option<StoreConfigLayer>,
	#[serde(default)]
	pub kms: Option<KmsConfigLayer>,
	#[serde(default)]
	pub retry: Option<RetryConfigLayer>,
	#[serde(default)]
	pub envelope: Option<EnvelopeConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl StrongboxConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: StrongboxConfigLayer) {
		merge_option(&mut self.store, other.store, StoreConfigLayer::merge);
		merge_option(&mut self.kms, other.kms, KmsConfigLayer::merge);
		merge_option(&mut self.retry, other.retry, RetryConfigLayer::merge);
		merge_option(&mut self.envelope, other.envelope, EnvelopeConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
