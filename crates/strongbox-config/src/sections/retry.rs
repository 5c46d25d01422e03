// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retry bounds for version conflicts and key service calls.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_WRITE_ATTEMPTS: u32 = 5;
const DEFAULT_KEY_SERVICE_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 100;
const DEFAULT_MAX_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetryConfigLayer {
	pub write_attempts: Option<u32>,
	pub key_service_attempts: Option<u32>,
	pub base_delay_ms: Option<u64>,
	pub max_delay_ms: Option<u64>,
	pub jitter: Option<bool>,
}

impl RetryConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.write_attempts.is_some() {
			self.write_attempts = other.write_attempts;
		}
		if other.key_service_attempts.is_some() {
			self.key_service_attempts = other.key_service_attempts;
		}
		if other.base_delay_ms.is_some() {
			self.base_delay_ms = other.base_delay_ms;
		}
		if other.max_delay_ms.is_some() {
			self.max_delay_ms = other.max_delay_ms;
		}
		if other.jitter.is_some() {
			self.jitter = other.jitter;
		}
	}

	pub fn finalize(self) -> RetryConfig {
		RetryConfig {
			write_attempts: self.write_attempts.unwrap_or(DEFAULT_WRITE_ATTEMPTS),
			key_service_attempts: self
				.key_service_attempts
				.unwrap_or(DEFAULT_KEY_SERVICE_ATTEMPTS),
			base_delay_ms: self.base_delay_ms.unwrap_or(DEFAULT_BASE_DELAY_MS),
			max_delay_ms: self.max_delay_ms.unwrap_or(DEFAULT_MAX_DELAY_MS),
			jitter: self.jitter.unwrap_or(true),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
	/// Bound on `put` attempts when another writer takes the computed version.
	pub write_attempts: u32,
	/// Bound on calls to the key service when it reports itself unavailable.
	pub key_service_attempts: u32,
	pub base_delay_ms: u64,
	pub max_delay_ms: u64,
	pub jitter: bool,
}

impl RetryConfig {
	/// Backoff policy for key service calls.
	pub fn key_service_policy(&self) -> strongbox_common_http::RetryConfig {
		strongbox_common_http::RetryConfig {
			max_attempts: self.key_service_attempts,
			base_delay: Duration::from_millis(self.base_delay_ms),
			max_delay: Duration::from_millis(self.max_delay_ms),
			backoff_factor: 2.0,
			jitter: self.jitter,
		}
	}
}

impl Default for RetryConfig {
	fn default() -> Self {
		RetryConfigLayer::default().finalize()
	}
}
