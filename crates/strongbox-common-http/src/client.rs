// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client construction with the Strongbox User-Agent.

use reqwest::ClientBuilder;

/// Creates an HTTP client builder with the standard Strongbox User-Agent.
///
/// ```ignore
/// let client = strongbox_common_http::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	reqwest::Client::builder().user_agent(user_agent())
}

/// Returns the User-Agent string: `strongbox/{version} ({os}-{arch})`.
pub fn user_agent() -> String {
	format!(
		"strongbox/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_names_product_and_platform() {
		let ua = user_agent();
		assert!(ua.starts_with("strongbox/"));
		assert!(ua.contains(std::env::consts::OS));
	}

	#[test]
	fn builder_produces_client() {
		assert!(builder().build().is_ok());
	}
}
