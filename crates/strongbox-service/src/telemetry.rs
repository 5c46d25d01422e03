// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing subscriber setup.

use strongbox_config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. Fails if a global subscriber
/// is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

	let fmt_layer = match config.format {
		LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
		LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
		LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
	};

	tracing_subscriber::registry()
		.with(fmt_layer)
		.with(filter)
		.try_init()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn second_install_fails() {
		let config = LoggingConfig {
			level: "strongbox_service=debug".to_string(),
			format: LogFormat::Compact,
		};
		let _ = init_tracing(&config);
		assert!(init_tracing(&config).is_err());
	}
}
