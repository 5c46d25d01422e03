// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loading secrets with the `VAR` / `VAR_FILE` convention.
//!
//! `STRONGBOX_KMS_MASTER_KEY_FILE=/run/secrets/strongbox_kek` reads the master
//! key from a mounted secret file; `STRONGBOX_KMS_MASTER_KEY=...` supplies it
//! inline. The file form wins when both are set.

use std::path::PathBuf;
use std::{env, fs};

use strongbox_common_secret::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `{var}_FILE` (one trailing newline stripped) or `{var}`.
///
/// Returns `Ok(None)` when neither is set or `{var}` is empty.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let mut content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		// Trimmed in place; the value is never copied out of `content`.
		if content.ends_with('\n') {
			content.pop();
		}
		return Ok(Some(SecretString::new(content)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}
