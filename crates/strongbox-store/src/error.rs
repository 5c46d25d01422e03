// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use strongbox_common_core::{CoreError, Version};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// The conditional write lost: `(name, version)` is already taken.
	#[error("version {version} of {name} already exists")]
	VersionExists { name: String, version: Version },

	#[error("Database error: {0}")]
	Database(#[from] sqlx::Error),

	/// A persisted row could not be turned back into a record.
	#[error("Corrupted record: {0}")]
	Corrupted(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl From<CoreError> for StoreError {
	fn from(e: CoreError) -> Self {
		StoreError::Corrupted(e.to_string())
	}
}

impl StoreError {
	pub fn is_version_exists(&self) -> bool {
		matches!(self, StoreError::VersionExists { .. })
	}
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
