// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation errors for core types.

use thiserror::Error;

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
	#[error("invalid secret name: {0}")]
	InvalidName(String),

	#[error("invalid version: {0}")]
	InvalidVersion(String),

	#[error("unknown digest algorithm: {0}")]
	UnknownDigest(String),

	#[error("invalid encryption context: {0}")]
	InvalidContext(String),
}
