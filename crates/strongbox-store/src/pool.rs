// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;

use crate::error::StoreError;

/// Create a SqlitePool with WAL mode and common settings.
///
/// In-memory URLs get a single connection so every query sees the same
/// database.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./strongbox.db")
///
/// # Errors
/// Returns `StoreError::Internal` if the URL is invalid, or
/// `StoreError::Database` if the connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StoreError> {
	let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

	let mut options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| StoreError::Internal(format!("Invalid database URL: {e}")))?
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);
	if !in_memory {
		options = options.journal_mode(SqliteJournalMode::Wal);
	}

	let mut pool_options = SqlitePoolOptions::new();
	if in_memory {
		pool_options = pool_options.max_connections(1).idle_timeout(None).max_lifetime(None);
	}
	let pool = pool_options.connect_with(options).await?;

	tracing::debug!(in_memory, "database pool created");
	Ok(pool)
}
