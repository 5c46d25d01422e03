// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed secret record store.
//!
//! Versions are stored as 19-digit zero-padded TEXT, so `ORDER BY version`
//! and `MAX(version)` are numeric. The `(name, version)` primary key is the
//! conditional write: a plain `INSERT` that loses the race fails with a
//! UNIQUE constraint error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use strongbox_common_core::{
	DigestAlgorithm, EncryptionContext, SecretName, SecretRecord, SecretSummary, Version,
};

use crate::error::{StoreError, StoreResult};
use crate::store::VersionedSecretStore;

/// Repository for secret records.
#[derive(Clone, Debug)]
pub struct SqliteStore {
	pool: SqlitePool,
}

impl SqliteStore {
	/// Create a new store with the given pool. Call [`SqliteStore::migrate`]
	/// before first use.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Create the schema if it does not exist. Safe to run on every start.
	#[tracing::instrument(skip(self))]
	pub async fn migrate(&self) -> StoreResult<()> {
		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS secret_records (
				name TEXT NOT NULL,
				version TEXT NOT NULL,
				ciphertext BLOB NOT NULL,
				wrapped_key BLOB NOT NULL,
				hmac_tag BLOB NOT NULL,
				digest TEXT NOT NULL,
				context TEXT NOT NULL,
				created_at TEXT NOT NULL,
				PRIMARY KEY (name, version)
			)
			"#,
		)
		.execute(&self.pool)
		.await?;

		tracing::debug!("secret_records schema ready");
		Ok(())
	}
}

#[async_trait]
impl VersionedSecretStore for SqliteStore {
	#[tracing::instrument(skip(self, record), fields(name = %record.name, version = %record.version))]
	async fn put_if_absent(&self, record: &SecretRecord) -> StoreResult<()> {
		let context = record.context.to_json()?;

		let result = sqlx::query(
			r#"
			INSERT INTO secret_records (name, version, ciphertext, wrapped_key, hmac_tag, digest, context, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(record.name.as_str())
		.bind(record.version.padded())
		.bind(&record.ciphertext)
		.bind(&record.wrapped_key)
		.bind(&record.hmac_tag)
		.bind(record.digest.as_str())
		.bind(&context)
		.bind(record.created_at.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => Ok(()),
			Err(e) if is_unique_constraint_error(&e) => Err(StoreError::VersionExists {
				name: record.name.to_string(),
				version: record.version,
			}),
			Err(e) => Err(e.into()),
		}
	}

	#[tracing::instrument(skip(self), fields(name = %name, version = %version))]
	async fn get(&self, name: &SecretName, version: Version) -> StoreResult<Option<SecretRecord>> {
		let row = sqlx::query(
			r#"
			SELECT name, version, ciphertext, wrapped_key, hmac_tag, digest, context, created_at
			FROM secret_records
			WHERE name = ? AND version = ?
			"#,
		)
		.bind(name.as_str())
		.bind(version.padded())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_record_row).transpose()
	}

	#[tracing::instrument(skip(self), fields(name = %name))]
	async fn get_latest(&self, name: &SecretName) -> StoreResult<Option<SecretRecord>> {
		let row = sqlx::query(
			r#"
			SELECT name, version, ciphertext, wrapped_key, hmac_tag, digest, context, created_at
			FROM secret_records
			WHERE name = ?
			ORDER BY version DESC
			LIMIT 1
			"#,
		)
		.bind(name.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_record_row).transpose()
	}

	#[tracing::instrument(skip(self), fields(name = %name))]
	async fn list_versions(&self, name: &SecretName) -> StoreResult<Vec<Version>> {
		let versions: Vec<String> = sqlx::query_scalar(
			r#"
			SELECT version FROM secret_records
			WHERE name = ?
			ORDER BY version ASC
			"#,
		)
		.bind(name.as_str())
		.fetch_all(&self.pool)
		.await?;

		versions
			.iter()
			.map(|v| Version::parse(v).map_err(StoreError::from))
			.collect()
	}

	#[tracing::instrument(skip(self), fields(name = %name, version = %version))]
	async fn delete(&self, name: &SecretName, version: Version) -> StoreResult<bool> {
		let result = sqlx::query("DELETE FROM secret_records WHERE name = ? AND version = ?")
			.bind(name.as_str())
			.bind(version.padded())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(name = %name))]
	async fn delete_all(&self, name: &SecretName) -> StoreResult<u64> {
		let result = sqlx::query("DELETE FROM secret_records WHERE name = ?")
			.bind(name.as_str())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self))]
	async fn list_names(&self) -> StoreResult<Vec<SecretSummary>> {
		let rows = sqlx::query(
			r#"
			SELECT name, MAX(version) AS latest_version
			FROM secret_records
			GROUP BY name
			ORDER BY name ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter()
			.map(|row| -> StoreResult<SecretSummary> {
				let name: String = row.try_get("name")?;
				let latest: String = row.try_get("latest_version")?;
				Ok(SecretSummary {
					name: SecretName::new(name)?,
					latest_version: Version::parse(&latest)?,
				})
			})
			.collect()
	}
}

fn parse_record_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<SecretRecord> {
	let name: String = row.try_get("name")?;
	let version: String = row.try_get("version")?;
	let digest: String = row.try_get("digest")?;
	let context: String = row.try_get("context")?;
	let created_at: String = row.try_get("created_at")?;

	let created_at = DateTime::parse_from_rfc3339(&created_at)
		.map_err(|e| StoreError::Corrupted(format!("created_at '{created_at}': {e}")))?
		.with_timezone(&Utc);

	Ok(SecretRecord {
		name: SecretName::new(name)?,
		version: Version::parse(&version)?,
		ciphertext: row.try_get("ciphertext")?,
		wrapped_key: row.try_get("wrapped_key")?,
		hmac_tag: row.try_get("hmac_tag")?,
		digest: digest.parse::<DigestAlgorithm>()?,
		context: EncryptionContext::from_json(&context)?,
		created_at,
	})
}

fn is_unique_constraint_error(e: &sqlx::Error) -> bool {
	if let sqlx::Error::Database(ref db_err) = e {
		return db_err.is_unique_violation();
	}
	false
}
