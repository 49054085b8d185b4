// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::str::FromStr;

use crate::error::DbError;
use crate::schema::SCHEMA;

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./bac.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid or connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!("database pool created");
	Ok(pool)
}

/// Create every catalog table and index that does not exist yet.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	let mut tx = pool.begin().await?;
	for statement in SCHEMA {
		sqlx::query(statement).execute(&mut *tx).await?;
	}
	tx.commit().await?;

	tracing::debug!(statements = SCHEMA.len(), "catalog schema applied");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_file_pool_and_migrations_are_repeatable() {
		let temp_dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", temp_dir.path().join("bac.db").display());
		let pool = create_pool(&url).await.unwrap();

		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();

		let count: i64 = sqlx::query_scalar(
			"SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'boards'",
		)
		.fetch_one(&pool)
		.await
		.unwrap();
		assert_eq!(count, 1);
	}
}
