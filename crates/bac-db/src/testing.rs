// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory pools for tests in this crate and its dependents.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::pool::run_migrations;

/// An empty in-memory database. A single connection keeps every query on
/// the same database.
pub async fn create_test_pool() -> SqlitePool {
	SqlitePoolOptions::new()
		.max_connections(1)
		.connect(":memory:")
		.await
		.unwrap()
}

/// An in-memory database with the full catalog schema applied.
pub async fn create_catalog_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	sqlx::query("PRAGMA foreign_keys = ON")
		.execute(&pool)
		.await
		.unwrap();
	run_migrations(&pool).await.unwrap();
	pool
}
