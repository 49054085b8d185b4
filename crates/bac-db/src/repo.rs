// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use crate::catalog::CatalogRepository;
use crate::error::{conflict_or, DbError};
use crate::types::{parse_opt_uuid, parse_timestamp, parse_uuid, ApplicationTreeRecord, RepositoryRecord};

const REPO_COLUMNS: &str = "id, url, path, default_branch, vcs, has_boards_tree, boards_tree, \
	has_cpu_tree, cpu_tree, is_default, created_at, updated_at";

impl CatalogRepository {
	// =========================================================================
	// Repositories
	// =========================================================================

	#[tracing::instrument(skip(self, repo), fields(repo_id = %repo.id, url = %repo.url))]
	pub async fn create_repository(&self, repo: &RepositoryRecord) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO repositories (id, url, path, default_branch, vcs, has_boards_tree, boards_tree,
				has_cpu_tree, cpu_tree, is_default, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(repo.id.to_string())
		.bind(&repo.url)
		.bind(&repo.path)
		.bind(&repo.default_branch)
		.bind(&repo.vcs)
		.bind(repo.has_boards_tree)
		.bind(&repo.boards_tree)
		.bind(repo.has_cpu_tree)
		.bind(&repo.cpu_tree)
		.bind(repo.is_default)
		.bind(repo.created_at.to_rfc3339())
		.bind(repo.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_or(e, "Repository"))?;

		Ok(())
	}

	#[tracing::instrument(skip(self, repo), fields(repo_id = %repo.id))]
	pub async fn update_repository(&self, repo: &RepositoryRecord) -> Result<(), DbError> {
		let updated_at = Utc::now().to_rfc3339();

		let result = sqlx::query(
			r#"
			UPDATE repositories
			SET url = ?, path = ?, default_branch = ?, vcs = ?, has_boards_tree = ?, boards_tree = ?,
				has_cpu_tree = ?, cpu_tree = ?, is_default = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&repo.url)
		.bind(&repo.path)
		.bind(&repo.default_branch)
		.bind(&repo.vcs)
		.bind(repo.has_boards_tree)
		.bind(&repo.boards_tree)
		.bind(repo.has_cpu_tree)
		.bind(&repo.cpu_tree)
		.bind(repo.is_default)
		.bind(&updated_at)
		.bind(repo.id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_or(e, "Repository"))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound("Repository not found".to_string()));
		}

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(repo_id = %id))]
	pub async fn get_repository_by_id(&self, id: Uuid) -> Result<Option<RepositoryRecord>, DbError> {
		let row = sqlx::query(&format!("SELECT {REPO_COLUMNS} FROM repositories WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_repository(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(url = %url))]
	pub async fn get_repository_by_url(&self, url: &str) -> Result<Option<RepositoryRecord>, DbError> {
		let row = sqlx::query(&format!("SELECT {REPO_COLUMNS} FROM repositories WHERE url = ?"))
			.bind(url)
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_repository(&r)).transpose()
	}

	/// The repository flagged as default CPU source. Several may carry the
	/// flag; the first in catalog order wins.
	#[tracing::instrument(skip(self))]
	pub async fn get_default_repository(&self) -> Result<Option<RepositoryRecord>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {REPO_COLUMNS} FROM repositories WHERE is_default = 1 ORDER BY path ASC LIMIT 1"
		))
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_repository(&r)).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_repositories(&self) -> Result<Vec<RepositoryRecord>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {REPO_COLUMNS} FROM repositories ORDER BY is_default DESC, path ASC"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_repository).collect()
	}

	#[tracing::instrument(skip(self), fields(repo_id = %id))]
	pub async fn delete_repository(&self, id: Uuid) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM repositories WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	// =========================================================================
	// Application trees
	// =========================================================================

	/// Find or insert the `(repo, tree_name, application)` entry. A `None`
	/// application is the bare declaration of a tree directory.
	#[tracing::instrument(skip(self), fields(repo_id = %repo_id, tree_name = %tree_name))]
	pub async fn get_or_create_application_tree(
		&self,
		repo_id: Uuid,
		tree_name: &str,
		application_id: Option<Uuid>,
	) -> Result<(ApplicationTreeRecord, bool), DbError> {
		let mut tx = self.pool.begin().await?;
		let (record, created) =
			get_or_create_tree_in(&mut tx, repo_id, tree_name, application_id).await?;
		tx.commit().await?;
		Ok((record, created))
	}

	#[tracing::instrument(skip(self), fields(repo_id = %repo_id))]
	pub async fn list_application_trees(
		&self,
		repo_id: Uuid,
	) -> Result<Vec<ApplicationTreeRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, repo_id, tree_name, application_id
			FROM application_trees
			WHERE repo_id = ?
			ORDER BY tree_name ASC
			"#,
		)
		.bind(repo_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_application_tree).collect()
	}

	/// Distinct tree directory names declared for a repository, sorted.
	#[tracing::instrument(skip(self), fields(repo_id = %repo_id))]
	pub async fn list_application_tree_names(&self, repo_id: Uuid) -> Result<Vec<String>, DbError> {
		let names = sqlx::query_scalar::<_, String>(
			r#"
			SELECT DISTINCT tree_name
			FROM application_trees
			WHERE repo_id = ?
			ORDER BY tree_name ASC
			"#,
		)
		.bind(repo_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		Ok(names)
	}

	#[tracing::instrument(skip(self), fields(application_id = %application_id))]
	pub async fn get_application_tree_by_application(
		&self,
		application_id: Uuid,
	) -> Result<Option<ApplicationTreeRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, repo_id, tree_name, application_id
			FROM application_trees
			WHERE application_id = ?
			ORDER BY tree_name ASC
			LIMIT 1
			"#,
		)
		.bind(application_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_application_tree(&r)).transpose()
	}
}

pub(crate) async fn get_or_create_tree_in(
	tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	repo_id: Uuid,
	tree_name: &str,
	application_id: Option<Uuid>,
) -> Result<(ApplicationTreeRecord, bool), DbError> {
	let application_id_str = application_id.map(|id| id.to_string());

	let existing = sqlx::query(
		r#"
		SELECT id, repo_id, tree_name, application_id
		FROM application_trees
		WHERE repo_id = ? AND tree_name = ? AND application_id IS ?
		"#,
	)
	.bind(repo_id.to_string())
	.bind(tree_name)
	.bind(&application_id_str)
	.fetch_optional(&mut **tx)
	.await?;

	if let Some(row) = existing {
		return Ok((row_to_application_tree(&row)?, false));
	}

	let record = ApplicationTreeRecord {
		id: Uuid::new_v4(),
		repo_id,
		tree_name: tree_name.to_string(),
		application_id,
	};
	sqlx::query(
		r#"
		INSERT INTO application_trees (id, repo_id, tree_name, application_id)
		VALUES (?, ?, ?, ?)
		"#,
	)
	.bind(record.id.to_string())
	.bind(record.repo_id.to_string())
	.bind(&record.tree_name)
	.bind(&application_id_str)
	.execute(&mut **tx)
	.await
	.map_err(|e| conflict_or(e, "Application tree"))?;

	Ok((record, true))
}

fn row_to_repository(row: &sqlx::sqlite::SqliteRow) -> Result<RepositoryRecord, DbError> {
	let id_str: String = row.get("id");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	Ok(RepositoryRecord {
		id: parse_uuid(&id_str)?,
		url: row.get("url"),
		path: row.get("path"),
		default_branch: row.get("default_branch"),
		vcs: row.get("vcs"),
		has_boards_tree: row.get("has_boards_tree"),
		boards_tree: row.get("boards_tree"),
		has_cpu_tree: row.get("has_cpu_tree"),
		cpu_tree: row.get("cpu_tree"),
		is_default: row.get("is_default"),
		created_at: parse_timestamp(&created_at_str)?,
		updated_at: parse_timestamp(&updated_at_str)?,
	})
}

fn row_to_application_tree(
	row: &sqlx::sqlite::SqliteRow,
) -> Result<ApplicationTreeRecord, DbError> {
	let id_str: String = row.get("id");
	let repo_id_str: String = row.get("repo_id");

	Ok(ApplicationTreeRecord {
		id: parse_uuid(&id_str)?,
		repo_id: parse_uuid(&repo_id_str)?,
		tree_name: row.get("tree_name"),
		application_id: parse_opt_uuid(row.get("application_id"))?,
	})
}
