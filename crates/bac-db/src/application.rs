// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::Row;
use uuid::Uuid;

use crate::board::row_to_board;
use crate::catalog::CatalogRepository;
use crate::error::{conflict_or, DbError};
use crate::repo::get_or_create_tree_in;
use crate::types::{parse_uuid, ApplicationLink, ApplicationRecord, BoardRecord, LinkOutcome};

impl CatalogRepository {
	/// Find the application by `(name, path)`, inserting it when absent.
	#[tracing::instrument(skip(self), fields(name = %name, path = %path))]
	pub async fn get_or_create_application(
		&self,
		name: &str,
		path: &str,
	) -> Result<(ApplicationRecord, bool), DbError> {
		let result = sqlx::query(
			r#"
			INSERT OR IGNORE INTO applications (id, name, path, no_application)
			VALUES (?, ?, ?, 0)
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(name)
		.bind(path)
		.execute(&self.pool)
		.await?;
		let created = result.rows_affected() == 1;

		let application = self
			.get_application(name, path)
			.await?
			.ok_or_else(|| DbError::Internal(format!("application {name} vanished after insert")))?;

		Ok((application, created))
	}

	#[tracing::instrument(skip(self), fields(name = %name, path = %path))]
	pub async fn get_application(
		&self,
		name: &str,
		path: &str,
	) -> Result<Option<ApplicationRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, path, no_application
			FROM applications
			WHERE name = ? AND path = ?
			"#,
		)
		.bind(name)
		.bind(path)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_application(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(application_id = %id))]
	pub async fn get_application_by_id(&self, id: Uuid) -> Result<Option<ApplicationRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, path, no_application
			FROM applications
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_application(&r)).transpose()
	}

	#[tracing::instrument(skip(self, application), fields(application_id = %application.id))]
	pub async fn update_application(&self, application: &ApplicationRecord) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE applications
			SET name = ?, path = ?, no_application = ?
			WHERE id = ?
			"#,
		)
		.bind(&application.name)
		.bind(&application.path)
		.bind(application.no_application)
		.bind(application.id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_or(e, "Application"))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound("Application not found".to_string()));
		}

		Ok(())
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, DbError> {
		let rows = sqlx::query(
			"SELECT id, name, path, no_application FROM applications ORDER BY name ASC, path ASC",
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_application).collect()
	}

	/// Applications without the hidden flag.
	#[tracing::instrument(skip(self))]
	pub async fn list_real_applications(&self) -> Result<Vec<ApplicationRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, name, path, no_application
			FROM applications
			WHERE no_application = 0
			ORDER BY name ASC, path ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_application).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn has_hidden_applications(&self) -> Result<bool, DbError> {
		let count: i64 =
			sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE no_application = 1")
				.fetch_one(&self.pool)
				.await?;

		Ok(count > 0)
	}

	#[tracing::instrument(skip(self), fields(application_id = %id))]
	pub async fn set_application_hidden(&self, id: Uuid, hidden: bool) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE applications SET no_application = ? WHERE id = ?")
			.bind(hidden)
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound("Application not found".to_string()));
		}

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(application_id = %application_id))]
	pub async fn list_blacklisted_boards(
		&self,
		application_id: Uuid,
	) -> Result<Vec<BoardRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT b.id, b.riot_name, b.path, b.repo_id, b.cpu_repo_id, b.usb_device_id, b.no_board
			FROM boards b
			JOIN application_blacklisted_boards l ON l.board_id = b.id
			WHERE l.application_id = ?
			ORDER BY b.riot_name ASC
			"#,
		)
		.bind(application_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_board).collect()
	}

	#[tracing::instrument(skip(self), fields(application_id = %application_id))]
	pub async fn list_whitelisted_boards(
		&self,
		application_id: Uuid,
	) -> Result<Vec<BoardRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT b.id, b.riot_name, b.path, b.repo_id, b.cpu_repo_id, b.usb_device_id, b.no_board
			FROM boards b
			JOIN application_whitelisted_boards l ON l.board_id = b.id
			WHERE l.application_id = ?
			ORDER BY b.riot_name ASC
			"#,
		)
		.bind(application_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_board).collect()
	}

	/// Ensure the tree entry and add board list memberships in one
	/// transaction. Blacklist rows are written first; a board already in the
	/// opposite list of the same application is never inserted.
	#[tracing::instrument(
		skip(self, link),
		fields(
			application_id = %link.application_id,
			blacklist = link.blacklist.len(),
			whitelist = link.whitelist.len()
		)
	)]
	pub async fn link_application(&self, link: &ApplicationLink) -> Result<LinkOutcome, DbError> {
		let mut tx = self.pool.begin().await?;
		let mut outcome = LinkOutcome::default();
		let application_id = link.application_id.to_string();

		if let Some((repo_id, tree_name)) = &link.tree {
			let (_, created) =
				get_or_create_tree_in(&mut tx, *repo_id, tree_name, Some(link.application_id)).await?;
			outcome.tree_created = created;
		}

		for board_id in &link.blacklist {
			let board_id = board_id.to_string();
			let result = sqlx::query(
				r#"
				INSERT OR IGNORE INTO application_blacklisted_boards (application_id, board_id)
				SELECT ?, ?
				WHERE NOT EXISTS (
					SELECT 1 FROM application_whitelisted_boards
					WHERE application_id = ? AND board_id = ?
				)
				"#,
			)
			.bind(&application_id)
			.bind(&board_id)
			.bind(&application_id)
			.bind(&board_id)
			.execute(&mut *tx)
			.await?;
			outcome.blacklisted += result.rows_affected();
		}

		for board_id in &link.whitelist {
			let board_id = board_id.to_string();
			let result = sqlx::query(
				r#"
				INSERT OR IGNORE INTO application_whitelisted_boards (application_id, board_id)
				SELECT ?, ?
				WHERE NOT EXISTS (
					SELECT 1 FROM application_blacklisted_boards
					WHERE application_id = ? AND board_id = ?
				)
				"#,
			)
			.bind(&application_id)
			.bind(&board_id)
			.bind(&application_id)
			.bind(&board_id)
			.execute(&mut *tx)
			.await?;
			outcome.whitelisted += result.rows_affected();
		}

		tx.commit().await?;
		Ok(outcome)
	}
}

fn row_to_application(row: &sqlx::sqlite::SqliteRow) -> Result<ApplicationRecord, DbError> {
	let id_str: String = row.get("id");

	Ok(ApplicationRecord {
		id: parse_uuid(&id_str)?,
		name: row.get("name"),
		path: row.get("path"),
		no_application: row.get("no_application"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::RepositoryRecord;

	async fn make_catalog() -> CatalogRepository {
		CatalogRepository::new(crate::testing::create_catalog_test_pool().await)
	}

	fn names(boards: Vec<BoardRecord>) -> Vec<String> {
		boards.into_iter().map(|b| b.riot_name).collect()
	}

	#[tokio::test]
	async fn test_get_or_create_application() {
		let catalog = make_catalog().await;

		let (first, created) = catalog
			.get_or_create_application("hello-world", "examples/hello-world")
			.await
			.unwrap();
		assert!(created);
		assert_eq!(first.path.as_deref(), Some("examples/hello-world"));

		let (second, created) = catalog
			.get_or_create_application("hello-world", "examples/hello-world")
			.await
			.unwrap();
		assert!(!created);
		assert_eq!(first.id, second.id);

		let (other, created) = catalog
			.get_or_create_application("hello-world", "tests/hello-world")
			.await
			.unwrap();
		assert!(created);
		assert_ne!(other.id, first.id);
	}

	#[tokio::test]
	async fn test_hidden_applications() {
		let catalog = make_catalog().await;
		let (app, _) = catalog
			.get_or_create_application("default", "examples/default")
			.await
			.unwrap();
		catalog
			.get_or_create_application("gnrc_networking", "examples/gnrc_networking")
			.await
			.unwrap();
		assert!(!catalog.has_hidden_applications().await.unwrap());

		catalog.set_application_hidden(app.id, true).await.unwrap();
		assert!(catalog.has_hidden_applications().await.unwrap());
		assert_eq!(catalog.list_real_applications().await.unwrap().len(), 1);
		assert_eq!(catalog.list_applications().await.unwrap().len(), 2);

		let fetched = catalog.get_application_by_id(app.id).await.unwrap().unwrap();
		assert!(fetched.no_application);
	}

	#[tokio::test]
	async fn test_link_application_blacklist_wins() {
		let catalog = make_catalog().await;
		let repo = RepositoryRecord::new("https://example.com/RIOT.git", "RIOT");
		catalog.create_repository(&repo).await.unwrap();
		let (native, _) = catalog.get_or_create_board("native").await.unwrap();
		let (m3, _) = catalog.get_or_create_board("iotlab-m3").await.unwrap();
		let (app, _) = catalog
			.get_or_create_application("default", "examples/default")
			.await
			.unwrap();

		let link = ApplicationLink {
			application_id: app.id,
			tree: Some((repo.id, "examples".to_string())),
			blacklist: vec![native.id],
			whitelist: vec![native.id, m3.id],
		};
		let outcome = catalog.link_application(&link).await.unwrap();
		assert!(outcome.tree_created);
		assert_eq!(outcome.blacklisted, 1);
		assert_eq!(outcome.whitelisted, 1);

		assert_eq!(
			names(catalog.list_blacklisted_boards(app.id).await.unwrap()),
			vec!["native".to_string()]
		);
		assert_eq!(
			names(catalog.list_whitelisted_boards(app.id).await.unwrap()),
			vec!["iotlab-m3".to_string()]
		);

		let again = catalog.link_application(&link).await.unwrap();
		assert_eq!(again, LinkOutcome::default());

		let tree = catalog
			.get_application_tree_by_application(app.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(tree.repo_id, repo.id);
		assert_eq!(tree.tree_name, "examples");
	}

	#[tokio::test]
	async fn test_link_respects_existing_opposite_membership() {
		let catalog = make_catalog().await;
		let (native, _) = catalog.get_or_create_board("native").await.unwrap();
		let (app, _) = catalog
			.get_or_create_application("default", "examples/default")
			.await
			.unwrap();

		catalog
			.link_application(&ApplicationLink {
				application_id: app.id,
				whitelist: vec![native.id],
				..Default::default()
			})
			.await
			.unwrap();
		let outcome = catalog
			.link_application(&ApplicationLink {
				application_id: app.id,
				blacklist: vec![native.id],
				..Default::default()
			})
			.await
			.unwrap();

		assert_eq!(outcome.blacklisted, 0);
		assert!(catalog.list_blacklisted_boards(app.id).await.unwrap().is_empty());
	}
}
