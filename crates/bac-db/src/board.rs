// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::Row;
use uuid::Uuid;

use crate::catalog::CatalogRepository;
use crate::error::{conflict_or, DbError};
use crate::types::{parse_opt_uuid, parse_uuid, BoardRecord};

const BOARD_COLUMNS: &str = "id, riot_name, path, repo_id, cpu_repo_id, usb_device_id, no_board";

impl CatalogRepository {
	/// Find the board by canonical name, inserting a bare record when absent.
	#[tracing::instrument(skip(self), fields(riot_name = %riot_name))]
	pub async fn get_or_create_board(&self, riot_name: &str) -> Result<(BoardRecord, bool), DbError> {
		let result = sqlx::query(
			r#"
			INSERT OR IGNORE INTO boards (id, riot_name, no_board)
			VALUES (?, ?, 0)
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(riot_name)
		.execute(&self.pool)
		.await?;
		let created = result.rows_affected() == 1;

		let board = self
			.get_board_by_name(riot_name)
			.await?
			.ok_or_else(|| DbError::Internal(format!("board {riot_name} vanished after insert")))?;

		Ok((board, created))
	}

	#[tracing::instrument(skip(self, board), fields(board_id = %board.id, riot_name = %board.riot_name))]
	pub async fn update_board(&self, board: &BoardRecord) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE boards
			SET riot_name = ?, path = ?, repo_id = ?, cpu_repo_id = ?, usb_device_id = ?, no_board = ?
			WHERE id = ?
			"#,
		)
		.bind(&board.riot_name)
		.bind(&board.path)
		.bind(board.repo_id.map(|id| id.to_string()))
		.bind(board.cpu_repo_id.map(|id| id.to_string()))
		.bind(board.usb_device_id.map(|id| id.to_string()))
		.bind(board.no_board)
		.bind(board.id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_or(e, "Board"))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound("Board not found".to_string()));
		}

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(riot_name = %riot_name))]
	pub async fn get_board_by_name(&self, riot_name: &str) -> Result<Option<BoardRecord>, DbError> {
		let row = sqlx::query(&format!("SELECT {BOARD_COLUMNS} FROM boards WHERE riot_name = ?"))
			.bind(riot_name)
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_board(&r)).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_boards(&self) -> Result<Vec<BoardRecord>, DbError> {
		let rows = sqlx::query(&format!("SELECT {BOARD_COLUMNS} FROM boards ORDER BY riot_name ASC"))
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_board).collect()
	}

	/// Boards without the hidden flag.
	#[tracing::instrument(skip(self))]
	pub async fn list_real_boards(&self) -> Result<Vec<BoardRecord>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {BOARD_COLUMNS} FROM boards WHERE no_board = 0 ORDER BY riot_name ASC"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_board).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn has_hidden_boards(&self) -> Result<bool, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards WHERE no_board = 1")
			.fetch_one(&self.pool)
			.await?;

		Ok(count > 0)
	}

	#[tracing::instrument(skip(self), fields(riot_name = %riot_name))]
	pub async fn set_board_hidden(&self, riot_name: &str, hidden: bool) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE boards SET no_board = ? WHERE riot_name = ?")
			.bind(hidden)
			.bind(riot_name)
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Board {riot_name} not found")));
		}

		Ok(())
	}

	/// Attach a USB device to a board, or detach with `None`.
	#[tracing::instrument(skip(self), fields(riot_name = %riot_name))]
	pub async fn set_board_usb_device(
		&self,
		riot_name: &str,
		usb_device_id: Option<Uuid>,
	) -> Result<(), DbError> {
		let result = sqlx::query("UPDATE boards SET usb_device_id = ? WHERE riot_name = ?")
			.bind(usb_device_id.map(|id| id.to_string()))
			.bind(riot_name)
			.execute(&self.pool)
			.await
			.map_err(|e| conflict_or(e, "Board USB device link"))?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Board {riot_name} not found")));
		}

		Ok(())
	}
}

pub(crate) fn row_to_board(row: &sqlx::sqlite::SqliteRow) -> Result<BoardRecord, DbError> {
	let id_str: String = row.get("id");

	Ok(BoardRecord {
		id: parse_uuid(&id_str)?,
		riot_name: row.get("riot_name"),
		path: row.get("path"),
		repo_id: parse_opt_uuid(row.get("repo_id"))?,
		cpu_repo_id: parse_opt_uuid(row.get("cpu_repo_id"))?,
		usb_device_id: parse_opt_uuid(row.get("usb_device_id"))?,
		no_board: row.get("no_board"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::RepositoryRecord;

	async fn make_catalog() -> CatalogRepository {
		CatalogRepository::new(crate::testing::create_catalog_test_pool().await)
	}

	#[tokio::test]
	async fn test_get_or_create_board() {
		let catalog = make_catalog().await;

		let (first, created) = catalog.get_or_create_board("samr21-xpro").await.unwrap();
		assert!(created);
		assert_eq!(first.riot_name, "samr21-xpro");
		assert!(first.path.is_none());
		assert!(!first.no_board);

		let (second, created) = catalog.get_or_create_board("samr21-xpro").await.unwrap();
		assert!(!created);
		assert_eq!(first.id, second.id);
	}

	#[tokio::test]
	async fn test_update_board_links_repositories() {
		let catalog = make_catalog().await;
		let repo = RepositoryRecord::new("https://example.com/RIOT.git", "RIOT");
		catalog.create_repository(&repo).await.unwrap();

		let (mut board, _) = catalog.get_or_create_board("native").await.unwrap();
		board.path = Some("boards/native".to_string());
		board.repo_id = Some(repo.id);
		board.cpu_repo_id = Some(repo.id);
		catalog.update_board(&board).await.unwrap();

		let fetched = catalog.get_board_by_name("native").await.unwrap().unwrap();
		assert_eq!(fetched, board);
	}

	#[tokio::test]
	async fn test_hidden_boards() {
		let catalog = make_catalog().await;
		catalog.get_or_create_board("native").await.unwrap();
		catalog.get_or_create_board("iotlab-m3").await.unwrap();
		assert!(!catalog.has_hidden_boards().await.unwrap());

		catalog.set_board_hidden("native", true).await.unwrap();
		assert!(catalog.has_hidden_boards().await.unwrap());

		let real: Vec<String> = catalog
			.list_real_boards()
			.await
			.unwrap()
			.into_iter()
			.map(|b| b.riot_name)
			.collect();
		assert_eq!(real, vec!["iotlab-m3".to_string()]);
		assert_eq!(catalog.list_boards().await.unwrap().len(), 2);

		let result = catalog.set_board_hidden("missing", true).await;
		assert!(matches!(result, Err(DbError::NotFound(_))));
	}

	#[tokio::test]
	async fn test_usb_device_is_one_to_one() {
		let catalog = make_catalog().await;
		catalog.get_or_create_board("native").await.unwrap();
		catalog.get_or_create_board("iotlab-m3").await.unwrap();
		let (device, _) = catalog
			.get_or_create_usb_device("0403:6010", Some("ftdi"))
			.await
			.unwrap();

		catalog.set_board_usb_device("native", Some(device.id)).await.unwrap();
		let result = catalog.set_board_usb_device("iotlab-m3", Some(device.id)).await;
		assert!(matches!(result, Err(DbError::Conflict(_))));

		catalog.set_board_usb_device("native", None).await.unwrap();
		let board = catalog.get_board_by_name("native").await.unwrap().unwrap();
		assert!(board.usb_device_id.is_none());
	}
}
