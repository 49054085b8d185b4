// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::Row;
use uuid::Uuid;

use crate::catalog::CatalogRepository;
use crate::error::{conflict_or, DbError};
use crate::types::{parse_uuid, JobRecord};

impl CatalogRepository {
	#[tracing::instrument(skip(self, job), fields(job_name = %job.name, namespace = %job.namespace))]
	pub async fn create_job(&self, job: &JobRecord) -> Result<(), DbError> {
		sqlx::query("INSERT INTO jobs (id, namespace, name, board_id) VALUES (?, ?, ?, ?)")
			.bind(job.id.to_string())
			.bind(&job.namespace)
			.bind(&job.name)
			.bind(job.board_id.to_string())
			.execute(&self.pool)
			.await
			.map_err(|e| conflict_or(e, "Job"))?;

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(board_id = %board_id))]
	pub async fn list_jobs_for_board(&self, board_id: Uuid) -> Result<Vec<JobRecord>, DbError> {
		let rows = sqlx::query(
			"SELECT id, namespace, name, board_id FROM jobs WHERE board_id = ? ORDER BY name ASC",
		)
		.bind(board_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_job).collect()
	}

	/// Mark a job as one of the board's prototypes. Returns whether the link
	/// was new.
	#[tracing::instrument(skip(self), fields(board_id = %board_id, job_id = %job_id))]
	pub async fn add_prototype_job(&self, board_id: Uuid, job_id: Uuid) -> Result<bool, DbError> {
		let result =
			sqlx::query("INSERT OR IGNORE INTO board_prototype_jobs (board_id, job_id) VALUES (?, ?)")
				.bind(board_id.to_string())
				.bind(job_id.to_string())
				.execute(&self.pool)
				.await?;

		Ok(result.rows_affected() == 1)
	}

	#[tracing::instrument(skip(self), fields(board_id = %board_id))]
	pub async fn list_prototype_jobs(&self, board_id: Uuid) -> Result<Vec<JobRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT j.id, j.namespace, j.name, j.board_id
			FROM jobs j
			JOIN board_prototype_jobs p ON p.job_id = j.id
			WHERE p.board_id = ?
			ORDER BY j.name ASC
			"#,
		)
		.bind(board_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_job).collect()
	}
}

fn row_to_job(row: &sqlx::sqlite::SqliteRow) -> Result<JobRecord, DbError> {
	let id_str: String = row.get("id");
	let board_id_str: String = row.get("board_id");

	Ok(JobRecord {
		id: parse_uuid(&id_str)?,
		namespace: row.get("namespace"),
		name: row.get("name"),
		board_id: parse_uuid(&board_id_str)?,
	})
}
