// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;
use crate::types::{
	ApplicationLink, ApplicationRecord, ApplicationTreeRecord, BoardRecord, JobRecord, LinkOutcome,
	PortRecord, RepositoryRecord, UsbDeviceRecord,
};

#[async_trait]
pub trait CatalogStore: Send + Sync {
	// Repositories
	async fn create_repository(&self, repo: &RepositoryRecord) -> Result<(), DbError>;
	async fn update_repository(&self, repo: &RepositoryRecord) -> Result<(), DbError>;
	async fn get_repository_by_id(&self, id: Uuid) -> Result<Option<RepositoryRecord>, DbError>;
	async fn get_repository_by_url(&self, url: &str) -> Result<Option<RepositoryRecord>, DbError>;
	async fn get_default_repository(&self) -> Result<Option<RepositoryRecord>, DbError>;
	async fn list_repositories(&self) -> Result<Vec<RepositoryRecord>, DbError>;
	async fn delete_repository(&self, id: Uuid) -> Result<bool, DbError>;

	// Application trees
	async fn get_or_create_application_tree(
		&self,
		repo_id: Uuid,
		tree_name: &str,
		application_id: Option<Uuid>,
	) -> Result<(ApplicationTreeRecord, bool), DbError>;
	async fn list_application_trees(&self, repo_id: Uuid) -> Result<Vec<ApplicationTreeRecord>, DbError>;
	async fn list_application_tree_names(&self, repo_id: Uuid) -> Result<Vec<String>, DbError>;
	async fn get_application_tree_by_application(
		&self,
		application_id: Uuid,
	) -> Result<Option<ApplicationTreeRecord>, DbError>;

	// Boards
	async fn get_or_create_board(&self, riot_name: &str) -> Result<(BoardRecord, bool), DbError>;
	async fn update_board(&self, board: &BoardRecord) -> Result<(), DbError>;
	async fn get_board_by_name(&self, riot_name: &str) -> Result<Option<BoardRecord>, DbError>;
	async fn list_boards(&self) -> Result<Vec<BoardRecord>, DbError>;
	async fn list_real_boards(&self) -> Result<Vec<BoardRecord>, DbError>;
	async fn has_hidden_boards(&self) -> Result<bool, DbError>;
	async fn set_board_hidden(&self, riot_name: &str, hidden: bool) -> Result<(), DbError>;
	async fn set_board_usb_device(
		&self,
		riot_name: &str,
		usb_device_id: Option<Uuid>,
	) -> Result<(), DbError>;

	// Applications
	async fn get_or_create_application(
		&self,
		name: &str,
		path: &str,
	) -> Result<(ApplicationRecord, bool), DbError>;
	async fn get_application(&self, name: &str, path: &str) -> Result<Option<ApplicationRecord>, DbError>;
	async fn get_application_by_id(&self, id: Uuid) -> Result<Option<ApplicationRecord>, DbError>;
	async fn update_application(&self, application: &ApplicationRecord) -> Result<(), DbError>;
	async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, DbError>;
	async fn list_real_applications(&self) -> Result<Vec<ApplicationRecord>, DbError>;
	async fn has_hidden_applications(&self) -> Result<bool, DbError>;
	async fn set_application_hidden(&self, id: Uuid, hidden: bool) -> Result<(), DbError>;
	async fn list_blacklisted_boards(&self, application_id: Uuid) -> Result<Vec<BoardRecord>, DbError>;
	async fn list_whitelisted_boards(&self, application_id: Uuid) -> Result<Vec<BoardRecord>, DbError>;
	async fn link_application(&self, link: &ApplicationLink) -> Result<LinkOutcome, DbError>;

	// USB devices and ports
	async fn get_or_create_usb_device(
		&self,
		usb_id: &str,
		tag: Option<&str>,
	) -> Result<(UsbDeviceRecord, bool), DbError>;
	async fn list_usb_devices(&self) -> Result<Vec<UsbDeviceRecord>, DbError>;
	async fn detach_all_ports(&self) -> Result<u64, DbError>;
	async fn upsert_port(&self, path: &str, usb_device_id: Option<Uuid>) -> Result<PortRecord, DbError>;
	async fn list_ports(&self) -> Result<Vec<PortRecord>, DbError>;

	// Jobs
	async fn create_job(&self, job: &JobRecord) -> Result<(), DbError>;
	async fn list_jobs_for_board(&self, board_id: Uuid) -> Result<Vec<JobRecord>, DbError>;
	async fn add_prototype_job(&self, board_id: Uuid, job_id: Uuid) -> Result<bool, DbError>;
	async fn list_prototype_jobs(&self, board_id: Uuid) -> Result<Vec<JobRecord>, DbError>;
}

#[derive(Clone)]
pub struct CatalogRepository {
	pub(crate) pool: SqlitePool,
}

impl CatalogRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}

#[async_trait]
impl CatalogStore for CatalogRepository {
	async fn create_repository(&self, repo: &RepositoryRecord) -> Result<(), DbError> {
		CatalogRepository::create_repository(self, repo).await
	}

	async fn update_repository(&self, repo: &RepositoryRecord) -> Result<(), DbError> {
		CatalogRepository::update_repository(self, repo).await
	}

	async fn get_repository_by_id(&self, id: Uuid) -> Result<Option<RepositoryRecord>, DbError> {
		CatalogRepository::get_repository_by_id(self, id).await
	}

	async fn get_repository_by_url(&self, url: &str) -> Result<Option<RepositoryRecord>, DbError> {
		CatalogRepository::get_repository_by_url(self, url).await
	}

	async fn get_default_repository(&self) -> Result<Option<RepositoryRecord>, DbError> {
		CatalogRepository::get_default_repository(self).await
	}

	async fn list_repositories(&self) -> Result<Vec<RepositoryRecord>, DbError> {
		CatalogRepository::list_repositories(self).await
	}

	async fn delete_repository(&self, id: Uuid) -> Result<bool, DbError> {
		CatalogRepository::delete_repository(self, id).await
	}

	async fn get_or_create_application_tree(
		&self,
		repo_id: Uuid,
		tree_name: &str,
		application_id: Option<Uuid>,
	) -> Result<(ApplicationTreeRecord, bool), DbError> {
		CatalogRepository::get_or_create_application_tree(self, repo_id, tree_name, application_id).await
	}

	async fn list_application_trees(&self, repo_id: Uuid) -> Result<Vec<ApplicationTreeRecord>, DbError> {
		CatalogRepository::list_application_trees(self, repo_id).await
	}

	async fn list_application_tree_names(&self, repo_id: Uuid) -> Result<Vec<String>, DbError> {
		CatalogRepository::list_application_tree_names(self, repo_id).await
	}

	async fn get_application_tree_by_application(
		&self,
		application_id: Uuid,
	) -> Result<Option<ApplicationTreeRecord>, DbError> {
		CatalogRepository::get_application_tree_by_application(self, application_id).await
	}

	async fn get_or_create_board(&self, riot_name: &str) -> Result<(BoardRecord, bool), DbError> {
		CatalogRepository::get_or_create_board(self, riot_name).await
	}

	async fn update_board(&self, board: &BoardRecord) -> Result<(), DbError> {
		CatalogRepository::update_board(self, board).await
	}

	async fn get_board_by_name(&self, riot_name: &str) -> Result<Option<BoardRecord>, DbError> {
		CatalogRepository::get_board_by_name(self, riot_name).await
	}

	async fn list_boards(&self) -> Result<Vec<BoardRecord>, DbError> {
		CatalogRepository::list_boards(self).await
	}

	async fn list_real_boards(&self) -> Result<Vec<BoardRecord>, DbError> {
		CatalogRepository::list_real_boards(self).await
	}

	async fn has_hidden_boards(&self) -> Result<bool, DbError> {
		CatalogRepository::has_hidden_boards(self).await
	}

	async fn set_board_hidden(&self, riot_name: &str, hidden: bool) -> Result<(), DbError> {
		CatalogRepository::set_board_hidden(self, riot_name, hidden).await
	}

	async fn set_board_usb_device(
		&self,
		riot_name: &str,
		usb_device_id: Option<Uuid>,
	) -> Result<(), DbError> {
		CatalogRepository::set_board_usb_device(self, riot_name, usb_device_id).await
	}

	async fn get_or_create_application(
		&self,
		name: &str,
		path: &str,
	) -> Result<(ApplicationRecord, bool), DbError> {
		CatalogRepository::get_or_create_application(self, name, path).await
	}

	async fn get_application(&self, name: &str, path: &str) -> Result<Option<ApplicationRecord>, DbError> {
		CatalogRepository::get_application(self, name, path).await
	}

	async fn get_application_by_id(&self, id: Uuid) -> Result<Option<ApplicationRecord>, DbError> {
		CatalogRepository::get_application_by_id(self, id).await
	}

	async fn update_application(&self, application: &ApplicationRecord) -> Result<(), DbError> {
		CatalogRepository::update_application(self, application).await
	}

	async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, DbError> {
		CatalogRepository::list_applications(self).await
	}

	async fn list_real_applications(&self) -> Result<Vec<ApplicationRecord>, DbError> {
		CatalogRepository::list_real_applications(self).await
	}

	async fn has_hidden_applications(&self) -> Result<bool, DbError> {
		CatalogRepository::has_hidden_applications(self).await
	}

	async fn set_application_hidden(&self, id: Uuid, hidden: bool) -> Result<(), DbError> {
		CatalogRepository::set_application_hidden(self, id, hidden).await
	}

	async fn list_blacklisted_boards(&self, application_id: Uuid) -> Result<Vec<BoardRecord>, DbError> {
		CatalogRepository::list_blacklisted_boards(self, application_id).await
	}

	async fn list_whitelisted_boards(&self, application_id: Uuid) -> Result<Vec<BoardRecord>, DbError> {
		CatalogRepository::list_whitelisted_boards(self, application_id).await
	}

	async fn link_application(&self, link: &ApplicationLink) -> Result<LinkOutcome, DbError> {
		CatalogRepository::link_application(self, link).await
	}

	async fn get_or_create_usb_device(
		&self,
		usb_id: &str,
		tag: Option<&str>,
	) -> Result<(UsbDeviceRecord, bool), DbError> {
		CatalogRepository::get_or_create_usb_device(self, usb_id, tag).await
	}

	async fn list_usb_devices(&self) -> Result<Vec<UsbDeviceRecord>, DbError> {
		CatalogRepository::list_usb_devices(self).await
	}

	async fn detach_all_ports(&self) -> Result<u64, DbError> {
		CatalogRepository::detach_all_ports(self).await
	}

	async fn upsert_port(&self, path: &str, usb_device_id: Option<Uuid>) -> Result<PortRecord, DbError> {
		CatalogRepository::upsert_port(self, path, usb_device_id).await
	}

	async fn list_ports(&self) -> Result<Vec<PortRecord>, DbError> {
		CatalogRepository::list_ports(self).await
	}

	async fn create_job(&self, job: &JobRecord) -> Result<(), DbError> {
		CatalogRepository::create_job(self, job).await
	}

	async fn list_jobs_for_board(&self, board_id: Uuid) -> Result<Vec<JobRecord>, DbError> {
		CatalogRepository::list_jobs_for_board(self, board_id).await
	}

	async fn add_prototype_job(&self, board_id: Uuid, job_id: Uuid) -> Result<bool, DbError> {
		CatalogRepository::add_prototype_job(self, board_id, job_id).await
	}

	async fn list_prototype_jobs(&self, board_id: Uuid) -> Result<Vec<JobRecord>, DbError> {
		CatalogRepository::list_prototype_jobs(self, board_id).await
	}
}
