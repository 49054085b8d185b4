// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bac_db::{
	ApplicationTreeRecord, CatalogStore, DbError, JobRecord, RepositoryRecord,
};
use bac_vcs::{ensure_clone, normalize_path, origin_url, repo_dir_from_url, Node, TreeSnapshot};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::applications::{link_from_makefile, sync_applications, ApplicationSyncReport};
use crate::boards::{sync_boards, BoardSyncReport};
use crate::error::{Result, SyncError};
use crate::jobs::{job_path, JobNamespace};
use crate::makefile::read_makefile;
use crate::provider::SnapshotProvider;
use crate::usb::{reconcile_usb_devices, UsbDeviceInfo, UsbReconcileReport};

#[derive(Debug, Clone)]
pub struct CatalogSettings {
	/// Directory holding one checkout per repository.
	pub repo_base_path: PathBuf,
	pub jobs_path: PathBuf,
	/// Branch recorded for repositories added from a URL or a path.
	pub default_branch: String,
}

/// Declared trees and flags for a repository added from a URL or a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryOptions {
	pub boards_tree: Option<String>,
	pub cpu_tree: Option<String>,
	pub is_default: bool,
	/// Overrides [`CatalogSettings::default_branch`].
	pub branch: Option<String>,
}

impl RepositoryOptions {
	fn apply(&self, repo: &mut RepositoryRecord) {
		repo.has_boards_tree = self.boards_tree.is_some();
		repo.boards_tree = self.boards_tree.clone();
		repo.has_cpu_tree = self.cpu_tree.is_some();
		repo.cpu_tree = self.cpu_tree.clone();
		repo.is_default = self.is_default;
		if let Some(branch) = &self.branch {
			repo.default_branch = branch.clone();
		}
	}
}

/// Check every directory a repository declares against its head snapshot.
pub fn validate_repository(snapshot: &dyn TreeSnapshot, repo: &RepositoryRecord) -> Result<()> {
	let declared = [
		("boards_tree", repo.has_boards_tree, repo.boards_tree.as_deref()),
		("cpu_tree", repo.has_cpu_tree, repo.cpu_tree.as_deref()),
	];
	for (field, flag, path) in declared {
		if !flag {
			continue;
		}
		let path = path.unwrap_or_default();
		let normalized = normalize_path(path);
		if normalized.is_empty() {
			return Err(SyncError::MissingTreePath(field));
		}
		if !matches!(snapshot.resolve(&normalized), Ok(Node::Directory(_))) {
			return Err(SyncError::ValidationFailed(path.to_string()));
		}
	}
	Ok(())
}

/// Entry point for every catalog mutation driven by repository contents.
///
/// Sync passes, repository creation and USB reconciliation are serialized on
/// one lock; each opens a fresh head snapshot.
pub struct RepositoryCatalog {
	store: Arc<dyn CatalogStore>,
	snapshots: Arc<dyn SnapshotProvider>,
	settings: CatalogSettings,
	sync_lock: Mutex<()>,
}

impl RepositoryCatalog {
	pub fn new(
		store: Arc<dyn CatalogStore>,
		snapshots: Arc<dyn SnapshotProvider>,
		settings: CatalogSettings,
	) -> Self {
		Self {
			store,
			snapshots,
			settings,
			sync_lock: Mutex::new(()),
		}
	}

	pub fn store(&self) -> &Arc<dyn CatalogStore> {
		&self.store
	}

	pub fn settings(&self) -> &CatalogSettings {
		&self.settings
	}

	// =========================================================================
	// Repositories
	// =========================================================================

	/// Validate, persist, then run Board Sync once when the boards tree is
	/// present in the snapshot.
	#[instrument(skip(self, repo), fields(url = %repo.url, path = %repo.path))]
	pub async fn create(&self, repo: RepositoryRecord) -> Result<RepositoryRecord> {
		let _guard = self.sync_lock.lock().await;
		let snapshot = self.snapshots.open(&repo)?;
		validate_repository(snapshot.as_ref(), &repo)?;

		self.store.create_repository(&repo).await?;
		info!(repo_id = %repo.id, "repository created");

		if let (true, Some(tree)) = (repo.has_boards_tree, repo.boards_tree.as_deref()) {
			let tree = normalize_path(tree);
			let present = snapshot
				.walk()?
				.iter()
				.any(|entry| normalize_path(&entry.path) == tree);
			if present {
				let default_repo = self.store.get_default_repository().await?;
				sync_boards(snapshot.as_ref(), self.store.as_ref(), &repo, default_repo.as_ref()).await?;
			}
		}

		Ok(repo)
	}

	/// Validate and save changes to an existing repository. Boards are not
	/// re-synced.
	#[instrument(skip(self, repo), fields(repo_id = %repo.id))]
	pub async fn update(&self, repo: &RepositoryRecord) -> Result<()> {
		let snapshot = self.snapshots.open(repo)?;
		validate_repository(snapshot.as_ref(), repo)?;
		self.store.update_repository(repo).await?;
		debug!("repository updated");
		Ok(())
	}

	/// Clone `url` below the base path if needed and return its repository,
	/// creating the record on first sight. `options` only apply to a new
	/// record.
	#[instrument(skip(self, options))]
	pub async fn create_from_url(
		&self,
		url: &str,
		options: &RepositoryOptions,
	) -> Result<(RepositoryRecord, bool)> {
		let dir = repo_dir_from_url(url)?;
		ensure_clone(url, &self.settings.repo_base_path.join(&dir)).await?;
		self.get_or_create(url, &dir, options).await
	}

	/// Register an existing checkout. The `origin` remote supplies the URL;
	/// without one the path itself is used.
	#[instrument(skip(self, options), fields(path = %path.display()))]
	pub async fn create_from_path(
		&self,
		path: &Path,
		options: &RepositoryOptions,
	) -> Result<(RepositoryRecord, bool)> {
		let url = origin_url(path)?.unwrap_or_else(|| path.display().to_string());
		let stored_path = path
			.strip_prefix(&self.settings.repo_base_path)
			.unwrap_or(path)
			.to_string_lossy()
			.to_string();
		self.get_or_create(&url, &stored_path, options).await
	}

	async fn get_or_create(
		&self,
		url: &str,
		path: &str,
		options: &RepositoryOptions,
	) -> Result<(RepositoryRecord, bool)> {
		if let Some(existing) = self.store.get_repository_by_url(url).await? {
			if existing.path != path {
				return Err(DbError::Conflict(format!(
					"repository {url} is already checked out at {}",
					existing.path
				))
				.into());
			}
			return Ok((existing, false));
		}

		let mut repo = RepositoryRecord::new(url, path);
		repo.default_branch = self.settings.default_branch.clone();
		options.apply(&mut repo);
		Ok((self.create(repo).await?, true))
	}

	async fn repository(&self, id: Uuid) -> Result<RepositoryRecord> {
		self.store
			.get_repository_by_id(id)
			.await?
			.ok_or_else(|| SyncError::NotFound(format!("repository {id}")))
	}

	// =========================================================================
	// Application trees
	// =========================================================================

	#[instrument(skip(self), fields(repo_id = %repo_id, tree_name = %tree_name))]
	pub async fn declare_application_tree(
		&self,
		repo_id: Uuid,
		tree_name: &str,
	) -> Result<(ApplicationTreeRecord, bool)> {
		let repo = self.repository(repo_id).await?;
		let tree = normalize_path(tree_name);
		let snapshot = self.snapshots.open(&repo)?;
		if tree.is_empty() || !snapshot.is_directory(&tree)? {
			return Err(SyncError::ValidationFailed(tree_name.to_string()));
		}

		let (record, created) = self
			.store
			.get_or_create_application_tree(repo.id, &tree, None)
			.await?;
		if created {
			info!("application tree declared");
		}
		Ok((record, created))
	}

	/// Distinct application tree names of a repository, sorted.
	pub async fn unique_application_trees(&self, repo_id: Uuid) -> Result<Vec<String>> {
		Ok(self.store.list_application_tree_names(repo_id).await?)
	}

	pub async fn has_application_trees(&self, repo_id: Uuid) -> Result<bool> {
		Ok(!self.store.list_application_tree_names(repo_id).await?.is_empty())
	}

	// =========================================================================
	// Sync passes
	// =========================================================================

	#[instrument(skip(self), fields(repo_id = %repo_id))]
	pub async fn sync_boards(&self, repo_id: Uuid) -> Result<BoardSyncReport> {
		let _guard = self.sync_lock.lock().await;
		let repo = self.repository(repo_id).await?;
		let snapshot = self.snapshots.open(&repo)?;
		let default_repo = self.store.get_default_repository().await?;
		sync_boards(snapshot.as_ref(), self.store.as_ref(), &repo, default_repo.as_ref()).await
	}

	#[instrument(skip(self), fields(repo_id = %repo_id))]
	pub async fn sync_applications(&self, repo_id: Uuid) -> Result<ApplicationSyncReport> {
		let _guard = self.sync_lock.lock().await;
		let repo = self.repository(repo_id).await?;
		let snapshot = self.snapshots.open(&repo)?;
		sync_applications(snapshot.as_ref(), self.store.as_ref(), &repo).await
	}

	/// Re-derive a hidden application from its Makefile. Returns `false`
	/// without touching anything when the application is not hidden.
	#[instrument(skip(self), fields(application_id = %application_id))]
	pub async fn renew_application(&self, application_id: Uuid) -> Result<bool> {
		let _guard = self.sync_lock.lock().await;
		let mut application = self
			.store
			.get_application_by_id(application_id)
			.await?
			.ok_or_else(|| SyncError::NotFound(format!("application {application_id}")))?;
		if !application.no_application {
			debug!("application is not hidden, nothing to renew");
			return Ok(false);
		}

		let path = application
			.path
			.clone()
			.ok_or_else(|| SyncError::NotFound(format!("path of application {application_id}")))?;
		let tree = self
			.store
			.get_application_tree_by_application(application_id)
			.await?
			.ok_or_else(|| SyncError::NotFound(format!("repository of application {application_id}")))?;
		let repo = self.repository(tree.repo_id).await?;
		let snapshot = self.snapshots.open(&repo)?;

		let makefile = read_makefile(snapshot.as_ref(), &path)?;
		application.name = makefile.name.clone();
		self.store.update_application(&application).await?;

		let boards = self.store.list_boards().await?;
		link_from_makefile(self.store.as_ref(), &application, &makefile, &boards, None).await?;
		info!(application = %application.name, "application renewed");
		Ok(true)
	}

	// =========================================================================
	// Hidden flags
	// =========================================================================

	#[instrument(skip(self))]
	pub async fn set_board_hidden(&self, riot_name: &str, hidden: bool) -> Result<()> {
		self.store.set_board_hidden(riot_name, hidden).await?;
		info!("board visibility changed");
		Ok(())
	}

	#[instrument(skip(self))]
	pub async fn set_application_hidden(&self, application_id: Uuid, hidden: bool) -> Result<()> {
		self.store.set_application_hidden(application_id, hidden).await?;
		info!("application visibility changed");
		Ok(())
	}

	// =========================================================================
	// USB devices and jobs
	// =========================================================================

	pub async fn reconcile_usb(&self, devices: &[UsbDeviceInfo]) -> Result<UsbReconcileReport> {
		let _guard = self.sync_lock.lock().await;
		reconcile_usb_devices(self.store.as_ref(), devices).await
	}

	/// Create a job for a board, optionally marking it as one of the board's
	/// prototypes.
	#[instrument(skip(self))]
	pub async fn create_job(
		&self,
		riot_name: &str,
		name: &str,
		namespace: JobNamespace,
		prototype: bool,
	) -> Result<JobRecord> {
		let board = self
			.store
			.get_board_by_name(riot_name)
			.await?
			.ok_or_else(|| SyncError::NotFound(format!("board {riot_name}")))?;
		let job = JobRecord {
			id: Uuid::new_v4(),
			namespace: namespace.as_str().to_string(),
			name: name.to_string(),
			board_id: board.id,
		};
		self.store.create_job(&job).await?;
		if prototype {
			self.store.add_prototype_job(board.id, job.id).await?;
		}
		Ok(job)
	}

	pub fn job_path(&self, job: &JobRecord) -> PathBuf {
		job_path(&self.settings.jobs_path, &job.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::fixtures::MemoryProvider;
	use crate::provider::CheckoutProvider;
	use bac_db::testing::create_catalog_test_pool;
	use bac_db::CatalogRepository;
	use bac_vcs::testing::{bare_repo_with_files, set_origin};
	use bac_vcs::MemorySnapshot;

	const RIOT_URL: &str = "https://github.com/RIOT-OS/RIOT.git";

	fn riot_snapshot() -> MemorySnapshot {
		MemorySnapshot::new()
			.with_directory("boards/native")
			.with_directory("boards/iotlab-m3")
			.with_directory("cpu/native")
			.with_file("boards/README", "boards\n")
			.with_file(
				"examples/default/Makefile",
				"PROJECT = default\nBOARD_BLACKLIST = native\n",
			)
	}

	async fn catalog(provider: MemoryProvider) -> RepositoryCatalog {
		let store = CatalogRepository::new(create_catalog_test_pool().await);
		RepositoryCatalog::new(
			Arc::new(store),
			Arc::new(provider),
			CatalogSettings {
				repo_base_path: PathBuf::from("/srv/repos"),
				jobs_path: PathBuf::from("/srv/jobs"),
				default_branch: "master".to_string(),
			},
		)
	}

	fn riot_repo() -> RepositoryRecord {
		let mut repo = RepositoryRecord::new(RIOT_URL, "RIOT");
		repo.has_boards_tree = true;
		repo.boards_tree = Some("boards".to_string());
		repo.has_cpu_tree = true;
		repo.cpu_tree = Some("cpu".to_string());
		repo.is_default = true;
		repo
	}

	#[test]
	fn test_validate_repository() {
		let snapshot = riot_snapshot();
		assert!(validate_repository(&snapshot, &riot_repo()).is_ok());

		let mut repo = riot_repo();
		repo.boards_tree = Some("boards/README".to_string());
		assert!(matches!(
			validate_repository(&snapshot, &repo),
			Err(SyncError::ValidationFailed(p)) if p == "boards/README"
		));

		let mut repo = riot_repo();
		repo.cpu_tree = Some("missing".to_string());
		assert!(validate_repository(&snapshot, &repo).is_err());

		let mut repo = riot_repo();
		repo.boards_tree = None;
		assert!(matches!(
			validate_repository(&snapshot, &repo),
			Err(SyncError::MissingTreePath("boards_tree"))
		));

		let mut repo = riot_repo();
		repo.cpu_tree = Some("  ".to_string());
		let err = validate_repository(&snapshot, &repo).unwrap_err();
		assert_eq!(err.to_string(), "cpu_tree is enabled but no path is given");

		let mut repo = riot_repo();
		repo.has_boards_tree = false;
		repo.boards_tree = Some("missing".to_string());
		repo.has_cpu_tree = false;
		assert!(validate_repository(&snapshot, &repo).is_ok());
	}

	#[tokio::test]
	async fn test_create_runs_board_sync_once() {
		let catalog = catalog(MemoryProvider::default().with(RIOT_URL, riot_snapshot())).await;
		let repo = catalog.create(riot_repo()).await.unwrap();

		let boards = catalog.store().list_boards().await.unwrap();
		assert_eq!(boards.len(), 2);
		for board in &boards {
			assert_eq!(board.repo_id, Some(repo.id));
			assert_eq!(board.cpu_repo_id, Some(repo.id));
		}
	}

	#[tokio::test]
	async fn test_create_with_file_boards_tree_persists_nothing() {
		let catalog = catalog(MemoryProvider::default().with(RIOT_URL, riot_snapshot())).await;
		let mut repo = riot_repo();
		repo.boards_tree = Some("boards/README".to_string());

		let result = catalog.create(repo).await;
		assert!(matches!(result, Err(SyncError::ValidationFailed(_))));
		assert!(catalog.store().list_repositories().await.unwrap().is_empty());
		assert!(catalog.store().list_boards().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_update_validates_without_syncing() {
		let catalog = catalog(MemoryProvider::default().with(RIOT_URL, riot_snapshot())).await;
		let mut repo = RepositoryRecord::new(RIOT_URL, "RIOT");
		repo = catalog.create(repo).await.unwrap();
		assert!(catalog.store().list_boards().await.unwrap().is_empty());

		repo.has_boards_tree = true;
		repo.boards_tree = Some("cpu/native/missing".to_string());
		assert!(matches!(
			catalog.update(&repo).await,
			Err(SyncError::ValidationFailed(_))
		));

		repo.boards_tree = Some("boards".to_string());
		catalog.update(&repo).await.unwrap();
		assert!(catalog.store().list_boards().await.unwrap().is_empty());

		let stored = catalog.store().get_repository_by_id(repo.id).await.unwrap().unwrap();
		assert!(stored.has_boards_tree);
	}

	#[tokio::test]
	async fn test_application_trees_and_sync() {
		let catalog = catalog(MemoryProvider::default().with(RIOT_URL, riot_snapshot())).await;
		let repo = catalog.create(riot_repo()).await.unwrap();
		assert!(!catalog.has_application_trees(repo.id).await.unwrap());

		let result = catalog.declare_application_tree(repo.id, "boards/README").await;
		assert!(matches!(result, Err(SyncError::ValidationFailed(_))));

		let (_, created) = catalog.declare_application_tree(repo.id, "examples").await.unwrap();
		assert!(created);
		let (_, created) = catalog.declare_application_tree(repo.id, "./examples/").await.unwrap();
		assert!(!created);
		assert_eq!(
			catalog.unique_application_trees(repo.id).await.unwrap(),
			vec!["examples".to_string()]
		);

		let report = catalog.sync_applications(repo.id).await.unwrap();
		assert_eq!(report.created, 1);
		assert!(catalog.has_application_trees(repo.id).await.unwrap());
	}

	#[tokio::test]
	async fn test_renew_hidden_application() {
		let provider = Arc::new(MemoryProvider::default().with(RIOT_URL, riot_snapshot()));
		let store = Arc::new(CatalogRepository::new(create_catalog_test_pool().await));
		let catalog = RepositoryCatalog::new(
			store.clone(),
			provider.clone(),
			CatalogSettings {
				repo_base_path: PathBuf::from("/srv/repos"),
				jobs_path: PathBuf::from("/srv/jobs"),
				default_branch: "master".to_string(),
			},
		);
		let repo = catalog.create(riot_repo()).await.unwrap();
		catalog.declare_application_tree(repo.id, "examples").await.unwrap();
		catalog.sync_applications(repo.id).await.unwrap();
		let app = store
			.get_application("default", "examples/default")
			.await
			.unwrap()
			.unwrap();

		assert!(!catalog.renew_application(app.id).await.unwrap());

		catalog.set_application_hidden(app.id, true).await.unwrap();
		let report = catalog.sync_applications(repo.id).await.unwrap();
		assert_eq!(report.hidden, 1);

		provider.insert(
			RIOT_URL,
			riot_snapshot().with_file(
				"examples/default/Makefile",
				"PROJECT = renamed\nBOARD_WHITELIST = iotlab-m3 native\n",
			),
		);

		assert!(catalog.renew_application(app.id).await.unwrap());
		let renewed = store.get_application_by_id(app.id).await.unwrap().unwrap();
		assert_eq!(renewed.name, "renamed");
		assert!(renewed.no_application);

		let white: Vec<String> = store
			.list_whitelisted_boards(app.id)
			.await
			.unwrap()
			.into_iter()
			.map(|b| b.riot_name)
			.collect();
		assert_eq!(white, vec!["iotlab-m3".to_string()]);
	}

	#[tokio::test]
	async fn test_hidden_board_flags() {
		let catalog = catalog(MemoryProvider::default().with(RIOT_URL, riot_snapshot())).await;
		let repo = catalog.create(riot_repo()).await.unwrap();

		catalog.set_board_hidden("native", true).await.unwrap();
		assert!(catalog.store().has_hidden_boards().await.unwrap());
		assert_eq!(catalog.store().list_real_boards().await.unwrap().len(), 1);

		catalog.sync_boards(repo.id).await.unwrap();
		assert_eq!(catalog.store().list_real_boards().await.unwrap().len(), 1);

		catalog.set_board_hidden("native", false).await.unwrap();
		assert!(!catalog.store().has_hidden_boards().await.unwrap());
	}

	#[tokio::test]
	async fn test_jobs() {
		let catalog = catalog(MemoryProvider::default().with(RIOT_URL, riot_snapshot())).await;
		catalog.create(riot_repo()).await.unwrap();

		let job = catalog
			.create_job("native", "native-flash", JobNamespace::Riot, true)
			.await
			.unwrap();
		assert_eq!(catalog.job_path(&job), PathBuf::from("/srv/jobs/native-flash"));

		let board = catalog.store().get_board_by_name("native").await.unwrap().unwrap();
		assert_eq!(catalog.store().list_prototype_jobs(board.id).await.unwrap(), vec![job]);

		let missing = catalog
			.create_job("unknown", "x", JobNamespace::Thirdparty, false)
			.await;
		assert!(matches!(missing, Err(SyncError::NotFound(_))));
	}

	#[tokio::test]
	async fn test_create_from_url_reuses_checkout_and_record() {
		let base = tempfile::tempdir().unwrap();
		std::fs::create_dir(base.path().join("RIOT")).unwrap();
		let store = CatalogRepository::new(create_catalog_test_pool().await);
		let catalog = RepositoryCatalog::new(
			Arc::new(store),
			Arc::new(MemoryProvider::default().with(RIOT_URL, riot_snapshot())),
			CatalogSettings {
				repo_base_path: base.path().to_path_buf(),
				jobs_path: base.path().join("jobs"),
				default_branch: "main".to_string(),
			},
		);
		let options = RepositoryOptions {
			boards_tree: Some("boards".to_string()),
			is_default: true,
			..Default::default()
		};

		let (repo, created) = catalog.create_from_url(RIOT_URL, &options).await.unwrap();
		assert!(created);
		assert_eq!(repo.path, "RIOT");
		assert_eq!(repo.default_branch, "main");
		assert!(repo.has_boards_tree);
		assert_eq!(catalog.store().list_boards().await.unwrap().len(), 2);

		let (again, created) = catalog
			.create_from_url(RIOT_URL, &RepositoryOptions::default())
			.await
			.unwrap();
		assert!(!created);
		assert_eq!(again.id, repo.id);
	}

	fn checkout_catalog(store: CatalogRepository, base: &Path) -> RepositoryCatalog {
		RepositoryCatalog::new(
			Arc::new(store),
			Arc::new(CheckoutProvider::new(base)),
			CatalogSettings {
				repo_base_path: base.to_path_buf(),
				jobs_path: base.join("jobs"),
				default_branch: "master".to_string(),
			},
		)
	}

	const RIOT_FILES: &[(&str, &str)] = &[
		("boards/native/Makefile", "MODULE = board\n"),
		("boards/iotlab-m3/Makefile", "MODULE = board\n"),
		(
			"examples/hello-world/Makefile",
			"PROJECT = hello-world\nBOARD_BLACKLIST = native\n",
		),
	];

	#[tokio::test]
	async fn test_create_from_path_without_origin_syncs_checkout() {
		let base = tempfile::tempdir().unwrap();
		let checkout = base.path().join("RIOT");
		bare_repo_with_files(&checkout, "master", RIOT_FILES);
		let catalog = checkout_catalog(
			CatalogRepository::new(create_catalog_test_pool().await),
			base.path(),
		);
		let options = RepositoryOptions {
			boards_tree: Some("boards".to_string()),
			is_default: true,
			..Default::default()
		};

		let (repo, created) = catalog.create_from_path(&checkout, &options).await.unwrap();
		assert!(created);
		assert_eq!(repo.path, "RIOT");
		assert_eq!(repo.url, checkout.display().to_string());

		let boards = catalog.store().list_boards().await.unwrap();
		let names: Vec<_> = boards.iter().map(|b| b.riot_name.as_str()).collect();
		assert_eq!(names, vec!["iotlab-m3", "native"]);
		assert!(boards.iter().all(|b| b.cpu_repo_id == Some(repo.id)));

		catalog.declare_application_tree(repo.id, "examples").await.unwrap();
		let report = catalog.sync_applications(repo.id).await.unwrap();
		assert_eq!(report.created, 1);
		let app = catalog
			.store()
			.get_application("hello-world", "examples/hello-world")
			.await
			.unwrap()
			.unwrap();
		let blacklisted = catalog.store().list_blacklisted_boards(app.id).await.unwrap();
		assert_eq!(blacklisted.len(), 1);
		assert_eq!(blacklisted[0].riot_name, "native");

		let (again, created) = catalog
			.create_from_path(&checkout, &RepositoryOptions::default())
			.await
			.unwrap();
		assert!(!created);
		assert_eq!(again.id, repo.id);
		assert_eq!(catalog.store().list_repositories().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_create_from_path_takes_origin_url() {
		let base = tempfile::tempdir().unwrap();
		let elsewhere = tempfile::tempdir().unwrap();
		let checkout = elsewhere.path().join("apps");
		bare_repo_with_files(&checkout, "master", RIOT_FILES);
		set_origin(&checkout, RIOT_URL);
		let catalog = checkout_catalog(
			CatalogRepository::new(create_catalog_test_pool().await),
			base.path(),
		);

		let (repo, created) = catalog
			.create_from_path(&checkout, &RepositoryOptions::default())
			.await
			.unwrap();
		assert!(created);
		assert_eq!(repo.url, RIOT_URL);
		assert_eq!(repo.path, checkout.to_string_lossy());
		assert!(catalog.store().list_boards().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_unknown_repository() {
		let catalog = catalog(MemoryProvider::default()).await;
		let result = catalog.sync_boards(Uuid::new_v4()).await;
		assert!(matches!(result, Err(SyncError::NotFound(_))));
	}
}
