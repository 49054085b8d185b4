// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashSet;

use bac_db::{ApplicationLink, ApplicationRecord, BoardRecord, CatalogStore, RepositoryRecord};
use bac_vcs::{join_path, normalize_path, TreeSnapshot};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::makefile::{read_makefile, MakefileInfo};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationSyncReport {
	pub created: usize,
	pub linked: usize,
	pub hidden: usize,
	pub skipped: usize,
}

/// Board ids to add to each list of one application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPlan {
	pub blacklist: Vec<Uuid>,
	pub whitelist: Vec<Uuid>,
}

impl ListPlan {
	pub fn is_empty(&self) -> bool {
		self.blacklist.is_empty() && self.whitelist.is_empty()
	}
}

/// Decide which known boards join which list.
///
/// A board goes to the blacklist when the Makefile names it there and it is
/// not already whitelisted; it goes to the whitelist when named there and
/// neither already nor newly blacklisted. Board names nobody knows are
/// dropped.
pub fn plan_lists(
	info: &MakefileInfo,
	boards: &[BoardRecord],
	blacklisted: &HashSet<Uuid>,
	whitelisted: &HashSet<Uuid>,
) -> ListPlan {
	let named_black: HashSet<&str> = info.blacklist.iter().map(String::as_str).collect();
	let named_white: HashSet<&str> = info.whitelist.iter().map(String::as_str).collect();
	let mut plan = ListPlan::default();

	for board in boards {
		let name = board.riot_name.as_str();
		let mut black = blacklisted.contains(&board.id);
		if named_black.contains(name) && !black && !whitelisted.contains(&board.id) {
			plan.blacklist.push(board.id);
			black = true;
		}
		if named_white.contains(name) && !black && !whitelisted.contains(&board.id) {
			plan.whitelist.push(board.id);
		}
	}

	plan
}

/// Re-derive list memberships for one application and write them together
/// with its tree entry.
pub(crate) async fn link_from_makefile(
	store: &dyn CatalogStore,
	application: &ApplicationRecord,
	info: &MakefileInfo,
	boards: &[BoardRecord],
	tree: Option<(Uuid, String)>,
) -> Result<bool> {
	let blacklisted: HashSet<Uuid> = store
		.list_blacklisted_boards(application.id)
		.await?
		.into_iter()
		.map(|b| b.id)
		.collect();
	let whitelisted: HashSet<Uuid> = store
		.list_whitelisted_boards(application.id)
		.await?
		.into_iter()
		.map(|b| b.id)
		.collect();

	let plan = plan_lists(info, boards, &blacklisted, &whitelisted);
	let outcome = store
		.link_application(&ApplicationLink {
			application_id: application.id,
			tree,
			blacklist: plan.blacklist,
			whitelist: plan.whitelist,
		})
		.await?;

	let changed = outcome.tree_created || outcome.blacklisted > 0 || outcome.whitelisted > 0;
	if changed {
		debug!(
			application = %application.name,
			blacklisted = outcome.blacklisted,
			whitelisted = outcome.whitelisted,
			"application lists updated"
		);
	}
	Ok(changed)
}

/// Discover applications under every declared tree of `repo`.
///
/// Subdirectories without a Makefile, with a Makefile that is not a file,
/// or without `PROJECT` are passed over. Existing hidden applications keep
/// their state.
#[instrument(skip(snapshot, store, repo), fields(repo = %repo.url))]
pub async fn sync_applications(
	snapshot: &dyn TreeSnapshot,
	store: &dyn CatalogStore,
	repo: &RepositoryRecord,
) -> Result<ApplicationSyncReport> {
	let mut report = ApplicationSyncReport::default();
	let boards = store.list_boards().await?;

	for tree_name in store.list_application_tree_names(repo.id).await? {
		let tree_name = normalize_path(&tree_name);
		for dir in snapshot.subdirectories(&tree_name)? {
			let app_path = join_path(&tree_name, &dir);
			let info = match read_makefile(snapshot, &app_path) {
				Ok(info) => info,
				Err(e) if e.is_skippable() => {
					debug!(path = %app_path, error = %e, "skipping application candidate");
					report.skipped += 1;
					continue;
				}
				Err(e) => return Err(e),
			};

			let (application, created) = store.get_or_create_application(&info.name, &app_path).await?;
			if created {
				report.created += 1;
			} else if application.no_application {
				debug!(application = %info.name, path = %app_path, "application is hidden");
				report.hidden += 1;
				continue;
			}

			let tree = Some((repo.id, tree_name.clone()));
			if link_from_makefile(store, &application, &info, &boards, tree).await? {
				report.linked += 1;
			}
		}
	}

	info!(
		created = report.created,
		linked = report.linked,
		hidden = report.hidden,
		skipped = report.skipped,
		"application sync finished"
	);
	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;
	use bac_db::testing::create_catalog_test_pool;
	use bac_db::CatalogRepository;
	use bac_vcs::MemorySnapshot;

	fn board(name: &str) -> BoardRecord {
		BoardRecord {
			id: Uuid::new_v4(),
			riot_name: name.to_string(),
			path: None,
			repo_id: None,
			cpu_repo_id: None,
			usb_device_id: None,
			no_board: false,
		}
	}

	fn info(blacklist: &[&str], whitelist: &[&str]) -> MakefileInfo {
		MakefileInfo {
			name: "app".to_string(),
			blacklist: blacklist.iter().map(|s| s.to_string()).collect(),
			whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
		}
	}

	#[test]
	fn test_plan_blacklist_takes_precedence() {
		let boards = vec![board("native"), board("iotlab-m3")];
		let plan = plan_lists(
			&info(&["native"], &["native", "iotlab-m3", "unknown"]),
			&boards,
			&HashSet::new(),
			&HashSet::new(),
		);
		assert_eq!(plan.blacklist, vec![boards[0].id]);
		assert_eq!(plan.whitelist, vec![boards[1].id]);
	}

	#[test]
	fn test_plan_respects_existing_memberships() {
		let boards = vec![board("native"), board("iotlab-m3")];
		let whitelisted: HashSet<Uuid> = [boards[0].id].into_iter().collect();
		let blacklisted: HashSet<Uuid> = [boards[1].id].into_iter().collect();

		let plan = plan_lists(
			&info(&["native"], &["iotlab-m3"]),
			&boards,
			&blacklisted,
			&whitelisted,
		);
		assert!(plan.is_empty());
	}

	fn riot_snapshot() -> MemorySnapshot {
		MemorySnapshot::new()
			.with_directory("boards/native")
			.with_directory("boards/iotlab-m3")
			.with_file(
				"examples/default/Makefile",
				"PROJECT = default\nBOARD_BLACKLIST = native\nBOARD_WHITELIST = native iotlab-m3\n",
			)
			.with_file("examples/hello-world/Makefile", "PROJECT ?= hello-world\n")
			.with_directory("examples/no_makefile")
			.with_file("examples/no_project/Makefile", "BOARD_BLACKLIST = native\n")
			.with_directory("examples/dir_makefile/Makefile")
			.with_file("examples/README.md", "docs\n")
	}

	async fn setup() -> (CatalogRepository, RepositoryRecord) {
		let store = CatalogRepository::new(create_catalog_test_pool().await);
		let repo = RepositoryRecord::new("https://github.com/RIOT-OS/RIOT.git", "RIOT");
		store.create_repository(&repo).await.unwrap();
		store.get_or_create_board("native").await.unwrap();
		store.get_or_create_board("iotlab-m3").await.unwrap();
		store
			.get_or_create_application_tree(repo.id, "examples", None)
			.await
			.unwrap();
		(store, repo)
	}

	async fn list_names(store: &CatalogRepository, app: Uuid) -> (Vec<String>, Vec<String>) {
		let black = store.list_blacklisted_boards(app).await.unwrap();
		let white = store.list_whitelisted_boards(app).await.unwrap();
		(
			black.into_iter().map(|b| b.riot_name).collect(),
			white.into_iter().map(|b| b.riot_name).collect(),
		)
	}

	#[tokio::test]
	async fn test_sync_discovers_and_skips() {
		let (store, repo) = setup().await;
		let report = sync_applications(&riot_snapshot(), &store, &repo).await.unwrap();

		assert_eq!(report.created, 2);
		assert_eq!(report.skipped, 3);
		let names: Vec<String> = store
			.list_applications()
			.await
			.unwrap()
			.into_iter()
			.map(|a| a.name)
			.collect();
		assert_eq!(names, vec!["default".to_string(), "hello-world".to_string()]);

		let default = store
			.get_application("default", "examples/default")
			.await
			.unwrap()
			.unwrap();
		let (black, white) = list_names(&store, default.id).await;
		assert_eq!(black, vec!["native".to_string()]);
		assert_eq!(white, vec!["iotlab-m3".to_string()]);

		let tree = store
			.get_application_tree_by_application(default.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(tree.tree_name, "examples");
		assert_eq!(tree.repo_id, repo.id);
	}

	#[tokio::test]
	async fn test_sync_is_idempotent() {
		let (store, repo) = setup().await;
		let snapshot = riot_snapshot();
		sync_applications(&snapshot, &store, &repo).await.unwrap();
		let apps = store.list_applications().await.unwrap();
		let trees = store.list_application_trees(repo.id).await.unwrap();

		let report = sync_applications(&snapshot, &store, &repo).await.unwrap();
		assert_eq!(report.created, 0);
		assert_eq!(report.linked, 0);
		assert_eq!(store.list_applications().await.unwrap(), apps);
		assert_eq!(store.list_application_trees(repo.id).await.unwrap(), trees);
	}

	#[tokio::test]
	async fn test_hidden_application_is_left_alone() {
		let (store, repo) = setup().await;
		let (app, _) = store
			.get_or_create_application("default", "examples/default")
			.await
			.unwrap();
		store.set_application_hidden(app.id, true).await.unwrap();

		let report = sync_applications(&riot_snapshot(), &store, &repo).await.unwrap();
		assert_eq!(report.hidden, 1);

		let (black, white) = list_names(&store, app.id).await;
		assert!(black.is_empty());
		assert!(white.is_empty());
		assert!(store
			.get_application_tree_by_application(app.id)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_missing_tree_directory_is_an_error() {
		let (store, repo) = setup().await;
		store
			.get_or_create_application_tree(repo.id, "tests", None)
			.await
			.unwrap();
		let result = sync_applications(&riot_snapshot(), &store, &repo).await;
		assert!(matches!(result, Err(crate::SyncError::NotFound(_))));
	}
}
