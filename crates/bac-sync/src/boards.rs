// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bac_db::{CatalogStore, RepositoryRecord};
use bac_vcs::{join_path, normalize_path, TreeSnapshot};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardSyncReport {
	pub created: usize,
	pub updated: usize,
	pub unchanged: usize,
	pub hidden: usize,
}

/// Register one board per immediate subdirectory of the repository's
/// boards tree.
///
/// Hidden boards are left exactly as they are. `default_repo` becomes the
/// CPU repository of every visible board; with `None` the CPU repository a
/// board already has is left as is.
#[instrument(
	skip(snapshot, store, repo, default_repo),
	fields(repo = %repo.url, default_repo = default_repo.map(|r| r.url.as_str()))
)]
pub async fn sync_boards(
	snapshot: &dyn TreeSnapshot,
	store: &dyn CatalogStore,
	repo: &RepositoryRecord,
	default_repo: Option<&RepositoryRecord>,
) -> Result<BoardSyncReport> {
	let mut report = BoardSyncReport::default();
	let boards_tree = match (repo.has_boards_tree, repo.boards_tree.as_deref()) {
		(true, Some(tree)) => normalize_path(tree),
		_ => {
			debug!("repository has no boards tree");
			return Ok(report);
		}
	};

	for name in snapshot.subdirectories(&boards_tree)? {
		let (board, created) = store.get_or_create_board(&name).await?;
		if created {
			report.created += 1;
		}
		if board.no_board {
			debug!(board = %name, "board is hidden, leaving it untouched");
			report.hidden += 1;
			continue;
		}

		let mut updated = board.clone();
		updated.path = Some(join_path(&boards_tree, &name));
		updated.repo_id = Some(repo.id);
		if let Some(default_repo) = default_repo {
			updated.cpu_repo_id = Some(default_repo.id);
		}

		if updated == board {
			if !created {
				report.unchanged += 1;
			}
			continue;
		}

		store.update_board(&updated).await?;
		debug!(board = %name, created, "board synced");
		if !created {
			report.updated += 1;
		}
	}

	info!(
		created = report.created,
		updated = report.updated,
		unchanged = report.unchanged,
		hidden = report.hidden,
		"board sync finished"
	);
	Ok(report)
}
