// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Local checkouts of tracked repositories.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use gix::progress::Discard;
use tracing::{debug, info, instrument};

use crate::error::{Result, VcsError};

/// Directory name a repository URL is checked out under: the last path
/// segment with any `.git` suffix removed.
pub fn repo_dir_from_url(url: &str) -> Result<String> {
	let trimmed = url.trim().trim_end_matches('/');
	let last = trimmed
		.rsplit(['/', ':'])
		.next()
		.unwrap_or_default();
	let name = last.strip_suffix(".git").unwrap_or(last);
	if name.is_empty() || name == "." || name == ".." {
		return Err(VcsError::InvalidUrl(url.to_string()));
	}
	Ok(name.to_string())
}

/// Bare-clone `url` into `target_path` unless something already exists there.
/// Returns `true` when a clone was made.
#[instrument(fields(url = %url, path = %target_path.display()))]
pub async fn ensure_clone(url: &str, target_path: &Path) -> Result<bool> {
	if target_path.exists() {
		debug!("checkout already present");
		return Ok(false);
	}
	clone_bare(url, target_path).await?;
	Ok(true)
}

async fn clone_bare(clone_url: &str, target_path: &Path) -> Result<()> {
	info!(url = %clone_url, path = ?target_path, "cloning bare repository");

	if let Some(parent) = target_path.parent() {
		std::fs::create_dir_all(parent)?;
	}

	let url = clone_url.to_string();
	let path = target_path.to_path_buf();

	tokio::task::spawn_blocking(move || {
		let interrupt = AtomicBool::new(false);
		let url = gix::url::parse(url.as_str().into())
			.map_err(|e| VcsError::InvalidUrl(format!("{}: {}", url, e)))?;

		let mut prepare = gix::prepare_clone_bare(url, &path)
			.map_err(|e| VcsError::GitError(format!("clone prepare failed: {}", e)))?;

		prepare
			.fetch_only(Discard, &interrupt)
			.map_err(|e| VcsError::GitError(format!("clone fetch failed: {}", e)))?;

		debug!("clone completed");
		Ok(())
	})
	.await
	.map_err(|e| VcsError::GitError(format!("task join error: {}", e)))?
}

/// Fetch URL of the `origin` remote of the repository at `path`, if any.
#[instrument(fields(path = %path.display()))]
pub fn origin_url(path: &Path) -> Result<Option<String>> {
	let repo = gix::open(path).map_err(|e| VcsError::GitError(e.to_string()))?;
	let remote = match repo.find_remote("origin") {
		Ok(remote) => remote,
		Err(_) => return Ok(None),
	};
	Ok(remote
		.url(gix::remote::Direction::Fetch)
		.map(|url| url.to_bstring().to_string()))
}
