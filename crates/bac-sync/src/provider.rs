// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use bac_db::RepositoryRecord;
use bac_vcs::{open_snapshot, TreeSnapshot, VcsKind};

use crate::error::Result;

/// Opens the head snapshot of a catalogued repository.
pub trait SnapshotProvider: Send + Sync {
	fn open(&self, repo: &RepositoryRecord) -> Result<Box<dyn TreeSnapshot>>;
}

/// Snapshots of checkouts living under a common base directory.
#[derive(Debug, Clone)]
pub struct CheckoutProvider {
	base_path: PathBuf,
}

impl CheckoutProvider {
	pub fn new(base_path: impl Into<PathBuf>) -> Self {
		Self {
			base_path: base_path.into(),
		}
	}

	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	pub fn checkout_path(&self, repo: &RepositoryRecord) -> PathBuf {
		self.base_path.join(&repo.path)
	}
}

impl SnapshotProvider for CheckoutProvider {
	fn open(&self, repo: &RepositoryRecord) -> Result<Box<dyn TreeSnapshot>> {
		let kind: VcsKind = repo.vcs.parse()?;
		let snapshot = open_snapshot(kind, &self.checkout_path(repo), &repo.default_branch)?;
		Ok(snapshot)
	}
}

#[cfg(test)]
pub(crate) mod fixtures {
	use std::collections::HashMap;
	use std::sync::Mutex;

	use bac_vcs::MemorySnapshot;

	use super::*;
	use crate::error::SyncError;

	/// In-memory snapshots keyed by repository URL.
	#[derive(Default)]
	pub struct MemoryProvider {
		snapshots: Mutex<HashMap<String, MemorySnapshot>>,
	}

	impl MemoryProvider {
		pub fn with(self, url: &str, snapshot: MemorySnapshot) -> Self {
			self.insert(url, snapshot);
			self
		}

		pub fn insert(&self, url: &str, snapshot: MemorySnapshot) {
			self.snapshots.lock().unwrap().insert(url.to_string(), snapshot);
		}
	}

	impl SnapshotProvider for MemoryProvider {
		fn open(&self, repo: &RepositoryRecord) -> Result<Box<dyn TreeSnapshot>> {
			self.snapshots
				.lock()
				.unwrap()
				.get(&repo.url)
				.cloned()
				.map(|s| Box::new(s) as Box<dyn TreeSnapshot>)
				.ok_or_else(|| SyncError::NotFound(repo.url.clone()))
		}
	}
}
