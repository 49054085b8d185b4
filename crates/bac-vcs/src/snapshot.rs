// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use crate::error::{Result, VcsError};
use crate::types::{Node, TreeEntry, WalkEntry};

/// Read-only view of a repository tree at a fixed revision.
///
/// Implementations must resolve every call against the same revision for the
/// lifetime of the value, so a sync pass sees one consistent tree.
pub trait TreeSnapshot: Send + Sync {
	/// Resolve `path` to a file or a directory. Returns
	/// [`VcsError::NotFound`] when nothing exists at `path`.
	fn resolve(&self, path: &str) -> Result<Node>;

	/// Every directory of the snapshot, root first, parents before children.
	fn walk(&self) -> Result<Vec<WalkEntry>>;

	fn read_file(&self, path: &str) -> Result<Vec<u8>> {
		match self.resolve(path)? {
			Node::File(data) => Ok(data),
			Node::Directory(_) => Err(VcsError::NotAFile(path.to_string())),
		}
	}

	fn list_directory(&self, path: &str) -> Result<Vec<TreeEntry>> {
		match self.resolve(path)? {
			Node::Directory(entries) => Ok(entries),
			Node::File(_) => Err(VcsError::NotADirectory(path.to_string())),
		}
	}

	/// Names of the immediate subdirectories of `path`.
	fn subdirectories(&self, path: &str) -> Result<Vec<String>> {
		Ok(self
			.list_directory(path)?
			.into_iter()
			.filter(TreeEntry::is_directory)
			.map(|entry| entry.name)
			.collect())
	}

	fn is_directory(&self, path: &str) -> Result<bool> {
		match self.resolve(path) {
			Ok(Node::Directory(_)) => Ok(true),
			Ok(Node::File(_)) | Err(VcsError::NotFound(_)) => Ok(false),
			Err(e) => Err(e),
		}
	}
}
