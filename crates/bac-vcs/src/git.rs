// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use gix::object::Kind;
use gix::ObjectId;
use tracing::{debug, instrument};

use crate::error::{Result, VcsError};
use crate::snapshot::TreeSnapshot;
use crate::types::{join_path, normalize_path, Node, TreeEntry, TreeEntryKind, WalkEntry, ROOT};

/// Head snapshot of a git repository.
///
/// The branch is resolved to a commit once, in [`GitSnapshot::open`]; every
/// later read goes through that commit's tree.
#[derive(Clone)]
pub struct GitSnapshot {
	repo: gix::ThreadSafeRepository,
	path: PathBuf,
	branch: String,
	commit: ObjectId,
}

impl std::fmt::Debug for GitSnapshot {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GitSnapshot")
			.field("path", &self.path)
			.field("branch", &self.branch)
			.field("commit", &self.commit)
			.finish()
	}
}

impl GitSnapshot {
	#[instrument(skip_all, fields(path = %path.display(), branch = %branch))]
	pub fn open(path: &Path, branch: &str) -> Result<Self> {
		let repo = gix::open(path).map_err(|e| VcsError::GitError(e.to_string()))?;
		let commit = resolve_to_oid(&repo, branch)?;
		debug!(commit = %commit, "resolved head snapshot");
		Ok(Self {
			path: repo.path().to_path_buf(),
			repo: repo.into_sync(),
			branch: branch.to_string(),
			commit,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn branch(&self) -> &str {
		&self.branch
	}

	pub fn commit(&self) -> String {
		self.commit.to_string()
	}

	fn repo(&self) -> gix::Repository {
		self.repo.to_thread_local()
	}

	fn root_tree<'r>(&self, repo: &'r gix::Repository) -> Result<gix::Tree<'r>> {
		let object = repo
			.find_object(self.commit)
			.map_err(|e| VcsError::GitError(e.to_string()))?;
		let commit = object
			.try_into_commit()
			.map_err(|e| VcsError::GitError(e.to_string()))?;
		let tree_id = commit
			.tree_id()
			.map_err(|e| VcsError::GitError(e.to_string()))?;
		let tree_obj = repo
			.find_object(tree_id)
			.map_err(|e| VcsError::GitError(e.to_string()))?;
		Ok(tree_obj.into_tree())
	}

	fn walk_tree(
		&self,
		repo: &gix::Repository,
		tree: gix::Tree<'_>,
		path: &str,
		out: &mut Vec<WalkEntry>,
	) -> Result<()> {
		let entries = list_entries(&tree, path)?;
		let mut directories = Vec::new();
		let mut files = Vec::new();
		let mut subtrees = Vec::new();
		for (entry, oid) in entries {
			match entry.kind {
				TreeEntryKind::Directory => {
					directories.push(entry.name.clone());
					subtrees.push((entry.path, oid));
				}
				_ => files.push(entry.name),
			}
		}

		out.push(WalkEntry {
			path: if path.is_empty() {
				ROOT.to_string()
			} else {
				path.to_string()
			},
			directories,
			files,
		});

		for (sub_path, oid) in subtrees {
			let subtree = repo
				.find_object(oid)
				.map_err(|e| VcsError::GitError(e.to_string()))?
				.into_tree();
			self.walk_tree(repo, subtree, &sub_path, out)?;
		}
		Ok(())
	}
}

impl TreeSnapshot for GitSnapshot {
	#[instrument(skip(self), fields(commit = %self.commit))]
	fn resolve(&self, path: &str) -> Result<Node> {
		let repo = self.repo();
		let tree = self.root_tree(&repo)?;
		let normalized = normalize_path(path);

		if normalized.is_empty() {
			let entries = list_entries(&tree, &normalized)?;
			return Ok(Node::Directory(entries.into_iter().map(|(e, _)| e).collect()));
		}

		let entry = tree
			.lookup_entry_by_path(&normalized)
			.map_err(|e| VcsError::GitError(e.to_string()))?
			.ok_or_else(|| VcsError::NotFound(path.to_string()))?;
		let object = entry
			.object()
			.map_err(|e| VcsError::GitError(e.to_string()))?;

		match object.kind {
			Kind::Tree => {
				let subtree = object.into_tree();
				let entries = list_entries(&subtree, &normalized)?;
				Ok(Node::Directory(entries.into_iter().map(|(e, _)| e).collect()))
			}
			Kind::Blob => Ok(Node::File(object.data.to_vec())),
			other => Err(VcsError::GitError(format!(
				"unexpected {:?} object at {}",
				other, normalized
			))),
		}
	}

	#[instrument(skip(self), fields(commit = %self.commit))]
	fn walk(&self) -> Result<Vec<WalkEntry>> {
		let repo = self.repo();
		let tree = self.root_tree(&repo)?;
		let mut out = Vec::new();
		self.walk_tree(&repo, tree, "", &mut out)?;
		Ok(out)
	}
}

fn list_entries(tree: &gix::Tree<'_>, path: &str) -> Result<Vec<(TreeEntry, ObjectId)>> {
	let mut entries = Vec::new();
	for entry_result in tree.iter() {
		let entry = entry_result.map_err(|e| VcsError::GitError(e.to_string()))?;
		let name = entry.filename().to_string();
		let kind = match entry.mode().kind() {
			gix::object::tree::EntryKind::Tree => TreeEntryKind::Directory,
			gix::object::tree::EntryKind::Blob | gix::object::tree::EntryKind::BlobExecutable => {
				TreeEntryKind::File
			}
			gix::object::tree::EntryKind::Link => TreeEntryKind::Symlink,
			gix::object::tree::EntryKind::Commit => TreeEntryKind::Submodule,
		};
		entries.push((
			TreeEntry {
				path: join_path(path, &name),
				name,
				kind,
			},
			entry.id().detach(),
		));
	}
	Ok(entries)
}

fn resolve_to_oid(repo: &gix::Repository, refname: &str) -> Result<ObjectId> {
	if let Ok(oid) = ObjectId::from_hex(refname.as_bytes()) {
		return Ok(oid);
	}
	let full_ref = if refname.starts_with("refs/") {
		refname.to_string()
	} else {
		format!("refs/heads/{}", refname)
	};
	let mut reference = repo
		.find_reference(&full_ref)
		.map_err(|_| VcsError::RefNotFound(refname.to_string()))?;
	let peeled = reference
		.peel_to_id_in_place()
		.map_err(|e| VcsError::GitError(e.to_string()))?;
	Ok(peeled.detach())
}
