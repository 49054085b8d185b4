// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// Path of the snapshot root as reported by [`crate::TreeSnapshot::walk`].
pub const ROOT: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
	pub name: String,
	pub path: String,
	pub kind: TreeEntryKind,
}

impl TreeEntry {
	pub fn is_directory(&self) -> bool {
		self.kind == TreeEntryKind::Directory
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeEntryKind {
	File,
	Directory,
	Submodule,
	Symlink,
}

/// What a path resolves to in a head snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	File(Vec<u8>),
	Directory(Vec<TreeEntry>),
}

/// One directory visited by a full snapshot walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkEntry {
	/// `"."` for the root, otherwise the slash-separated path without a
	/// leading `./`.
	pub path: String,
	pub directories: Vec<String>,
	pub files: Vec<String>,
}

/// Normalize a user supplied tree path: strips `./`, leading and trailing
/// slashes. The root normalizes to an empty string.
pub fn normalize_path(path: &str) -> String {
	let trimmed = path.trim();
	let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
	let trimmed = trimmed.trim_matches('/');
	if trimmed == ROOT {
		return String::new();
	}
	trimmed.to_string()
}

/// Join a parent tree path and a child name, treating the root as empty.
pub fn join_path(parent: &str, name: &str) -> String {
	let parent = normalize_path(parent);
	if parent.is_empty() {
		name.to_string()
	} else {
		format!("{}/{}", parent, name)
	}
}
