// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-process snapshot, used for fixtures and for trees assembled without a
//! git checkout.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, VcsError};
use crate::snapshot::TreeSnapshot;
use crate::types::{normalize_path, Node, TreeEntry, TreeEntryKind, WalkEntry, ROOT};

#[derive(Debug, Clone)]
pub struct MemorySnapshot {
	files: BTreeMap<String, Vec<u8>>,
	directories: BTreeSet<String>,
}

impl Default for MemorySnapshot {
	fn default() -> Self {
		Self::new()
	}
}

impl MemorySnapshot {
	pub fn new() -> Self {
		let mut directories = BTreeSet::new();
		directories.insert(String::new());
		Self {
			files: BTreeMap::new(),
			directories,
		}
	}

	pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
		self.insert_file(path, content);
		self
	}

	pub fn with_directory(mut self, path: &str) -> Self {
		self.insert_directory(path);
		self
	}

	pub fn insert_file(&mut self, path: &str, content: impl Into<Vec<u8>>) {
		let path = normalize_path(path);
		if let Some((parent, _)) = path.rsplit_once('/') {
			self.insert_directory(parent);
		}
		self.files.insert(path, content.into());
	}

	pub fn insert_directory(&mut self, path: &str) {
		let mut current = normalize_path(path);
		while !current.is_empty() {
			let parent = parent_of(&current).to_string();
			self.directories.insert(current);
			current = parent;
		}
	}

	fn children(&self, dir: &str) -> Vec<TreeEntry> {
		let directories = self
			.directories
			.iter()
			.filter(|d| !d.is_empty() && parent_of(d) == dir)
			.map(|d| entry(d, TreeEntryKind::Directory));
		let files = self
			.files
			.keys()
			.filter(|f| parent_of(f) == dir)
			.map(|f| entry(f, TreeEntryKind::File));

		let mut entries: Vec<TreeEntry> = directories.chain(files).collect();
		entries.sort_by(|a, b| a.name.cmp(&b.name));
		entries
	}
}

impl TreeSnapshot for MemorySnapshot {
	fn resolve(&self, path: &str) -> Result<Node> {
		let normalized = normalize_path(path);
		if let Some(data) = self.files.get(&normalized) {
			return Ok(Node::File(data.clone()));
		}
		if self.directories.contains(&normalized) {
			return Ok(Node::Directory(self.children(&normalized)));
		}
		Err(VcsError::NotFound(path.to_string()))
	}

	fn walk(&self) -> Result<Vec<WalkEntry>> {
		Ok(self
			.directories
			.iter()
			.map(|dir| {
				let (directories, files) = self
					.children(dir)
					.into_iter()
					.partition::<Vec<_>, _>(TreeEntry::is_directory);
				WalkEntry {
					path: if dir.is_empty() {
						ROOT.to_string()
					} else {
						dir.clone()
					},
					directories: directories.into_iter().map(|e| e.name).collect(),
					files: files.into_iter().map(|e| e.name).collect(),
				}
			})
			.collect())
	}
}

fn parent_of(path: &str) -> &str {
	path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

fn entry(path: &str, kind: TreeEntryKind) -> TreeEntry {
	let name = path.rsplit_once('/').map(|(_, name)| name).unwrap_or(path);
	TreeEntry {
		name: name.to_string(),
		path: path.to_string(),
		kind,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn riot_tree() -> MemorySnapshot {
		MemorySnapshot::new()
			.with_file("boards/native/Makefile", "MODULE = board\n")
			.with_file("boards/samr21-xpro/Makefile", "MODULE = board\n")
			.with_file("boards/README", "boards\n")
			.with_file("examples/hello-world/Makefile", "PROJECT = hello-world\n")
			.with_directory("examples/empty")
	}

	#[test]
	fn test_resolve_file() {
		let snapshot = riot_tree();
		let node = snapshot.resolve("examples/hello-world/Makefile").unwrap();
		assert_eq!(node, Node::File(b"PROJECT = hello-world\n".to_vec()));
	}

	#[test]
	fn test_resolve_directory_lists_children_sorted() {
		let snapshot = riot_tree();
		let entries = snapshot.list_directory("boards").unwrap();
		let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
		assert_eq!(names, vec!["README", "native", "samr21-xpro"]);
		assert!(!entries[0].is_directory());
		assert_eq!(entries[1].path, "boards/native");
	}

	#[test]
	fn test_resolve_missing_is_not_found() {
		let snapshot = riot_tree();
		assert!(matches!(
			snapshot.resolve("cpu"),
			Err(VcsError::NotFound(p)) if p == "cpu"
		));
	}

	#[test]
	fn test_type_mismatch_errors() {
		let snapshot = riot_tree();
		assert!(matches!(
			snapshot.read_file("boards"),
			Err(VcsError::NotAFile(_))
		));
		assert!(matches!(
			snapshot.list_directory("boards/README"),
			Err(VcsError::NotADirectory(_))
		));
	}

	#[test]
	fn test_subdirectories_skip_files() {
		let snapshot = riot_tree();
		assert_eq!(
			snapshot.subdirectories("boards").unwrap(),
			vec!["native".to_string(), "samr21-xpro".to_string()]
		);
		assert_eq!(
			snapshot.subdirectories("./examples/").unwrap(),
			vec!["empty".to_string(), "hello-world".to_string()]
		);
	}

	#[test]
	fn test_is_directory() {
		let snapshot = riot_tree();
		assert!(snapshot.is_directory("boards").unwrap());
		assert!(!snapshot.is_directory("boards/README").unwrap());
		assert!(!snapshot.is_directory("nope").unwrap());
	}

	#[test]
	fn test_walk_visits_parents_first() {
		let snapshot = riot_tree();
		let walk = snapshot.walk().unwrap();
		let paths: Vec<_> = walk.iter().map(|w| w.path.as_str()).collect();
		assert_eq!(paths[0], ".");
		let boards = paths.iter().position(|p| *p == "boards").unwrap();
		let native = paths.iter().position(|p| *p == "boards/native").unwrap();
		assert!(boards < native);

		let root = &walk[0];
		assert_eq!(root.directories, vec!["boards", "examples"]);
		assert!(root.files.is_empty());

		let boards_entry = &walk[boards];
		assert_eq!(boards_entry.files, vec!["README"]);
	}
}
