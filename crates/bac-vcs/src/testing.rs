// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Git repositories written straight into an object database, for tests in
//! this crate and its dependents.

use std::collections::BTreeMap;
use std::path::Path;

use gix::ObjectId;

enum Item {
	File(Vec<u8>),
	Dir(BTreeMap<String, Item>),
}

fn insert(root: &mut BTreeMap<String, Item>, path: &str, content: &[u8]) {
	match path.split_once('/') {
		Some((dir, rest)) => {
			let child = root
				.entry(dir.to_string())
				.or_insert_with(|| Item::Dir(BTreeMap::new()));
			if let Item::Dir(children) = child {
				insert(children, rest, content);
			}
		}
		None => {
			root.insert(path.to_string(), Item::File(content.to_vec()));
		}
	}
}

fn write_tree(repo: &gix::Repository, items: &BTreeMap<String, Item>) -> ObjectId {
	let mut entries = Vec::new();
	for (name, item) in items {
		let (mode, oid): (gix::objs::tree::EntryMode, ObjectId) = match item {
			Item::File(content) => (
				gix::objs::tree::EntryKind::Blob.into(),
				repo.write_blob(content).unwrap().detach(),
			),
			Item::Dir(children) => (
				gix::objs::tree::EntryKind::Tree.into(),
				write_tree(repo, children),
			),
		};
		entries.push(gix::objs::tree::Entry {
			mode,
			filename: name.as_str().into(),
			oid,
		});
	}
	entries.sort();
	let tree = gix::objs::Tree { entries };
	repo.write_object(&tree).unwrap().detach()
}

/// Create a bare repository at `path` whose `branch` points at a single
/// commit containing `files`.
pub fn bare_repo_with_files(path: &Path, branch: &str, files: &[(&str, &str)]) -> String {
	let repo = gix::init_bare(path).unwrap();

	let mut root = BTreeMap::new();
	for (file_path, content) in files {
		insert(&mut root, file_path, content.as_bytes());
	}
	let tree_id = write_tree(&repo, &root);

	let time = gix::date::Time::now_local_or_utc();
	let signature = gix::actor::SignatureRef {
		name: "Board Bot".into(),
		email: "boards@example.com".into(),
		time,
	};
	let commit = gix::objs::Commit {
		tree: tree_id,
		parents: Default::default(),
		author: signature.to_owned(),
		committer: signature.to_owned(),
		encoding: None,
		message: "import tree".into(),
		extra_headers: vec![],
	};
	let commit_id = repo.write_object(&commit).unwrap();

	let ref_path = repo.path().join("refs/heads").join(branch);
	std::fs::create_dir_all(ref_path.parent().unwrap()).unwrap();
	std::fs::write(&ref_path, format!("{}\n", commit_id)).unwrap();
	commit_id.to_string()
}

/// Point the `origin` remote of the repository at `path` to `url`.
pub fn set_origin(path: &Path, url: &str) {
	let repo = gix::open(path).unwrap();
	let config = repo.path().join("config");
	let mut content = std::fs::read_to_string(&config).unwrap_or_default();
	content.push_str(&format!("[remote \"origin\"]\n\turl = {url}\n"));
	std::fs::write(&config, content).unwrap();
}
