// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Read-only access to the head of a tracked repository.
//!
//! A [`TreeSnapshot`] answers two questions about one fixed revision: what a
//! path resolves to, and what the whole tree looks like. [`GitSnapshot`] reads
//! a git object database through gix; [`MemorySnapshot`] holds a tree in
//! memory.

pub mod error;
pub mod git;
pub mod kind;
pub mod memory;
pub mod mirror;
pub mod snapshot;
pub mod testing;
pub mod types;

pub use error::{Result, VcsError};
pub use git::GitSnapshot;
pub use kind::{open_snapshot, VcsKind};
pub use memory::MemorySnapshot;
pub use mirror::{ensure_clone, origin_url, repo_dir_from_url};
pub use snapshot::TreeSnapshot;
pub use types::{join_path, normalize_path, Node, TreeEntry, TreeEntryKind, WalkEntry, ROOT};
