// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VcsError};
use crate::git::GitSnapshot;
use crate::snapshot::TreeSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
	#[default]
	Git,
}

impl VcsKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			VcsKind::Git => "git",
		}
	}
}

impl std::str::FromStr for VcsKind {
	type Err = VcsError;
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"git" => Ok(VcsKind::Git),
			_ => Err(VcsError::UnsupportedVcs(s.to_string())),
		}
	}
}

/// Open the head snapshot of `branch` for a checkout of the given kind.
pub fn open_snapshot(kind: VcsKind, path: &Path, branch: &str) -> Result<Box<dyn TreeSnapshot>> {
	match kind {
		VcsKind::Git => Ok(Box::new(GitSnapshot::open(path, branch)?)),
	}
}
