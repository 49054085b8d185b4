// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository sync settings.

use serde::{Deserialize, Serialize};

fn default_branch() -> String {
	"master".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncConfigLayer {
	pub default_branch: Option<String>,
}

impl SyncConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.default_branch.is_some() {
			self.default_branch = other.default_branch;
		}
	}

	pub fn finalize(self) -> SyncConfig {
		SyncConfig {
			default_branch: self.default_branch.unwrap_or_else(default_branch),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
	/// Branch recorded for newly added repositories.
	pub default_branch: String,
}

impl Default for SyncConfig {
	fn default() -> Self {
		Self {
			default_branch: default_branch(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_branch() {
		assert_eq!(SyncConfigLayer::default().finalize().default_branch, "master");
	}

	#[test]
	fn test_merge_keeps_base_when_unset() {
		let mut base = SyncConfigLayer {
			default_branch: Some("main".to_string()),
		};
		base.merge(SyncConfigLayer::default());
		assert_eq!(base.finalize().default_branch, "main");
	}
}
