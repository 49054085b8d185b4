// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filesystem locations of repository checkouts and jobs.

use serde::{Deserialize, Serialize};

fn default_repo_base_path() -> String {
	"./repos".to_string()
}

fn default_jobs_path() -> String {
	"./jobs".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathsConfigLayer {
	pub repo_base_path: Option<String>,
	pub jobs_path: Option<String>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.repo_base_path.is_some() {
			self.repo_base_path = other.repo_base_path;
		}
		if other.jobs_path.is_some() {
			self.jobs_path = other.jobs_path;
		}
	}

	pub fn finalize(self) -> PathsConfig {
		PathsConfig {
			repo_base_path: self.repo_base_path.unwrap_or_else(default_repo_base_path),
			jobs_path: self.jobs_path.unwrap_or_else(default_jobs_path),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
	pub repo_base_path: String,
	pub jobs_path: String,
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			repo_base_path: default_repo_base_path(),
			jobs_path: default_jobs_path(),
		}
	}
}
