// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Which build system namespace a job lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobNamespace {
	#[default]
	Riot,
	Thirdparty,
}

impl JobNamespace {
	pub fn as_str(&self) -> &'static str {
		match self {
			JobNamespace::Riot => "riot",
			JobNamespace::Thirdparty => "thirdparty",
		}
	}
}

impl std::fmt::Display for JobNamespace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for JobNamespace {
	type Err = SyncError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"riot" => Ok(JobNamespace::Riot),
			"thirdparty" => Ok(JobNamespace::Thirdparty),
			_ => Err(SyncError::InvalidInput(format!("unknown job namespace: {s}"))),
		}
	}
}

/// Filesystem location of the job called `name`.
pub fn job_path(jobs_path: &Path, name: &str) -> PathBuf {
	jobs_path.join(name)
}
