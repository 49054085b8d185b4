// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VcsError>;

#[derive(Error, Debug)]
pub enum VcsError {
	#[error("path not found in snapshot: {0}")]
	NotFound(String),

	#[error("not a file: {0}")]
	NotAFile(String),

	#[error("not a directory: {0}")]
	NotADirectory(String),

	#[error("ref not found: {0}")]
	RefNotFound(String),

	#[error("unsupported vcs: {0}")]
	UnsupportedVcs(String),

	#[error("invalid repository url: {0}")]
	InvalidUrl(String),

	#[error("git error: {0}")]
	GitError(String),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}
