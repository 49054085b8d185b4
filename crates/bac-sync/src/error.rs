// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bac_db::DbError;
use bac_vcs::VcsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
	#[error("not found: {0}")]
	NotFound(String),

	#[error("not a file: {0}")]
	NotAFile(String),

	#[error("not a directory: {0}")]
	NotADirectory(String),

	#[error("application name not in Makefile: {0}")]
	MissingApplicationName(String),

	#[error("{0} is not a directory in the repository")]
	ValidationFailed(String),

	#[error("{0} is enabled but no path is given")]
	MissingTreePath(&'static str),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error(transparent)]
	Vcs(VcsError),

	#[error(transparent)]
	Db(#[from] DbError),
}

impl From<VcsError> for SyncError {
	fn from(e: VcsError) -> Self {
		match e {
			VcsError::NotFound(path) => SyncError::NotFound(path),
			VcsError::NotAFile(path) => SyncError::NotAFile(path),
			VcsError::NotADirectory(path) => SyncError::NotADirectory(path),
			other => SyncError::Vcs(other),
		}
	}
}

impl SyncError {
	/// Errors that make Application Sync pass over a candidate directory.
	pub fn is_skippable(&self) -> bool {
		matches!(
			self,
			SyncError::NotFound(_) | SyncError::NotAFile(_) | SyncError::MissingApplicationName(_)
		)
	}
}
