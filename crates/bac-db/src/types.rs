// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DbError;

/// A tracked source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
	pub id: Uuid,
	pub url: String,
	/// Checkout location, relative to the configured repository base path.
	pub path: String,
	pub default_branch: String,
	pub vcs: String,
	pub has_boards_tree: bool,
	pub boards_tree: Option<String>,
	pub has_cpu_tree: bool,
	pub cpu_tree: Option<String>,
	pub is_default: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl RepositoryRecord {
	pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			url: url.into(),
			path: path.into(),
			default_branch: "master".to_string(),
			vcs: "git".to_string(),
			has_boards_tree: false,
			boards_tree: None,
			has_cpu_tree: false,
			cpu_tree: None,
			is_default: false,
			created_at: now,
			updated_at: now,
		}
	}
}

/// Links a repository to one of its application tree directories and, once
/// discovered, an application living under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationTreeRecord {
	pub id: Uuid,
	pub repo_id: Uuid,
	pub tree_name: String,
	pub application_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
	pub id: Uuid,
	pub riot_name: String,
	pub path: Option<String>,
	pub repo_id: Option<Uuid>,
	pub cpu_repo_id: Option<Uuid>,
	pub usb_device_id: Option<Uuid>,
	pub no_board: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
	pub id: Uuid,
	pub name: String,
	pub path: Option<String>,
	pub no_application: bool,
}

/// Board list additions for one application, applied in a single
/// transaction by [`crate::CatalogStore::link_application`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationLink {
	pub application_id: Uuid,
	/// `(repo_id, tree_name)` of the tree entry to ensure, if any.
	pub tree: Option<(Uuid, String)>,
	pub blacklist: Vec<Uuid>,
	pub whitelist: Vec<Uuid>,
}

/// What [`crate::CatalogStore::link_application`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOutcome {
	pub tree_created: bool,
	pub blacklisted: u64,
	pub whitelisted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDeviceRecord {
	pub id: Uuid,
	pub usb_id: String,
	pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
	pub id: Uuid,
	pub path: String,
	pub usb_device_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
	pub id: Uuid,
	pub namespace: String,
	pub name: String,
	pub board_id: Uuid,
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(e.to_string()))
}

pub(crate) fn parse_opt_uuid(value: Option<String>) -> Result<Option<Uuid>, DbError> {
	value.as_deref().map(parse_uuid).transpose()
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|d| d.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(e.to_string()))
}
