// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Catalog tables, applied in order by [`crate::run_migrations`].

pub const SCHEMA: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS repositories (
		id TEXT PRIMARY KEY NOT NULL,
		url TEXT NOT NULL UNIQUE,
		path TEXT NOT NULL UNIQUE,
		default_branch TEXT NOT NULL DEFAULT 'master',
		vcs TEXT NOT NULL DEFAULT 'git' CHECK (vcs IN ('git')),
		has_boards_tree INTEGER NOT NULL DEFAULT 0,
		boards_tree TEXT,
		has_cpu_tree INTEGER NOT NULL DEFAULT 0,
		cpu_tree TEXT,
		is_default INTEGER NOT NULL DEFAULT 0,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS usb_devices (
		id TEXT PRIMARY KEY NOT NULL,
		usb_id TEXT NOT NULL UNIQUE,
		tag TEXT
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS ports (
		id TEXT PRIMARY KEY NOT NULL,
		path TEXT NOT NULL UNIQUE,
		usb_device_id TEXT REFERENCES usb_devices(id) ON DELETE SET NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS boards (
		id TEXT PRIMARY KEY NOT NULL,
		riot_name TEXT NOT NULL UNIQUE,
		path TEXT,
		repo_id TEXT REFERENCES repositories(id) ON DELETE SET NULL,
		cpu_repo_id TEXT REFERENCES repositories(id) ON DELETE SET NULL,
		usb_device_id TEXT UNIQUE REFERENCES usb_devices(id) ON DELETE SET NULL,
		no_board INTEGER NOT NULL DEFAULT 0
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS jobs (
		id TEXT PRIMARY KEY NOT NULL,
		namespace TEXT NOT NULL DEFAULT 'riot' CHECK (namespace IN ('riot', 'thirdparty')),
		name TEXT NOT NULL UNIQUE,
		board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS board_prototype_jobs (
		board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
		job_id TEXT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
		PRIMARY KEY (board_id, job_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS applications (
		id TEXT PRIMARY KEY NOT NULL,
		name TEXT NOT NULL,
		path TEXT,
		no_application INTEGER NOT NULL DEFAULT 0,
		UNIQUE (name, path)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS application_trees (
		id TEXT PRIMARY KEY NOT NULL,
		repo_id TEXT NOT NULL REFERENCES repositories(id) ON DELETE CASCADE,
		tree_name TEXT NOT NULL,
		application_id TEXT REFERENCES applications(id) ON DELETE CASCADE,
		UNIQUE (repo_id, tree_name, application_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS application_blacklisted_boards (
		application_id TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
		board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
		PRIMARY KEY (application_id, board_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS application_whitelisted_boards (
		application_id TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
		board_id TEXT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
		PRIMARY KEY (application_id, board_id)
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_application_trees_repo ON application_trees(repo_id)",
	"CREATE INDEX IF NOT EXISTS idx_boards_repo ON boards(repo_id)",
];
