// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application metadata from RIOT-style Makefiles.
//!
//! Only three variables matter: `PROJECT` names the application,
//! `BOARD_BLACKLIST` and `BOARD_WHITELIST` list board names, possibly over
//! several backslash-continued lines.

use std::sync::LazyLock;

use bac_vcs::{join_path, TreeSnapshot};
use regex::Regex;

use crate::error::{Result, SyncError};

pub const MAKEFILE: &str = "Makefile";

static PROJECT_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\bPROJECT\s*[:?]?=\s*(\S+)").unwrap());
static BLACKLIST_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\bBOARD_BLACKLIST\s*[:?]?=(.*)$").unwrap());
static WHITELIST_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\bBOARD_WHITELIST\s*[:?]?=(.*)$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakefileInfo {
	pub name: String,
	pub blacklist: Vec<String>,
	pub whitelist: Vec<String>,
}

/// Parse Makefile text in a single pass over its lines.
///
/// Continuation lines are consumed before assignments are looked at, so a
/// continued list never swallows a following assignment on the next line.
pub fn parse_makefile(content: &str) -> Result<MakefileInfo> {
	let mut name = None;
	let mut blacklist = Vec::new();
	let mut whitelist = Vec::new();
	let mut blacklist_continues = false;
	let mut whitelist_continues = false;

	for line in content.lines() {
		let continued = line.ends_with('\\');

		if blacklist_continues {
			blacklist.extend(list_tokens(line));
			blacklist_continues = continued;
		}
		if whitelist_continues {
			whitelist.extend(list_tokens(line));
			whitelist_continues = continued;
		}

		if let Some(caps) = PROJECT_REGEX.captures(line) {
			name = Some(caps[1].to_string());
		}
		if let Some(caps) = BLACKLIST_REGEX.captures(line) {
			blacklist.extend(list_tokens(&caps[1]));
			if continued {
				blacklist_continues = true;
			}
		}
		if let Some(caps) = WHITELIST_REGEX.captures(line) {
			whitelist.extend(list_tokens(&caps[1]));
			if continued {
				whitelist_continues = true;
			}
		}
	}

	let name = name.ok_or_else(|| SyncError::MissingApplicationName(MAKEFILE.to_string()))?;
	Ok(MakefileInfo {
		name,
		blacklist,
		whitelist,
	})
}

/// Read and parse `<app_path>/Makefile` from a snapshot.
pub fn read_makefile(snapshot: &dyn TreeSnapshot, app_path: &str) -> Result<MakefileInfo> {
	let makefile_path = join_path(app_path, MAKEFILE);
	let content = snapshot.read_file(&makefile_path)?;
	parse_makefile(&String::from_utf8_lossy(&content)).map_err(|e| match e {
		SyncError::MissingApplicationName(_) => SyncError::MissingApplicationName(makefile_path),
		other => other,
	})
}

fn list_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
	let text = text.trim();
	let text = text.strip_suffix('\\').unwrap_or(text);
	text.split_whitespace().map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;
	use bac_vcs::MemorySnapshot;
	use proptest::prelude::*;

	#[test]
	fn test_blacklist_with_continuation() {
		let info = parse_makefile("PROJECT = foo\nBOARD_BLACKLIST = a b \\\n    c\n").unwrap();
		assert_eq!(info.name, "foo");
		assert_eq!(info.blacklist, vec!["a", "b", "c"]);
		assert!(info.whitelist.is_empty());
	}

	#[test]
	fn test_missing_project() {
		let result = parse_makefile("BOARD_WHITELIST = native\n");
		assert!(matches!(result, Err(SyncError::MissingApplicationName(_))));
	}

	#[test]
	fn test_assignment_operators() {
		for op in ["=", ":=", "?="] {
			let info = parse_makefile(&format!("PROJECT {op} hello\nBOARD_WHITELIST{op}native\n")).unwrap();
			assert_eq!(info.name, "hello");
			assert_eq!(info.whitelist, vec!["native"]);
		}
	}

	#[test]
	fn test_backslash_without_space() {
		let info = parse_makefile("PROJECT = x\nBOARD_WHITELIST = a b\\\n  c d \\\n  e\n").unwrap();
		assert_eq!(info.whitelist, vec!["a", "b", "c", "d", "e"]);
	}

	#[test]
	fn test_both_lists_continue_independently() {
		let text = "\
PROJECT = both
BOARD_BLACKLIST := arduino-mega2560 \\
	msba2
BOARD_WHITELIST := native \\
	samr21-xpro \\
	iotlab-m3
";
		let info = parse_makefile(text).unwrap();
		assert_eq!(info.blacklist, vec!["arduino-mega2560", "msba2"]);
		assert_eq!(info.whitelist, vec!["native", "samr21-xpro", "iotlab-m3"]);
	}

	#[test]
	fn test_duplicates_kept_and_empty_list() {
		let info = parse_makefile("PROJECT = dup\nBOARD_BLACKLIST = a a\n").unwrap();
		assert_eq!(info.blacklist, vec!["a", "a"]);

		let info = parse_makefile("PROJECT = empty\nBOARD_BLACKLIST = \\\n\n").unwrap();
		assert!(info.blacklist.is_empty());
	}

	#[test]
	fn test_read_makefile_errors() {
		let snapshot = MemorySnapshot::new()
			.with_directory("examples/no_makefile")
			.with_directory("examples/dir_makefile/Makefile")
			.with_file("examples/no_project/Makefile", "BOARD_BLACKLIST = a\n")
			.with_file("examples/ok/Makefile", "PROJECT = ok\n");

		assert!(matches!(
			read_makefile(&snapshot, "examples/no_makefile"),
			Err(SyncError::NotFound(_))
		));
		assert!(matches!(
			read_makefile(&snapshot, "examples/dir_makefile"),
			Err(SyncError::NotAFile(_))
		));
		assert!(matches!(
			read_makefile(&snapshot, "examples/no_project"),
			Err(SyncError::MissingApplicationName(p)) if p == "examples/no_project/Makefile"
		));
		assert_eq!(read_makefile(&snapshot, "examples/ok").unwrap().name, "ok");
	}

	proptest! {
		#[test]
		fn last_project_wins(names in proptest::collection::vec("[a-z][a-z0-9_]{0,12}", 1..6)) {
			let text: String = names.iter().map(|n| format!("PROJECT = {n}\n")).collect();
			let info = parse_makefile(&text).unwrap();
			prop_assert_eq!(&info.name, names.last().unwrap());
		}

		#[test]
		fn continued_tokens_are_preserved(
			lines in proptest::collection::vec(
				proptest::collection::vec("[a-z][a-z0-9-]{0,10}", 1..4),
				1..5,
			)
		) {
			let mut text = String::from("PROJECT = app\nBOARD_BLACKLIST =");
			for (i, tokens) in lines.iter().enumerate() {
				text.push(' ');
				text.push_str(&tokens.join(" "));
				if i + 1 < lines.len() {
					text.push_str(" \\\n\t");
				}
			}
			text.push('\n');

			let info = parse_makefile(&text).unwrap();
			let expected: Vec<String> = lines.into_iter().flatten().collect();
			prop_assert_eq!(info.blacklist, expected);
		}
	}
}
