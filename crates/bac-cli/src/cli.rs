// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bac", version, about, long_about = None)]
pub struct Cli {
	/// Configuration file (defaults to /etc/bac/bac.toml)
	#[arg(short, long, env = "BAC_CONFIG")]
	pub config: Option<PathBuf>,

	/// Print results as JSON
	#[arg(long, global = true)]
	pub json: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Manage tracked repositories
	#[command(subcommand)]
	Repo(RepoCommand),
	/// Manage application tree directories of a repository
	#[command(subcommand)]
	Tree(TreeCommand),
	/// Run sync passes
	#[command(subcommand)]
	Sync(SyncCommand),
	/// Inspect and hide boards
	#[command(subcommand)]
	Board(BoardCommand),
	/// Inspect, hide and renew applications
	#[command(subcommand)]
	App(AppCommand),
	/// Reconcile connected USB devices
	#[command(subcommand)]
	Usb(UsbCommand),
	/// Manage build jobs
	#[command(subcommand)]
	Job(JobCommand),
}

#[derive(Args, Debug, Clone)]
pub struct RepoTrees {
	/// Directory holding one subdirectory per board
	#[arg(long)]
	pub boards_tree: Option<String>,
	/// Directory holding CPU definitions
	#[arg(long)]
	pub cpu_tree: Option<String>,
	/// Mark as the default CPU repository
	#[arg(long)]
	pub default: bool,
	/// Branch whose head is synced
	#[arg(long)]
	pub branch: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
	/// Add a repository from a clone URL or an existing checkout
	Add {
		/// Clone URL; the checkout lands below the repository base path
		#[arg(long, conflicts_with = "path", required_unless_present = "path")]
		url: Option<String>,
		/// Existing local checkout
		#[arg(long)]
		path: Option<PathBuf>,
		#[command(flatten)]
		trees: RepoTrees,
	},
	/// Change the declared trees of a repository
	Update {
		/// URL of the repository
		url: String,
		#[command(flatten)]
		trees: RepoTrees,
		/// Clear the default flag
		#[arg(long, conflicts_with = "default")]
		not_default: bool,
	},
	/// List tracked repositories
	List,
}

#[derive(Subcommand, Debug)]
pub enum TreeCommand {
	/// Declare an application tree directory
	Add {
		/// URL of the repository
		#[arg(long)]
		repo: String,
		/// Directory holding one subdirectory per application
		name: String,
	},
	/// List declared application tree directories
	List {
		#[arg(long)]
		repo: String,
	},
}

#[derive(Subcommand, Debug)]
pub enum SyncCommand {
	/// Register boards of one repository
	Boards {
		#[arg(long)]
		repo: String,
	},
	/// Register applications of one repository
	Apps {
		#[arg(long)]
		repo: String,
	},
	/// Sync boards, then applications, of every repository
	All,
}

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
	/// List boards
	List {
		/// Include hidden boards
		#[arg(long)]
		all: bool,
	},
	/// Hide a board from sync and listings
	Hide { name: String },
	/// Show a hidden board again
	Unhide { name: String },
}

#[derive(Args, Debug, Clone)]
pub struct AppRef {
	/// Application name
	#[arg(long)]
	pub name: String,
	/// Application path in its repository
	#[arg(long)]
	pub path: String,
}

#[derive(Subcommand, Debug)]
pub enum AppCommand {
	/// List applications
	List {
		/// Include hidden applications
		#[arg(long)]
		all: bool,
	},
	/// Hide an application from sync and listings
	Hide(AppRef),
	/// Show a hidden application again
	Unhide(AppRef),
	/// Re-read a hidden application's Makefile
	Renew(AppRef),
}

#[derive(Subcommand, Debug)]
pub enum UsbCommand {
	/// Replace port assignments with a device list
	Update {
		/// JSON array of `{usb_id, tag, device_path}` objects
		#[arg(long)]
		devices: PathBuf,
	},
	/// List known ports
	Ports,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum NamespaceArg {
	Riot,
	Thirdparty,
}

impl From<NamespaceArg> for bac_sync::JobNamespace {
	fn from(value: NamespaceArg) -> Self {
		match value {
			NamespaceArg::Riot => bac_sync::JobNamespace::Riot,
			NamespaceArg::Thirdparty => bac_sync::JobNamespace::Thirdparty,
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum JobCommand {
	/// Create a job for a board
	Add {
		#[arg(long)]
		board: String,
		#[arg(long)]
		name: String,
		#[arg(long, value_enum, default_value = "riot")]
		namespace: NamespaceArg,
		/// Add the job to the board's prototypes
		#[arg(long)]
		prototype: bool,
	},
	/// List jobs of a board
	List {
		#[arg(long)]
		board: String,
	},
}
