// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use anyhow::{anyhow, bail, Context, Result};
use bac_db::{ApplicationRecord, CatalogStore, RepositoryRecord};
use bac_sync::{
	ApplicationSyncReport, BoardSyncReport, RepositoryCatalog, RepositoryOptions, UsbDeviceInfo,
};
use serde::Serialize;

use crate::cli::{
	AppCommand, AppRef, BoardCommand, Command, JobCommand, RepoCommand, RepoTrees, SyncCommand,
	TreeCommand, UsbCommand,
};

pub async fn run(catalog: &RepositoryCatalog, command: Command, json: bool) -> Result<()> {
	match command {
		Command::Repo(cmd) => repo(catalog, cmd, json).await,
		Command::Tree(cmd) => tree(catalog, cmd, json).await,
		Command::Sync(cmd) => sync(catalog, cmd, json).await,
		Command::Board(cmd) => board(catalog, cmd, json).await,
		Command::App(cmd) => app(catalog, cmd, json).await,
		Command::Usb(cmd) => usb(catalog, cmd, json).await,
		Command::Job(cmd) => job(catalog, cmd, json).await,
	}
}

fn options_from(trees: &RepoTrees) -> RepositoryOptions {
	RepositoryOptions {
		boards_tree: trees.boards_tree.clone(),
		cpu_tree: trees.cpu_tree.clone(),
		is_default: trees.default,
		branch: trees.branch.clone(),
	}
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

async fn repository(catalog: &RepositoryCatalog, url: &str) -> Result<RepositoryRecord> {
	catalog
		.store()
		.get_repository_by_url(url)
		.await?
		.ok_or_else(|| anyhow!("repository {url} is not tracked"))
}

async fn application(catalog: &RepositoryCatalog, app: &AppRef) -> Result<ApplicationRecord> {
	catalog
		.store()
		.get_application(&app.name, &app.path)
		.await?
		.ok_or_else(|| anyhow!("application {} at {} is unknown", app.name, app.path))
}

async fn repo(catalog: &RepositoryCatalog, cmd: RepoCommand, json: bool) -> Result<()> {
	match cmd {
		RepoCommand::Add { url, path, trees } => {
			let options = options_from(&trees);
			let (record, created) = match (url, path) {
				(Some(url), _) => catalog.create_from_url(&url, &options).await?,
				(None, Some(path)) => {
					let path = path
						.canonicalize()
						.with_context(|| format!("cannot resolve {}", path.display()))?;
					catalog.create_from_path(&path, &options).await?
				}
				(None, None) => bail!("either --url or --path is required"),
			};
			if json {
				return print_json(&record);
			}
			let verb = if created { "added" } else { "already tracked" };
			println!("{verb}: {} ({})", record.url, record.path);
		}
		RepoCommand::Update {
			url,
			trees,
			not_default,
		} => {
			let mut record = repository(catalog, &url).await?;
			if let Some(tree) = trees.boards_tree {
				record.has_boards_tree = true;
				record.boards_tree = Some(tree);
			}
			if let Some(tree) = trees.cpu_tree {
				record.has_cpu_tree = true;
				record.cpu_tree = Some(tree);
			}
			if let Some(branch) = trees.branch {
				record.default_branch = branch;
			}
			if trees.default {
				record.is_default = true;
			}
			if not_default {
				record.is_default = false;
			}
			catalog.update(&record).await?;
			println!("updated: {}", record.url);
		}
		RepoCommand::List => {
			let repos = catalog.store().list_repositories().await?;
			if json {
				return print_json(&repos);
			}
			for r in repos {
				let marker = if r.is_default { "*" } else { " " };
				println!(
					"{marker} {} {} [{}] boards={} cpu={}",
					r.path,
					r.url,
					r.default_branch,
					r.boards_tree.as_deref().unwrap_or("-"),
					r.cpu_tree.as_deref().unwrap_or("-"),
				);
			}
		}
	}
	Ok(())
}

async fn tree(catalog: &RepositoryCatalog, cmd: TreeCommand, json: bool) -> Result<()> {
	match cmd {
		TreeCommand::Add { repo, name } => {
			let record = repository(catalog, &repo).await?;
			let (_, created) = catalog.declare_application_tree(record.id, &name).await?;
			let verb = if created { "declared" } else { "already declared" };
			println!("{verb}: {name}");
		}
		TreeCommand::List { repo } => {
			let record = repository(catalog, &repo).await?;
			let trees = catalog.unique_application_trees(record.id).await?;
			if json {
				return print_json(&trees);
			}
			for name in trees {
				println!("{name}");
			}
		}
	}
	Ok(())
}

async fn sync(catalog: &RepositoryCatalog, cmd: SyncCommand, json: bool) -> Result<()> {
	match cmd {
		SyncCommand::Boards { repo } => {
			let record = repository(catalog, &repo).await?;
			let report = catalog.sync_boards(record.id).await?;
			if json {
				return print_json(&report);
			}
			println!(
				"boards: {} created, {} updated, {} unchanged, {} hidden",
				report.created, report.updated, report.unchanged, report.hidden
			);
		}
		SyncCommand::Apps { repo } => {
			let record = repository(catalog, &repo).await?;
			let report = catalog.sync_applications(record.id).await?;
			if json {
				return print_json(&report);
			}
			println!(
				"applications: {} created, {} linked, {} hidden, {} skipped",
				report.created, report.linked, report.hidden, report.skipped
			);
		}
		SyncCommand::All => {
			let reports = sync_all(catalog).await?;
			if json {
				return print_json(&reports);
			}
			for report in reports {
				if let Some(boards) = report.boards {
					println!("{}: {} boards created", report.repository, boards.created);
				}
				if let Some(applications) = report.applications {
					println!(
						"{}: {} applications created",
						report.repository, applications.created
					);
				}
			}
		}
	}
	Ok(())
}

/// Per-repository outcome of `sync all`.
#[derive(Debug, Serialize)]
struct RepositorySyncReport {
	repository: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	boards: Option<BoardSyncReport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	applications: Option<ApplicationSyncReport>,
}

/// Board Sync for every repository with a boards tree, then Application
/// Sync for every repository with declared application trees.
async fn sync_all(catalog: &RepositoryCatalog) -> Result<Vec<RepositorySyncReport>> {
	let repos = catalog.store().list_repositories().await?;
	let mut reports: Vec<RepositorySyncReport> = repos
		.iter()
		.map(|r| RepositorySyncReport {
			repository: r.path.clone(),
			boards: None,
			applications: None,
		})
		.collect();

	for (record, report) in repos.iter().zip(reports.iter_mut()) {
		if record.has_boards_tree {
			report.boards = Some(catalog.sync_boards(record.id).await?);
		}
	}
	for (record, report) in repos.iter().zip(reports.iter_mut()) {
		if catalog.has_application_trees(record.id).await? {
			report.applications = Some(catalog.sync_applications(record.id).await?);
		}
	}

	reports.retain(|r| r.boards.is_some() || r.applications.is_some());
	Ok(reports)
}

async fn board(catalog: &RepositoryCatalog, cmd: BoardCommand, json: bool) -> Result<()> {
	match cmd {
		BoardCommand::List { all } => {
			let store = catalog.store();
			let boards = if all {
				store.list_boards().await?
			} else {
				store.list_real_boards().await?
			};
			if json {
				return print_json(&boards);
			}
			for b in boards {
				let hidden = if b.no_board { " (hidden)" } else { "" };
				println!("{}{hidden} {}", b.riot_name, b.path.as_deref().unwrap_or("-"));
			}
			if !all && store.has_hidden_boards().await? {
				println!("hidden boards exist, use --all to show them");
			}
		}
		BoardCommand::Hide { name } => {
			catalog.set_board_hidden(&name, true).await?;
			println!("hidden: {name}");
		}
		BoardCommand::Unhide { name } => {
			catalog.set_board_hidden(&name, false).await?;
			println!("visible: {name}");
		}
	}
	Ok(())
}

async fn app(catalog: &RepositoryCatalog, cmd: AppCommand, json: bool) -> Result<()> {
	match cmd {
		AppCommand::List { all } => {
			let store = catalog.store();
			let apps = if all {
				store.list_applications().await?
			} else {
				store.list_real_applications().await?
			};
			if json {
				return print_json(&apps);
			}
			for a in apps {
				let hidden = if a.no_application { " (hidden)" } else { "" };
				println!("{}{hidden} {}", a.name, a.path.as_deref().unwrap_or("-"));
			}
			if !all && store.has_hidden_applications().await? {
				println!("hidden applications exist, use --all to show them");
			}
		}
		AppCommand::Hide(app_ref) => {
			let record = application(catalog, &app_ref).await?;
			catalog.set_application_hidden(record.id, true).await?;
			println!("hidden: {}", record.name);
		}
		AppCommand::Unhide(app_ref) => {
			let record = application(catalog, &app_ref).await?;
			catalog.set_application_hidden(record.id, false).await?;
			println!("visible: {}", record.name);
		}
		AppCommand::Renew(app_ref) => {
			let record = application(catalog, &app_ref).await?;
			if catalog.renew_application(record.id).await? {
				println!("renewed: {}", record.path.as_deref().unwrap_or(&record.name));
			} else {
				println!("{} is not hidden, sync maintains it", record.name);
			}
		}
	}
	Ok(())
}

async fn usb(catalog: &RepositoryCatalog, cmd: UsbCommand, json: bool) -> Result<()> {
	match cmd {
		UsbCommand::Update { devices } => {
			let content = std::fs::read_to_string(&devices)
				.with_context(|| format!("cannot read {}", devices.display()))?;
			let devices: Vec<UsbDeviceInfo> =
				serde_json::from_str(&content).context("invalid device list")?;
			let report = catalog.reconcile_usb(&devices).await?;
			if json {
				return print_json(&report);
			}
			println!(
				"usb: {} ports detached, {} devices created, {} ports attached",
				report.detached, report.devices_created, report.ports_attached
			);
		}
		UsbCommand::Ports => {
			let ports = catalog.store().list_ports().await?;
			if json {
				return print_json(&ports);
			}
			for port in ports {
				let state = if port.usb_device_id.is_some() { "attached" } else { "free" };
				println!("{} {state}", port.path);
			}
		}
	}
	Ok(())
}

async fn job(catalog: &RepositoryCatalog, cmd: JobCommand, json: bool) -> Result<()> {
	match cmd {
		JobCommand::Add {
			board,
			name,
			namespace,
			prototype,
		} => {
			let job = catalog
				.create_job(&board, &name, namespace.into(), prototype)
				.await?;
			if json {
				return print_json(&job);
			}
			println!("created: {} at {}", job.name, catalog.job_path(&job).display());
		}
		JobCommand::List { board } => {
			let record = catalog
				.store()
				.get_board_by_name(&board)
				.await?
				.ok_or_else(|| anyhow!("board {board} is unknown"))?;
			let jobs = catalog.store().list_jobs_for_board(record.id).await?;
			let prototypes = catalog.store().list_prototype_jobs(record.id).await?;
			if json {
				return print_json(&jobs);
			}
			for j in jobs {
				let marker = if prototypes.iter().any(|p| p.id == j.id) { "*" } else { " " };
				println!("{marker} {} [{}] {}", j.name, j.namespace, catalog.job_path(&j).display());
			}
		}
	}
	Ok(())
}
