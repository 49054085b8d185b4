// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! `bac`: maintain the board and application catalog from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bac_db::{CatalogRepository, CatalogStore};
use bac_sync::{CatalogSettings, CheckoutProvider, RepositoryCatalog};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let config = match &cli.config {
		Some(path) => bac_config::load_config_with_file(path),
		None => bac_config::load_config(),
	}
	.context("failed to load configuration")?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	tracing::debug!(database = %config.database.url, "opening catalog");

	let pool = bac_db::create_pool(&config.database.url)
		.await
		.context("failed to open catalog database")?;
	bac_db::run_migrations(&pool).await?;

	let repo_base_path = PathBuf::from(&config.paths.repo_base_path);
	let store: Arc<dyn CatalogStore> = Arc::new(CatalogRepository::new(pool));
	let catalog = RepositoryCatalog::new(
		store,
		Arc::new(CheckoutProvider::new(&repo_base_path)),
		CatalogSettings {
			repo_base_path,
			jobs_path: PathBuf::from(&config.paths.jobs_path),
			default_branch: config.sync.default_branch.clone(),
		},
	);

	commands::run(&catalog, cli.command, cli.json).await
}
