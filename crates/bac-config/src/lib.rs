// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the board and application catalog.
//!
//! Layered from built-in defaults, a TOML file and `BAC_*` environment
//! variables, in increasing precedence.
//!
//! # Usage
//!
//! ```ignore
//! use bac_config::load_config;
//!
//! let config = load_config()?;
//! println!("checkouts live in {}", config.paths.repo_base_path);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::CatalogConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved catalog configuration.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
	pub database: DatabaseConfig,
	pub paths: PathsConfig,
	pub sync: SyncConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`BAC_*`)
/// 2. Config file (`/etc/bac/bac.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<CatalogConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<CatalogConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<CatalogConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = CatalogConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: CatalogConfigLayer) -> Result<CatalogConfig, ConfigError> {
	let config = CatalogConfig {
		database: layer.database.unwrap_or_default().finalize(),
		paths: layer.paths.unwrap_or_default().finalize(),
		sync: layer.sync.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		database = %config.database.url,
		repo_base_path = %config.paths.repo_base_path,
		jobs_path = %config.paths.jobs_path,
		default_branch = %config.sync.default_branch,
		"catalog configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &CatalogConfig) -> Result<(), ConfigError> {
	if config.paths.repo_base_path.trim().is_empty() {
		return Err(ConfigError::Validation(
			"paths.repo_base_path must not be empty".to_string(),
		));
	}
	if config.sync.default_branch.trim().is_empty() {
		return Err(ConfigError::InvalidValue {
			key: "sync.default_branch".to_string(),
			message: "branch name must not be empty".to_string(),
		});
	}

	Ok(())
}
