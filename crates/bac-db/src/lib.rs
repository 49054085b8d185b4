// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # bac-db
//!
//! Catalog persistence for repositories, boards, applications, USB devices
//! and jobs, using SQLite via sqlx.
//!
//! [`CatalogStore`] is the interface the sync engine works against;
//! [`CatalogRepository`] implements it on a `SqlitePool`. Every inherent
//! method on the repository is one statement or one transaction.
//!
//! | Operation | Return type |
//! |-----------|-------------|
//! | Get by ID/unique key | `Result<Option<T>>` |
//! | Get or create | `Result<(T, bool)>`, `true` when inserted |
//! | List | `Result<Vec<T>>` |
//! | Update | `Result<()>`, `NotFound` when the row is missing |
//! | Delete | `Result<bool>` |
//!
//! Unique-constraint violations surface as [`DbError::Conflict`].

mod application;
mod board;
pub mod catalog;
pub mod error;
mod job;
pub mod pool;
mod repo;
pub mod schema;
pub mod testing;
pub mod types;
mod usb;

pub use catalog::{CatalogRepository, CatalogStore};
pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use types::{
	ApplicationLink, ApplicationRecord, ApplicationTreeRecord, BoardRecord, JobRecord, LinkOutcome,
	PortRecord, RepositoryRecord, UsbDeviceRecord,
};
