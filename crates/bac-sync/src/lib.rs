// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Synchronizes the board and application catalog with repository contents.
//!
//! [`RepositoryCatalog`] is the entry point: it validates and creates
//! repositories, runs Board Sync and Application Sync over a head snapshot,
//! renews hidden applications and reconciles connected USB devices. The
//! passes themselves ([`sync_boards`], [`sync_applications`]) take the
//! snapshot and store explicitly and can be driven directly.

pub mod applications;
pub mod boards;
pub mod catalog;
pub mod error;
pub mod jobs;
pub mod makefile;
pub mod provider;
pub mod usb;

pub use applications::{plan_lists, sync_applications, ApplicationSyncReport, ListPlan};
pub use boards::{sync_boards, BoardSyncReport};
pub use catalog::{validate_repository, CatalogSettings, RepositoryCatalog, RepositoryOptions};
pub use error::{Result, SyncError};
pub use jobs::{job_path, JobNamespace};
pub use makefile::{parse_makefile, read_makefile, MakefileInfo};
pub use provider::{CheckoutProvider, SnapshotProvider};
pub use usb::{reconcile_usb_devices, UsbDeviceInfo, UsbReconcileReport};
