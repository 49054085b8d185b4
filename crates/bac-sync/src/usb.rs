// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use bac_db::CatalogStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::Result;

/// One device as reported by the USB enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDeviceInfo {
	pub usb_id: String,
	#[serde(default)]
	pub tag: Option<String>,
	/// Device node the board is reachable on, e.g. `/dev/ttyUSB0`.
	pub device_path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsbReconcileReport {
	pub detached: u64,
	pub devices_created: usize,
	pub ports_attached: usize,
}

/// Make the port table mirror the currently connected devices.
///
/// Every port is detached first, so ports whose device went away end up
/// unattached.
#[instrument(skip(store, devices), fields(devices = devices.len()))]
pub async fn reconcile_usb_devices(
	store: &dyn CatalogStore,
	devices: &[UsbDeviceInfo],
) -> Result<UsbReconcileReport> {
	let mut report = UsbReconcileReport {
		detached: store.detach_all_ports().await?,
		..Default::default()
	};

	for device in devices {
		let (record, created) = store
			.get_or_create_usb_device(&device.usb_id, device.tag.as_deref())
			.await?;
		if created {
			report.devices_created += 1;
		}
		store.upsert_port(&device.device_path, Some(record.id)).await?;
		report.ports_attached += 1;
		debug!(usb_id = %device.usb_id, port = %device.device_path, "port attached");
	}

	info!(
		detached = report.detached,
		devices_created = report.devices_created,
		ports_attached = report.ports_attached,
		"usb devices reconciled"
	);
	Ok(report)
}
