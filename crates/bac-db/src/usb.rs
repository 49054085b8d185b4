// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::Row;
use uuid::Uuid;

use crate::catalog::CatalogRepository;
use crate::error::DbError;
use crate::types::{parse_opt_uuid, parse_uuid, PortRecord, UsbDeviceRecord};

impl CatalogRepository {
	/// Find the device by `usb_id`, inserting it when absent. An existing
	/// device whose tag differs gets the new tag.
	#[tracing::instrument(skip(self), fields(usb_id = %usb_id))]
	pub async fn get_or_create_usb_device(
		&self,
		usb_id: &str,
		tag: Option<&str>,
	) -> Result<(UsbDeviceRecord, bool), DbError> {
		let mut tx = self.pool.begin().await?;

		let existing = sqlx::query("SELECT id, usb_id, tag FROM usb_devices WHERE usb_id = ?")
			.bind(usb_id)
			.fetch_optional(&mut *tx)
			.await?;

		let (device, created) = match existing {
			Some(row) => {
				let mut device = row_to_usb_device(&row)?;
				if device.tag.as_deref() != tag {
					sqlx::query("UPDATE usb_devices SET tag = ? WHERE id = ?")
						.bind(tag)
						.bind(device.id.to_string())
						.execute(&mut *tx)
						.await?;
					device.tag = tag.map(str::to_string);
				}
				(device, false)
			}
			None => {
				let device = UsbDeviceRecord {
					id: Uuid::new_v4(),
					usb_id: usb_id.to_string(),
					tag: tag.map(str::to_string),
				};
				sqlx::query("INSERT INTO usb_devices (id, usb_id, tag) VALUES (?, ?, ?)")
					.bind(device.id.to_string())
					.bind(&device.usb_id)
					.bind(&device.tag)
					.execute(&mut *tx)
					.await?;
				(device, true)
			}
		};

		tx.commit().await?;
		Ok((device, created))
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_usb_devices(&self) -> Result<Vec<UsbDeviceRecord>, DbError> {
		let rows = sqlx::query("SELECT id, usb_id, tag FROM usb_devices ORDER BY usb_id ASC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_usb_device).collect()
	}

	/// Clear the device link of every port. Returns the number of ports that
	/// were attached.
	#[tracing::instrument(skip(self))]
	pub async fn detach_all_ports(&self) -> Result<u64, DbError> {
		let result =
			sqlx::query("UPDATE ports SET usb_device_id = NULL WHERE usb_device_id IS NOT NULL")
				.execute(&self.pool)
				.await?;

		Ok(result.rows_affected())
	}

	/// Point the port at `path` to `usb_device_id`, creating the port when the
	/// path is unseen.
	#[tracing::instrument(skip(self), fields(path = %path))]
	pub async fn upsert_port(
		&self,
		path: &str,
		usb_device_id: Option<Uuid>,
	) -> Result<PortRecord, DbError> {
		sqlx::query(
			r#"
			INSERT INTO ports (id, path, usb_device_id)
			VALUES (?, ?, ?)
			ON CONFLICT(path) DO UPDATE SET usb_device_id = excluded.usb_device_id
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(path)
		.bind(usb_device_id.map(|id| id.to_string()))
		.execute(&self.pool)
		.await?;

		let row = sqlx::query("SELECT id, path, usb_device_id FROM ports WHERE path = ?")
			.bind(path)
			.fetch_one(&self.pool)
			.await?;

		row_to_port(&row)
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_ports(&self) -> Result<Vec<PortRecord>, DbError> {
		let rows = sqlx::query("SELECT id, path, usb_device_id FROM ports ORDER BY path ASC")
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_port).collect()
	}
}

fn row_to_usb_device(row: &sqlx::sqlite::SqliteRow) -> Result<UsbDeviceRecord, DbError> {
	let id_str: String = row.get("id");

	Ok(UsbDeviceRecord {
		id: parse_uuid(&id_str)?,
		usb_id: row.get("usb_id"),
		tag: row.get("tag"),
	})
}

fn row_to_port(row: &sqlx::sqlite::SqliteRow) -> Result<PortRecord, DbError> {
	let id_str: String = row.get("id");

	Ok(PortRecord {
		id: parse_uuid(&id_str)?,
		path: row.get("path"),
		usb_device_id: parse_opt_uuid(row.get("usb_device_id"))?,
	})
}
