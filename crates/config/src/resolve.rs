// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fmt::{Debug, Formatter},
	path::{Path, PathBuf},
};

use jdbc_fdw_type::{ConfigurationError, Result};
use tracing::{debug, instrument};

use crate::{
	catalog::{OptionSource, TableId},
	option::{ObjectKind, OptionKey, parse_count},
	validate::check_layer,
};

/// What the remote side is asked to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSource {
	/// A query text sent verbatim.
	Query(String),
	/// A remote table read in full.
	Table(String),
}

/// Options in effect for one scan, merged from the table, server and user
/// mapping layers. Owned by the scan that resolved it.
#[derive(Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
	pub driver_class_name: String,
	pub connection_url: String,
	/// Seconds; `0` leaves the driver default.
	pub query_timeout_seconds: u32,
	pub driver_archive_path: PathBuf,
	/// Megabytes; `0` leaves the runtime default.
	pub max_heap_megabytes: u32,
	pub username: Option<String>,
	pub password: Option<String>,
	pub source: RemoteSource,
}

impl EffectiveConfig {
	pub fn query_text(&self) -> Option<&str> {
		match &self.source {
			RemoteSource::Query(query) => Some(query),
			RemoteSource::Table(_) => None,
		}
	}

	pub fn table_name(&self) -> Option<&str> {
		match &self.source {
			RemoteSource::Table(table) => Some(table),
			RemoteSource::Query(_) => None,
		}
	}

	pub fn username_or_empty(&self) -> &str {
		self.username.as_deref().unwrap_or("")
	}

	pub fn password_or_empty(&self) -> &str {
		self.password.as_deref().unwrap_or("")
	}

	/// The archive path made absolute against the working directory, the
	/// form the managed class loader expects.
	pub fn resolved_archive_path(&self) -> PathBuf {
		absolute(&self.driver_archive_path)
	}
}

fn absolute(path: &Path) -> PathBuf {
	if path.is_absolute() {
		return path.to_path_buf();
	}
	match std::env::current_dir() {
		Ok(cwd) => cwd.join(path),
		Err(_) => path.to_path_buf(),
	}
}

impl Debug for EffectiveConfig {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EffectiveConfig")
			.field("driver_class_name", &self.driver_class_name)
			.field("connection_url", &self.connection_url)
			.field("query_timeout_seconds", &self.query_timeout_seconds)
			.field("driver_archive_path", &self.driver_archive_path)
			.field("max_heap_megabytes", &self.max_heap_megabytes)
			.field("username", &self.username)
			.field("password", &self.password.as_ref().map(|_| "********"))
			.field("source", &self.source)
			.finish()
	}
}

/// Reads the options of a foreign table, its server and the caller's user
/// mapping and merges them into one [`EffectiveConfig`].
pub struct ConfigurationResolver<'a> {
	source: &'a dyn OptionSource,
}

impl<'a> ConfigurationResolver<'a> {
	pub fn new(source: &'a dyn OptionSource) -> Self {
		Self {
			source,
		}
	}

	#[instrument(name = "config::resolve", level = "trace", skip(self))]
	pub fn resolve(&self, table: TableId) -> Result<EffectiveConfig> {
		let table_def = self.source.foreign_table(table)?;
		let server_def = self.source.foreign_server(table_def.server)?;
		let user = self.source.current_user();
		let mapping = self.source.user_mapping(table_def.server, user)?;

		let mut layers: Vec<(ObjectKind, &[(String, String)])> =
			vec![(ObjectKind::Table, table_def.options.as_slice()), (ObjectKind::Server, server_def.options.as_slice())];
		if let Some(mapping) = &mapping {
			layers.push((ObjectKind::UserMapping, mapping.options.as_slice()));
		}

		let merged = merge(&layers)?;
		let config = build(merged)?;

		debug!(
			table = %table,
			server = %server_def.name,
			driver = %config.driver_class_name,
			"resolved foreign table options"
		);
		Ok(config)
	}
}

/// Merges option layers in order; the first layer to define a key wins.
fn merge(layers: &[(ObjectKind, &[(String, String)])]) -> Result<HashMap<OptionKey, String>> {
	let mut merged = HashMap::new();
	for (kind, options) in layers {
		check_layer(*kind, options)?;
		for (name, value) in options.iter() {
			if let Some(key) = OptionKey::lookup(name, *kind) {
				merged.entry(key).or_insert_with(|| value.clone());
			}
		}
	}
	Ok(merged)
}

fn build(mut merged: HashMap<OptionKey, String>) -> Result<EffectiveConfig> {
	let source = match (merged.remove(&OptionKey::Query), merged.remove(&OptionKey::Table)) {
		(Some(query), None) => RemoteSource::Query(query),
		(None, Some(table)) => RemoteSource::Table(table),
		(Some(_), Some(_)) => {
			return Err(ConfigurationError::ConflictingOptions {
				option: "query".to_string(),
				other: "table".to_string(),
			}
			.into());
		}
		(None, None) => return Err(ConfigurationError::MissingSource.into()),
	};

	let driver_class_name = required(&mut merged, OptionKey::DriverName)?;
	let connection_url = required(&mut merged, OptionKey::Url)?;
	let driver_archive_path = PathBuf::from(required(&mut merged, OptionKey::JarFile)?);

	let query_timeout_seconds = match merged.remove(&OptionKey::QueryTimeout) {
		Some(value) => parse_count(OptionKey::QueryTimeout, &value)?,
		None => 0,
	};
	let max_heap_megabytes = match merged.remove(&OptionKey::MaxHeapSize) {
		Some(value) => parse_count(OptionKey::MaxHeapSize, &value)?,
		None => 0,
	};

	Ok(EffectiveConfig {
		driver_class_name,
		connection_url,
		query_timeout_seconds,
		driver_archive_path,
		max_heap_megabytes,
		username: merged.remove(&OptionKey::Username),
		password: merged.remove(&OptionKey::Password),
		source,
	})
}

fn required(merged: &mut HashMap<OptionKey, String>, key: OptionKey) -> std::result::Result<String, ConfigurationError> {
	merged.remove(&key).ok_or_else(|| ConfigurationError::MissingOption {
		option: key.name().to_string(),
	})
}
