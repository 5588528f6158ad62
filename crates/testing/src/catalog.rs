// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use jdbc_fdw_config::{
	ForeignServerDef, ForeignTableDef, ObjectKind, OptionSource, ServerId, TableId, UserId, UserMappingDef,
	validate_options,
};
use jdbc_fdw_type::{ConfigurationError, Result};
use parking_lot::RwLock;

#[derive(Default)]
struct Objects {
	servers: HashMap<ServerId, ForeignServerDef>,
	tables: HashMap<TableId, ForeignTableDef>,
	mappings: HashMap<(ServerId, UserId), UserMappingDef>,
	current_user: UserId,
}

/// An in-memory host catalog. Definitions go through the option validator,
/// the same way `CREATE SERVER` and friends would.
pub struct MemoryCatalog {
	objects: RwLock<Objects>,
}

impl MemoryCatalog {
	pub fn new() -> Self {
		Self {
			objects: RwLock::new(Objects {
				current_user: UserId(10),
				..Objects::default()
			}),
		}
	}

	pub fn define_server(&self, id: ServerId, name: &str, options: &[(&str, &str)]) -> Result<()> {
		let options = owned(options);
		validate_options(ObjectKind::Server, &options)?;
		self.objects.write().servers.insert(
			id,
			ForeignServerDef {
				id,
				name: name.to_string(),
				options,
			},
		);
		Ok(())
	}

	pub fn define_table(&self, id: TableId, server: ServerId, options: &[(&str, &str)]) -> Result<()> {
		let options = owned(options);
		validate_options(ObjectKind::Table, &options)?;
		self.objects.write().tables.insert(
			id,
			ForeignTableDef {
				id,
				server,
				options,
			},
		);
		Ok(())
	}

	pub fn define_user_mapping(&self, server: ServerId, user: UserId, options: &[(&str, &str)]) -> Result<()> {
		let options = owned(options);
		validate_options(ObjectKind::UserMapping, &options)?;
		self.objects.write().mappings.insert(
			(server, user),
			UserMappingDef {
				server,
				user,
				options,
			},
		);
		Ok(())
	}

	/// Replaces a table's options without validation, as a catalog edited
	/// behind the validator's back would.
	pub fn force_table_options(&self, id: TableId, options: &[(&str, &str)]) {
		if let Some(table) = self.objects.write().tables.get_mut(&id) {
			table.options = owned(options);
		}
	}

	pub fn force_server_options(&self, id: ServerId, options: &[(&str, &str)]) {
		if let Some(server) = self.objects.write().servers.get_mut(&id) {
			server.options = owned(options);
		}
	}

	pub fn set_current_user(&self, user: UserId) {
		self.objects.write().current_user = user;
	}
}

impl Default for MemoryCatalog {
	fn default() -> Self {
		Self::new()
	}
}

fn owned(options: &[(&str, &str)]) -> Vec<(String, String)> {
	options.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn missing(kind: ObjectKind, name: String) -> ConfigurationError {
	ConfigurationError::MissingObject {
		kind: kind.to_string(),
		name,
	}
}

impl OptionSource for MemoryCatalog {
	fn foreign_table(&self, table: TableId) -> Result<ForeignTableDef> {
		self.objects
			.read()
			.tables
			.get(&table)
			.cloned()
			.ok_or_else(|| missing(ObjectKind::Table, table.to_string()).into())
	}

	fn foreign_server(&self, server: ServerId) -> Result<ForeignServerDef> {
		self.objects
			.read()
			.servers
			.get(&server)
			.cloned()
			.ok_or_else(|| missing(ObjectKind::Server, server.to_string()).into())
	}

	fn user_mapping(&self, server: ServerId, user: UserId) -> Result<Option<UserMappingDef>> {
		Ok(self.objects.read().mappings.get(&(server, user)).cloned())
	}

	fn current_user(&self) -> UserId {
		self.objects.read().current_user
	}
}
