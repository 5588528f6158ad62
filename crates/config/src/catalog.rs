// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use jdbc_fdw_type::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServerId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u32);

impl Display for TableId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Display for ServerId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignTableDef {
	pub id: TableId,
	pub server: ServerId,
	pub options: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignServerDef {
	pub id: ServerId,
	pub name: String,
	pub options: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMappingDef {
	pub server: ServerId,
	pub user: UserId,
	pub options: Vec<(String, String)>,
}

/// Catalog lookups the resolver needs. Implemented by the host engine.
pub trait OptionSource: Send + Sync {
	fn foreign_table(&self, table: TableId) -> Result<ForeignTableDef>;

	fn foreign_server(&self, server: ServerId) -> Result<ForeignServerDef>;

	/// The credential mapping of `user` on `server`, if one was created.
	fn user_mapping(&self, server: ServerId, user: UserId) -> Result<Option<UserMappingDef>>;

	/// The user the current statement runs as.
	fn current_user(&self) -> UserId;
}
