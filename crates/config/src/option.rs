// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use jdbc_fdw_type::ConfigurationError;

/// Catalog object an option list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
	Wrapper,
	Server,
	UserMapping,
	Table,
}

impl Display for ObjectKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ObjectKind::Wrapper => f.write_str("foreign data wrapper"),
			ObjectKind::Server => f.write_str("foreign server"),
			ObjectKind::UserMapping => f.write_str("user mapping"),
			ObjectKind::Table => f.write_str("foreign table"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
	DriverName,
	Url,
	QueryTimeout,
	JarFile,
	MaxHeapSize,
	Username,
	Password,
	Query,
	Table,
}

/// Every accepted spelling, with the object kind it may appear on.
/// `jarfilename` is an older spelling of `jarfile`.
const OPTIONS: &[(&str, OptionKey, ObjectKind)] = &[
	("drivername", OptionKey::DriverName, ObjectKind::Server),
	("url", OptionKey::Url, ObjectKind::Server),
	("querytimeout", OptionKey::QueryTimeout, ObjectKind::Server),
	("jarfile", OptionKey::JarFile, ObjectKind::Server),
	("jarfilename", OptionKey::JarFile, ObjectKind::Server),
	("maxheapsize", OptionKey::MaxHeapSize, ObjectKind::Server),
	("username", OptionKey::Username, ObjectKind::UserMapping),
	("password", OptionKey::Password, ObjectKind::UserMapping),
	("query", OptionKey::Query, ObjectKind::Table),
	("table", OptionKey::Table, ObjectKind::Table),
];

impl OptionKey {
	/// Looks up an option name as it may appear on an object of `kind`.
	pub fn lookup(name: &str, kind: ObjectKind) -> Option<OptionKey> {
		OPTIONS.iter().find(|(n, _, k)| *n == name && *k == kind).map(|(_, key, _)| *key)
	}

	pub fn name(&self) -> &'static str {
		match self {
			OptionKey::DriverName => "drivername",
			OptionKey::Url => "url",
			OptionKey::QueryTimeout => "querytimeout",
			OptionKey::JarFile => "jarfile",
			OptionKey::MaxHeapSize => "maxheapsize",
			OptionKey::Username => "username",
			OptionKey::Password => "password",
			OptionKey::Query => "query",
			OptionKey::Table => "table",
		}
	}

	pub fn kind(&self) -> ObjectKind {
		match self {
			OptionKey::DriverName
			| OptionKey::Url
			| OptionKey::QueryTimeout
			| OptionKey::JarFile
			| OptionKey::MaxHeapSize => ObjectKind::Server,
			OptionKey::Username | OptionKey::Password => ObjectKind::UserMapping,
			OptionKey::Query | OptionKey::Table => ObjectKind::Table,
		}
	}

	/// Checks the value shape of options that are not free text.
	pub fn check_value(&self, value: &str) -> Result<(), ConfigurationError> {
		match self {
			OptionKey::QueryTimeout | OptionKey::MaxHeapSize => parse_count(*self, value).map(|_| ()),
			_ => Ok(()),
		}
	}
}

/// Option names valid on `kind`, in declaration order.
pub fn valid_names(kind: ObjectKind) -> Vec<String> {
	OPTIONS.iter().filter(|(_, _, k)| *k == kind).map(|(name, _, _)| name.to_string()).collect()
}

/// Parses a non-negative integer option (seconds, megabytes).
pub(crate) fn parse_count(key: OptionKey, value: &str) -> Result<u32, ConfigurationError> {
	value.trim().parse::<u32>().map_err(|e| ConfigurationError::InvalidValue {
		option: key.name().to_string(),
		value: value.to_string(),
		reason: format!("expected a non-negative integer ({})", e),
	})
}

pub(crate) fn invalid_option(name: &str, kind: ObjectKind) -> ConfigurationError {
	ConfigurationError::InvalidOption {
		option: name.to_string(),
		context: kind.to_string(),
		valid: valid_names(kind),
	}
}
