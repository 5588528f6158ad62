// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use jdbc_fdw_type::ConfigurationError;
use tracing::instrument;

use crate::option::{ObjectKind, OptionKey, invalid_option};

const REQUIRED_SERVER_OPTIONS: [OptionKey; 3] = [OptionKey::DriverName, OptionKey::Url, OptionKey::JarFile];

/// Validates the option list given to one foreign object when it is created
/// or altered.
#[instrument(name = "config::validate", level = "trace", skip(options))]
pub fn validate_options(kind: ObjectKind, options: &[(String, String)]) -> Result<(), ConfigurationError> {
	let seen = check_layer(kind, options)?;

	if kind == ObjectKind::Server {
		if let Some(missing) = REQUIRED_SERVER_OPTIONS.iter().find(|key| !seen.contains(key)) {
			return Err(ConfigurationError::MissingOption {
				option: missing.name().to_string(),
			});
		}
	}

	Ok(())
}

/// Checks names, duplicates, the query/table exclusion and value shapes of a
/// single object's options. Returns the keys present.
pub(crate) fn check_layer(
	kind: ObjectKind,
	options: &[(String, String)],
) -> Result<HashSet<OptionKey>, ConfigurationError> {
	let mut seen = HashSet::new();

	for (name, value) in options {
		let key = OptionKey::lookup(name, kind).ok_or_else(|| invalid_option(name, kind))?;

		match key {
			OptionKey::Query if seen.contains(&OptionKey::Table) => {
				return Err(ConfigurationError::ConflictingOptions {
					option: "query".to_string(),
					other: "table".to_string(),
				});
			}
			OptionKey::Table if seen.contains(&OptionKey::Query) => {
				return Err(ConfigurationError::ConflictingOptions {
					option: "table".to_string(),
					other: "query".to_string(),
				});
			}
			_ => {}
		}

		if !seen.insert(key) {
			return Err(ConfigurationError::RedundantOption {
				option: key.name().to_string(),
			});
		}

		key.check_value(value)?;
	}

	Ok(seen)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn options(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
	}

	#[test]
	fn test_complete_server_is_valid() {
		let server = options(&[
			("drivername", "org.postgresql.Driver"),
			("url", "jdbc:postgresql://localhost/db"),
			("jarfile", "/opt/jdbc/postgresql.jar"),
			("querytimeout", "30"),
			("maxheapsize", "256"),
		]);
		assert!(validate_options(ObjectKind::Server, &server).is_ok());
	}

	#[test]
	fn test_server_requires_archive() {
		let server = options(&[("drivername", "org.postgresql.Driver"), ("url", "jdbc:postgresql://h/db")]);
		assert_eq!(
			validate_options(ObjectKind::Server, &server),
			Err(ConfigurationError::MissingOption {
				option: "jarfile".to_string()
			})
		);
	}

	#[test]
	fn test_unknown_option_enumerates_valid_set() {
		let err = validate_options(ObjectKind::UserMapping, &options(&[("user", "bob")])).unwrap_err();
		assert_eq!(
			err,
			ConfigurationError::InvalidOption {
				option: "user".to_string(),
				context: "user mapping".to_string(),
				valid: vec!["username".to_string(), "password".to_string()],
			}
		);
	}

	#[test]
	fn test_option_on_wrong_object_kind() {
		let err = validate_options(ObjectKind::Table, &options(&[("url", "jdbc:x")])).unwrap_err();
		assert!(matches!(err, ConfigurationError::InvalidOption { .. }));
	}

	#[test]
	fn test_query_conflicts_with_table() {
		let err = validate_options(ObjectKind::Table, &options(&[("table", "t"), ("query", "SELECT 1")])).unwrap_err();
		assert_eq!(
			err,
			ConfigurationError::ConflictingOptions {
				option: "query".to_string(),
				other: "table".to_string()
			}
		);
	}

	#[test]
	fn test_alias_counts_as_redundant() {
		let server = options(&[
			("drivername", "d"),
			("url", "u"),
			("jarfile", "/a.jar"),
			("jarfilename", "/b.jar"),
		]);
		assert_eq!(
			validate_options(ObjectKind::Server, &server),
			Err(ConfigurationError::RedundantOption {
				option: "jarfile".to_string()
			})
		);
	}

	#[test]
	fn test_table_without_source_is_valid_at_definition() {
		assert!(validate_options(ObjectKind::Table, &[]).is_ok());
	}

	#[test]
	fn test_non_numeric_timeout() {
		let err = validate_options(
			ObjectKind::Server,
			&options(&[("drivername", "d"), ("url", "u"), ("jarfile", "j"), ("querytimeout", "soon")]),
		)
		.unwrap_err();
		assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
	}
}
