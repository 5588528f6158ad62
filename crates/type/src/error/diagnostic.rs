// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Error, listed_options};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub help: Option<String>,
	pub notes: Vec<String>,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.code, self.message)
	}
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

fn diagnostic(code: &str, message: String, help: Option<String>, notes: Vec<String>) -> Diagnostic {
	Diagnostic {
		code: code.to_string(),
		message,
		help,
		notes,
	}
}

impl IntoDiagnostic for ConfigurationError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			ConfigurationError::InvalidOption {
				context,
				valid,
				..
			} => {
				diagnostic(
					"CONFIG_001",
					message,
					Some(format!("Valid options in this context are: {}", listed_options(&valid))),
					vec![format!("the option was given on a {}", context)],
				)
			}
			ConfigurationError::RedundantOption {
				..
			} => diagnostic(
				"CONFIG_002",
				message,
				Some("specify each option at most once".to_string()),
				vec![],
			),
			ConfigurationError::ConflictingOptions {
				..
			} => diagnostic(
				"CONFIG_003",
				message,
				Some("a foreign table reads either a remote query or a remote table, not both".to_string()),
				vec![],
			),
			ConfigurationError::MissingOption {
				option,
			} => diagnostic(
				"CONFIG_004",
				message,
				Some(format!("add the \"{}\" option to the foreign server", option)),
				vec![],
			),
			ConfigurationError::MissingSource => diagnostic(
				"CONFIG_005",
				message,
				Some("set either the \"query\" or the \"table\" option on the foreign table".to_string()),
				vec![],
			),
			ConfigurationError::InvalidValue {
				..
			} => diagnostic("CONFIG_006", message, None, vec![]),
			ConfigurationError::MissingObject {
				..
			} => diagnostic("CONFIG_007", message, None, vec![]),
		}
	}
}

impl IntoDiagnostic for Error {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			Error::Configuration(err) => err.into_diagnostic(),
			Error::BridgeInit {
				..
			} => diagnostic(
				"BRIDGE_001",
				message,
				Some("check the runtime library path and the maxheapsize option".to_string()),
				vec!["the managed runtime is created at most once per process".to_string()],
			),
			Error::BridgeBinding {
				..
			} => diagnostic(
				"BRIDGE_002",
				message,
				Some("check that the helper classes are on the runtime classpath".to_string()),
				vec![],
			),
			Error::Bridge {
				..
			} => diagnostic("BRIDGE_003", message, None, vec![]),
			Error::Conversion {
				..
			} => diagnostic("BRIDGE_004", message, None, vec![]),
			Error::RemoteInit(_) => diagnostic(
				"REMOTE_001",
				message,
				None,
				vec!["the text above is reported by the remote driver".to_string()],
			),
			Error::RemoteClose(_) => diagnostic(
				"REMOTE_002",
				message,
				None,
				vec!["the text above is reported by the remote driver".to_string()],
			),
			Error::QueryCancelled {
				cancel_error,
			} => diagnostic(
				"SCAN_001",
				message,
				None,
				cancel_error.map(|text| format!("remote cancel reported: {}", text)).into_iter().collect(),
			),
			Error::InvalidState {
				..
			} => diagnostic("SCAN_002", message, None, vec![]),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_option_lists_valid_set() {
		let diagnostic = ConfigurationError::InvalidOption {
			option: "host".to_string(),
			context: "foreign server".to_string(),
			valid: vec!["drivername".to_string(), "url".to_string()],
		}
		.into_diagnostic();

		assert_eq!(diagnostic.code, "CONFIG_001");
		assert_eq!(
			diagnostic.message,
			"invalid option \"host\"; valid options in this context are: drivername, url"
		);
		assert_eq!(diagnostic.help.as_deref(), Some("Valid options in this context are: drivername, url"));
	}

	#[test]
	fn test_invalid_option_without_valid_set() {
		let diagnostic = ConfigurationError::InvalidOption {
			option: "url".to_string(),
			context: "foreign data wrapper".to_string(),
			valid: vec![],
		}
		.into_diagnostic();

		assert_eq!(diagnostic.help.as_deref(), Some("Valid options in this context are: <none>"));
	}

	#[test]
	fn test_invalid_option_display_names_valid_set() {
		let err = Error::from(ConfigurationError::InvalidOption {
			option: "jarfile".to_string(),
			context: "user mapping".to_string(),
			valid: vec!["username".to_string(), "password".to_string()],
		});

		assert_eq!(
			err.to_string(),
			"invalid option \"jarfile\"; valid options in this context are: username, password"
		);
	}

	#[test]
	fn test_invalid_option_display_with_empty_valid_set() {
		let err = ConfigurationError::InvalidOption {
			option: "url".to_string(),
			context: "foreign data wrapper".to_string(),
			valid: vec![],
		};

		assert!(err.to_string().ends_with("valid options in this context are: <none>"));
	}

	#[test]
	fn test_remote_text_passes_through() {
		let text = "java.sql.SQLException: relation \"t\" does not exist\n\tat Driver.execute".to_string();
		let diagnostic = Error::RemoteInit(text.clone()).into_diagnostic();
		assert_eq!(diagnostic.code, "REMOTE_001");
		assert_eq!(diagnostic.message, text);
	}

	#[test]
	fn test_cancel_detail_becomes_note() {
		let diagnostic = Error::QueryCancelled {
			cancel_error: Some("connection already closed".to_string()),
		}
		.into_diagnostic();
		assert_eq!(diagnostic.code, "SCAN_001");
		assert_eq!(diagnostic.notes, vec!["remote cancel reported: connection already closed".to_string()]);
	}

	#[test]
	fn test_diagnostic_serializes() {
		let diagnostic = Error::from(ConfigurationError::MissingSource).into_diagnostic();
		let json = serde_json::to_value(&diagnostic).unwrap();
		assert_eq!(json["code"], "CONFIG_005");
	}
}
