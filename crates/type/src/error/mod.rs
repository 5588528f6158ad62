// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

mod diagnostic;

pub use diagnostic::{Diagnostic, IntoDiagnostic};

/// Option names joined for messages, `<none>` when a context takes none.
fn listed_options(valid: &[String]) -> String {
	if valid.is_empty() {
		"<none>".to_string()
	} else {
		valid.join(", ")
	}
}

/// Bad, missing or conflicting foreign object options.
///
/// Raised either when an option list is defined (validator) or when a scan
/// resolves its effective configuration. A scan never starts after one of
/// these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
	#[error("invalid option \"{option}\"; valid options in this context are: {}", listed_options(.valid))]
	InvalidOption {
		option: String,
		context: String,
		valid: Vec<String>,
	},

	#[error("conflicting or redundant options: {option}")]
	RedundantOption {
		option: String,
	},

	#[error("conflicting options: {option} cannot be used with {other}")]
	ConflictingOptions {
		option: String,
		other: String,
	},

	#[error("{option} must be specified")]
	MissingOption {
		option: String,
	},

	#[error("either a table or a query must be specified")]
	MissingSource,

	#[error("invalid value for option \"{option}\": {reason}")]
	InvalidValue {
		option: String,
		value: String,
		reason: String,
	},

	#[error("{kind} \"{name}\" does not exist")]
	MissingObject {
		kind: String,
		name: String,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	/// The embedded runtime could not be brought up. Not retried: bring-up is
	/// irreversible for the lifetime of the process.
	#[error("failed to create managed runtime: {reason}")]
	BridgeInit {
		reason: String,
	},

	/// A class, method or field the bridge depends on could not be resolved.
	#[error("cannot bind {member_kind} {class}.{member} with signature {signature}")]
	BridgeBinding {
		member_kind: &'static str,
		class: String,
		member: String,
		signature: String,
	},

	/// A managed-side call raised instead of returning error text.
	#[error("bridge call {operation} failed: {reason}")]
	Bridge {
		operation: &'static str,
		reason: String,
	},

	#[error("{0}")]
	RemoteInit(String),

	#[error("{0}")]
	RemoteClose(String),

	#[error("canceling statement due to user request")]
	QueryCancelled {
		cancel_error: Option<String>,
	},

	/// A value crossing the boundary did not have the expected shape.
	#[error("cannot convert {what}: {reason}")]
	Conversion {
		what: String,
		reason: String,
	},

	#[error("{operation} is not allowed while the scan is {state}")]
	InvalidState {
		operation: &'static str,
		state: &'static str,
	},
}

impl Error {
	pub fn bridge(operation: &'static str, reason: impl ToString) -> Self {
		Error::Bridge {
			operation,
			reason: reason.to_string(),
		}
	}

	pub fn conversion(what: impl Into<String>, reason: impl ToString) -> Self {
		Error::Conversion {
			what: what.into(),
			reason: reason.to_string(),
		}
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::QueryCancelled { .. })
	}
}
