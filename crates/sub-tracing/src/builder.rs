// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::str::FromStr;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable whose directives replace the configured ones.
pub const LOG_ENV: &str = "JDBC_FDW_LOG";

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
	#[error("invalid log filter \"{directives}\": {reason}")]
	InvalidFilter {
		directives: String,
		reason: String,
	},

	#[error("failed to install tracing subscriber: {0}")]
	Install(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
	#[default]
	Compact,
	/// One JSON object per line.
	Json,
}

impl FromStr for LogFormat {
	type Err = TracingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"compact" | "text" => Ok(LogFormat::Compact),
			"json" | "jsonl" => Ok(LogFormat::Json),
			other => Err(TracingError::InvalidFilter {
				directives: other.to_string(),
				reason: "unknown log format".to_string(),
			}),
		}
	}
}

/// Builder for the process subscriber
#[derive(Debug, Clone)]
pub struct TracingBuilder {
	level: String,
	directives: Vec<String>,
	format: LogFormat,
	ansi: bool,
	target: bool,
	use_env: bool,
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self {
			level: "info".to_string(),
			directives: Vec::new(),
			format: LogFormat::Compact,
			ansi: false,
			target: true,
			use_env: true,
		}
	}

	/// Default level for every target without its own directive.
	pub fn with_level(mut self, level: impl Into<String>) -> Self {
		self.level = level.into();
		self
	}

	/// Adds a `target=level` directive.
	pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
		self.directives.push(directive.into());
		self
	}

	pub fn with_format(mut self, format: LogFormat) -> Self {
		self.format = format;
		self
	}

	pub fn with_ansi(mut self, ansi: bool) -> Self {
		self.ansi = ansi;
		self
	}

	pub fn with_target(mut self, target: bool) -> Self {
		self.target = target;
		self
	}

	/// Whether [`LOG_ENV`] may override the configured directives.
	pub fn with_env(mut self, use_env: bool) -> Self {
		self.use_env = use_env;
		self
	}

	pub fn format(&self) -> LogFormat {
		self.format
	}

	/// The configured directives as one filter string, level first.
	pub fn directives(&self) -> String {
		std::iter::once(self.level.as_str()).chain(self.directives.iter().map(String::as_str)).collect::<Vec<_>>().join(",")
	}

	pub fn filter(&self) -> Result<EnvFilter, TracingError> {
		if self.use_env {
			if let Ok(directives) = std::env::var(LOG_ENV) {
				return parse_filter(&directives);
			}
		}
		parse_filter(&self.directives())
	}

	/// Installs the subscriber. Fails if one is already installed.
	pub fn try_init(self) -> Result<(), TracingError> {
		let filter = self.filter()?;
		let registry = tracing_subscriber::registry().with(filter);

		let installed = match self.format {
			LogFormat::Compact => registry
				.with(fmt::layer().compact().with_ansi(self.ansi).with_target(self.target).with_writer(std::io::stderr))
				.try_init(),
			LogFormat::Json => registry
				.with(fmt::layer().json().with_target(self.target).with_writer(std::io::stderr))
				.try_init(),
		};
		installed.map_err(|err| TracingError::Install(err.to_string()))?;

		debug!(format = ?self.format, "tracing subscriber installed");
		Ok(())
	}
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn parse_filter(directives: &str) -> Result<EnvFilter, TracingError> {
	EnvFilter::try_new(directives).map_err(|err| TracingError::InvalidFilter {
		directives: directives.to_string(),
		reason: err.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_directives_start_with_level() {
		let builder = TracingBuilder::new().with_level("warn").with_directive("jdbc_fdw_scan=trace");
		assert_eq!(builder.directives(), "warn,jdbc_fdw_scan=trace");
	}

	#[test]
	fn test_default_is_info_compact() {
		let builder = TracingBuilder::default();
		assert_eq!(builder.directives(), "info");
		assert_eq!(builder.format(), LogFormat::Compact);
	}

	#[test]
	fn test_invalid_directive_is_rejected() {
		let err = TracingBuilder::new().with_env(false).with_directive("jdbc_fdw_scan=loud").filter().unwrap_err();
		assert!(matches!(err, TracingError::InvalidFilter { .. }));
	}

	#[test]
	fn test_log_format_names() {
		assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
		assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
		assert!("xml".parse::<LogFormat>().is_err());
	}
}
