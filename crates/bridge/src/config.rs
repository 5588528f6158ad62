// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_HELPER_CLASS: &str = "JdbcScanHelper";

/// Spare local reference slots per row frame on top of one per column.
pub const DEFAULT_FRAME_HEADROOM: usize = 4;

/// Process-level settings of the bridge. Unlike the catalog options these are
/// not per table; they describe how the runtime itself is found and shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
	/// Path of the runtime's shared library. Looked up under `JAVA_HOME`
	/// when unset.
	pub jvm_library: Option<PathBuf>,
	/// Classpath entries holding the helper classes.
	pub helper_classpath: Vec<PathBuf>,
	/// Additional runtime options, passed through verbatim.
	pub jvm_options: Vec<String>,
	pub helper_class: String,
	pub frame_headroom: usize,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			jvm_library: None,
			helper_classpath: Vec::new(),
			jvm_options: Vec::new(),
			helper_class: DEFAULT_HELPER_CLASS.to_string(),
			frame_headroom: DEFAULT_FRAME_HEADROOM,
		}
	}
}

impl BridgeConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Defaults overridden by `JDBC_FDW_JVM_LIBRARY`, `JDBC_FDW_HELPER_CLASSPATH`
	/// (path-list syntax) and `JDBC_FDW_JVM_OPTIONS` (whitespace separated).
	pub fn from_env() -> Self {
		let mut config = Self::default();

		if let Some(library) = env::var_os("JDBC_FDW_JVM_LIBRARY") {
			config.jvm_library = Some(PathBuf::from(library));
		}
		if let Some(classpath) = env::var_os("JDBC_FDW_HELPER_CLASSPATH") {
			config.helper_classpath = env::split_paths(&classpath).collect();
		}
		if let Ok(options) = env::var("JDBC_FDW_JVM_OPTIONS") {
			config.jvm_options = options.split_whitespace().map(str::to_string).collect();
		}
		config
	}

	pub fn jvm_library(mut self, path: impl Into<PathBuf>) -> Self {
		self.jvm_library = Some(path.into());
		self
	}

	pub fn helper_classpath(mut self, entry: impl Into<PathBuf>) -> Self {
		self.helper_classpath.push(entry.into());
		self
	}

	pub fn jvm_option(mut self, option: impl Into<String>) -> Self {
		self.jvm_options.push(option.into());
		self
	}

	pub fn helper_class(mut self, class: impl Into<String>) -> Self {
		self.helper_class = class.into();
		self
	}

	pub fn frame_headroom(mut self, headroom: usize) -> Self {
		self.frame_headroom = headroom;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builder() {
		let config = BridgeConfig::new()
			.jvm_library("/usr/lib/jvm/lib/server/libjvm.so")
			.helper_classpath("/opt/fdw")
			.jvm_option("-Xss1m")
			.frame_headroom(8);

		assert_eq!(config.jvm_library, Some(PathBuf::from("/usr/lib/jvm/lib/server/libjvm.so")));
		assert_eq!(config.helper_classpath, vec![PathBuf::from("/opt/fdw")]);
		assert_eq!(config.jvm_options, vec!["-Xss1m".to_string()]);
		assert_eq!(config.helper_class, DEFAULT_HELPER_CLASS);
		assert_eq!(config.frame_headroom, 8);
	}

	#[test]
	fn test_deserialize_partial() {
		let config: BridgeConfig = serde_json::from_str(r#"{"helper_class": "com.example.Helper"}"#).unwrap();
		assert_eq!(config.helper_class, "com.example.Helper");
		assert_eq!(config.frame_headroom, DEFAULT_FRAME_HEADROOM);
		assert!(config.helper_classpath.is_empty());
	}
}
