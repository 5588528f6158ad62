// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use jdbc_fdw_config::EffectiveConfig;
use jdbc_fdw_type::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::query;

/// What a scan would run, for the engine's explain output. Never carries
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainInfo {
	pub remote_query: String,
	pub driver_class: String,
	pub url: String,
}

impl ExplainInfo {
	pub fn from_config(config: &EffectiveConfig) -> Self {
		Self {
			remote_query: query::build(config, false),
			driver_class: config.driver_class_name.clone(),
			url: config.connection_url.clone(),
		}
	}

	/// Label/value pairs for text explain output.
	pub fn properties(&self) -> [(&'static str, &str); 3] {
		[("Remote Query", self.remote_query.as_str()), ("Driver", self.driver_class.as_str()), ("URL", self.url.as_str())]
	}

	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string(self).map_err(|err| Error::conversion("explain info", err))
	}
}
