// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use jdbc_fdw_config::{EffectiveConfig, RemoteSource};

/// The SQL text sent to the remote side. A configured query is used verbatim;
/// a table is read with `SELECT *`. For cost estimation the text is prefixed
/// with `EXPLAIN`. The remote driver is the only judge of syntax.
pub fn build(config: &EffectiveConfig, for_explain: bool) -> String {
	let query = match &config.source {
		RemoteSource::Query(query) => query.clone(),
		RemoteSource::Table(table) => format!("SELECT * FROM {}", table),
	};
	if for_explain {
		format!("EXPLAIN {}", query)
	} else {
		query
	}
}
