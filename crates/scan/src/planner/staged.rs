// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use jdbc_fdw_config::TableId;
use jdbc_fdw_type::Result;
use serde::{Deserialize, Serialize};

use super::{CostEstimate, plan};
use crate::context::ScanContext;

/// A candidate way to scan the foreign table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessPath {
	pub rows: f64,
	pub startup_cost: f64,
	pub total_cost: f64,
}

/// Scan node handed to the executor.
///
/// `filters` are the engine's restriction clauses, kept as given. None of them
/// is sent to the remote side; the engine evaluates all of them on the
/// returned rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPlan<E> {
	pub table: TableId,
	pub path: AccessPath,
	pub filters: Vec<E>,
}

/// Size stage: the estimated row count, after checking that the table can be
/// planned at all.
pub fn get_rel_size(context: &ScanContext, table: TableId) -> Result<CostEstimate> {
	plan(context, table)
}

/// Path stage: exactly one path, with the fixed cost.
pub fn get_paths(estimate: &CostEstimate) -> Vec<AccessPath> {
	vec![AccessPath {
		rows: estimate.rows,
		startup_cost: estimate.startup_cost,
		total_cost: estimate.total_cost,
	}]
}

/// Plan stage.
pub fn get_plan<E>(table: TableId, path: &AccessPath, filters: Vec<E>) -> ScanPlan<E> {
	ScanPlan {
		table,
		path: *path,
		filters,
	}
}
