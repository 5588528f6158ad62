// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use jdbc_fdw_config::TableId;
use jdbc_fdw_type::Result;

use super::{CostEstimate, plan};
use crate::context::ScanContext;

/// Result of the single-call planner callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyPlan {
	pub table: TableId,
	pub estimate: CostEstimate,
}

/// Plans a scan in one call, for engines without path-based planning.
pub fn plan_foreign_scan(context: &ScanContext, table: TableId) -> Result<LegacyPlan> {
	let estimate = plan(context, table)?;
	Ok(LegacyPlan {
		table,
		estimate,
	})
}
