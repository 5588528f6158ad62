// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Cost estimation for foreign scans.
//!
//! Both planner callback shapes, the single-call [`legacy`] one and the
//! [`staged`] size/paths/plan one, go through [`plan`]. Planning brings the
//! runtime up and checks that the options resolve, but never opens a remote
//! session.

pub mod legacy;
pub mod staged;

use jdbc_fdw_config::TableId;
use jdbc_fdw_type::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use staged::{AccessPath, ScanPlan};

use crate::{context::ScanContext, query};

/// Rows assumed for every foreign table; no statistics are gathered remotely.
pub const ESTIMATED_ROWS: f64 = 1000.0;

pub const STARTUP_COST: f64 = 10.0;

pub const ROW_COST: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
	pub rows: f64,
	pub startup_cost: f64,
	pub total_cost: f64,
}

impl CostEstimate {
	pub fn fixed() -> Self {
		Self {
			rows: ESTIMATED_ROWS,
			startup_cost: STARTUP_COST,
			total_cost: STARTUP_COST + ESTIMATED_ROWS * ROW_COST,
		}
	}
}

/// Estimates the cost of scanning `table`.
#[instrument(name = "scan::planner::plan", level = "trace", skip(context))]
pub fn plan(context: &ScanContext, table: TableId) -> Result<CostEstimate> {
	context.monitor().poll()?;

	let config = context.resolve(table)?;
	context.ensure_runtime(&config)?;

	let estimate = CostEstimate::fixed();
	debug!(
		table = %table,
		query = %query::build(&config, true),
		rows = estimate.rows,
		"foreign scan planned"
	);
	Ok(estimate)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fixed_estimate() {
		let estimate = CostEstimate::fixed();
		assert_eq!(estimate.rows, 1000.0);
		assert_eq!(estimate.startup_cost, 10.0);
		assert_eq!(estimate.total_cost, 1010.0);
	}
}
