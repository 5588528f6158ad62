// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use jdbc_fdw_config::TableId;
use jdbc_fdw_type::{Result, Row, TupleDesc};

use crate::{
	context::ScanContext,
	explain::ExplainInfo,
	planner::{AccessPath, CostEstimate, ScanPlan, legacy, staged},
	session::ScanSession,
};

/// The callbacks an engine drives a foreign data wrapper through.
///
/// Engines with path-based planning call `get_rel_size`, `get_paths` and
/// `get_plan`; older ones call `plan_foreign_scan` once. Execution is the same
/// for both.
pub trait ForeignScanRoutine {
	type Scan<'s>
	where
		Self: 's;

	fn plan_foreign_scan(&self, table: TableId) -> Result<CostEstimate>;

	fn get_rel_size(&self, table: TableId) -> Result<CostEstimate>;

	fn get_paths(&self, table: TableId, estimate: &CostEstimate) -> Vec<AccessPath>;

	fn get_plan<E>(&self, table: TableId, path: &AccessPath, filters: Vec<E>) -> ScanPlan<E>;

	/// Starts a scan. With `explain_only` no remote session is opened.
	fn begin<'s>(&'s self, table: TableId, explain_only: bool) -> Result<Self::Scan<'s>>;

	fn explain(&self, scan: &mut Self::Scan<'_>) -> Result<ExplainInfo>;

	fn iterate(&self, scan: &mut Self::Scan<'_>, shape: &TupleDesc) -> Result<Option<Row>>;

	fn rescan(&self, scan: &mut Self::Scan<'_>) -> Result<()>;

	fn end(&self, scan: &mut Self::Scan<'_>) -> Result<()>;
}

/// The JDBC foreign data wrapper.
pub struct JdbcFdw {
	context: ScanContext,
}

impl JdbcFdw {
	pub fn new(context: ScanContext) -> Self {
		Self {
			context,
		}
	}

	pub fn context(&self) -> &ScanContext {
		&self.context
	}
}

impl ForeignScanRoutine for JdbcFdw {
	type Scan<'s> = ScanSession<'s>;

	fn plan_foreign_scan(&self, table: TableId) -> Result<CostEstimate> {
		Ok(legacy::plan_foreign_scan(&self.context, table)?.estimate)
	}

	fn get_rel_size(&self, table: TableId) -> Result<CostEstimate> {
		staged::get_rel_size(&self.context, table)
	}

	fn get_paths(&self, _table: TableId, estimate: &CostEstimate) -> Vec<AccessPath> {
		staged::get_paths(estimate)
	}

	fn get_plan<E>(&self, table: TableId, path: &AccessPath, filters: Vec<E>) -> ScanPlan<E> {
		staged::get_plan(table, path, filters)
	}

	fn begin<'s>(&'s self, table: TableId, explain_only: bool) -> Result<ScanSession<'s>> {
		let mut scan = ScanSession::new(&self.context, table);
		if !explain_only {
			scan.begin()?;
		}
		Ok(scan)
	}

	fn explain(&self, scan: &mut ScanSession<'_>) -> Result<ExplainInfo> {
		scan.explain()
	}

	fn iterate(&self, scan: &mut ScanSession<'_>, shape: &TupleDesc) -> Result<Option<Row>> {
		scan.iterate(shape)
	}

	fn rescan(&self, scan: &mut ScanSession<'_>) -> Result<()> {
		scan.rescan()
	}

	fn end(&self, scan: &mut ScanSession<'_>) -> Result<()> {
		scan.end()
	}
}
