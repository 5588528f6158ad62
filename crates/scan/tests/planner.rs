// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Planner adapters never open a remote session

mod common;

use common::{TABLE, URL, catalog, harness, harness_with, three_rows};
use jdbc_fdw_config::{ServerId, TableId};
use jdbc_fdw_scan::{
	ForeignScanRoutine, JdbcFdw,
	planner::{self, legacy},
};
use jdbc_fdw_testing::MockLauncher;
use jdbc_fdw_type::{ConfigurationError, Error, Result, TupleDesc};

#[test]
fn test_plan_brings_up_runtime_without_session() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));

	let estimate = planner::plan(&h.context, TABLE)?;

	assert_eq!(estimate.rows, 1000.0);
	assert_eq!(estimate.total_cost, 1010.0);
	assert_eq!(h.probe.launches(), 1);
	assert!(h.probe.calls().is_empty());
	assert_eq!(h.probe.open_helpers(), 0);
	Ok(())
}

#[test]
fn test_legacy_plan() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));

	let plan = legacy::plan_foreign_scan(&h.context, TABLE)?;

	assert_eq!(plan.table, TABLE);
	assert_eq!(plan.estimate.startup_cost, 10.0);
	assert!(h.probe.calls().is_empty());
	Ok(())
}

#[test]
fn test_bad_config_fails_planning_before_launch() {
	let catalog = catalog();
	catalog.force_table_options(TABLE, &[("table", "t"), ("query", "select 1")]);
	let h = harness_with(MockLauncher::new().with_table(URL, three_rows()), catalog);

	let err = planner::plan(&h.context, TABLE).unwrap_err();

	assert!(matches!(err, Error::Configuration(ConfigurationError::ConflictingOptions { .. })));
	assert_eq!(h.probe.launches(), 0);
}

#[test]
fn test_unknown_table_fails_planning() {
	let h = harness(MockLauncher::new());

	let err = planner::plan(&h.context, TableId(99)).unwrap_err();

	assert!(matches!(err, Error::Configuration(ConfigurationError::MissingObject { .. })));
	assert_eq!(h.probe.launches(), 0);
}

#[test]
fn test_failed_launch_is_reported_on_every_plan() {
	let h = harness(MockLauncher::new().fail_launch("libjvm.so: cannot open shared object file"));

	for _ in 0..2 {
		let err = planner::plan(&h.context, TABLE).unwrap_err();
		assert!(matches!(err, Error::BridgeInit { .. }));
	}
	assert_eq!(h.probe.launches(), 1);
}

#[test]
fn test_max_heap_size_reaches_launch() -> Result<()> {
	let catalog = catalog();
	catalog.define_server(
		ServerId(1),
		"remote",
		&[("drivername", "org.h2.Driver"), ("url", URL), ("jarfile", "/opt/jdbc/h2.jar"), ("maxheapsize", "256")],
	)?;
	let h = harness_with(MockLauncher::new(), catalog);

	planner::plan(&h.context, TABLE)?;

	let options = h.probe.launch_options();
	assert_eq!(options.len(), 1);
	assert_eq!(options[0].max_heap_megabytes, 256);
	Ok(())
}

#[test]
fn test_routine_drives_full_scan() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let fdw = JdbcFdw::new(h.context);
	let shape = TupleDesc::text(2);

	let estimate = fdw.get_rel_size(TABLE)?;
	let paths = fdw.get_paths(TABLE, &estimate);
	assert_eq!(paths.len(), 1);
	let plan = fdw.get_plan(TABLE, &paths[0], vec!["c1 > 1"]);
	assert_eq!(plan.filters, vec!["c1 > 1"]);

	let mut scan = fdw.begin(TABLE, false)?;
	let mut rows = 0;
	while fdw.iterate(&mut scan, &shape)?.is_some() {
		rows += 1;
	}
	fdw.end(&mut scan)?;

	assert_eq!(rows, 3);
	assert_eq!(h.probe.launches(), 1);
	assert_eq!(h.probe.open_helpers(), 0);
	Ok(())
}

#[test]
fn test_routine_explain_only_begin() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let fdw = JdbcFdw::new(h.context);

	let mut scan = fdw.begin(TABLE, true)?;
	let info = fdw.explain(&mut scan)?;
	fdw.end(&mut scan)?;

	assert_eq!(info.properties()[0], ("Remote Query", "SELECT * FROM t"));
	assert!(h.probe.calls().is_empty());
	Ok(())
}
