// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Reference ownership: every local and global is released exactly once.

use jdbc_fdw_bridge::HelperMethod;
use jdbc_fdw_testing::{MockLauncher, RemoteTable};
use jdbc_fdw_type::{Error, Result};

const URL: &str = "jdbc:h2:mem:test";

fn init_args(url: &str) -> [&str; 7] {
	["SELECT * FROM t", "org.h2.Driver", url, "", "", "0", "/opt/jdbc/h2.jar"]
}

#[test]
fn test_frame_releases_locals() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;

	{
		let frame = bridge.frame(2)?;
		let first = frame.new_string("a")?;
		let _second = frame.new_string("b")?;
		first.release();
		assert_eq!(probe.outstanding_locals(), 1);
		assert_eq!(probe.frame_depth(), 1);
	}

	assert_eq!(probe.outstanding_locals(), 0);
	assert_eq!(probe.frame_depth(), 0);
	assert_eq!(probe.max_frame_capacity(), 2 + bridge_headroom());
	assert_eq!(probe.invalid_releases(), 0);
	Ok(())
}

fn bridge_headroom() -> usize {
	jdbc_fdw_bridge::BridgeConfig::default().frame_headroom
}

#[test]
fn test_helper_global_released_once() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;

	let helper = bridge.new_helper()?;
	assert_eq!(probe.open_helpers(), 1);
	assert_eq!(probe.outstanding_locals(), 0);

	helper.release();
	assert_eq!(probe.open_helpers(), 0);
	assert_eq!(probe.invalid_releases(), 0);
	Ok(())
}

#[test]
fn test_helper_global_released_on_drop() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;

	drop(bridge.new_helper()?);

	assert_eq!(probe.open_helpers(), 0);
	assert_eq!(probe.invalid_releases(), 0);
	Ok(())
}

#[test]
fn test_initialize_and_fetch_through_frames() -> Result<()> {
	let launcher = MockLauncher::new().with_table(URL, RemoteTable::new(2).row(&[Some("1"), None]));
	let probe = launcher.probe();
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;
	let helper = bridge.new_helper()?;
	let binding = bridge.helper()?;

	{
		let frame = bridge.frame(7)?;
		let mut args = Vec::new();
		for arg in init_args(URL) {
			args.push(frame.new_string(arg)?);
		}
		let arg_refs: Vec<_> = args.iter().collect();
		let array = frame.new_string_array(&arg_refs)?;
		let error = frame.call_for_error(&helper, binding.method(HelperMethod::Initialize), &[&array])?;
		assert_eq!(error, None);
	}
	assert_eq!(bridge.int_field(&helper, binding.column_count)?, 2);

	{
		let frame = bridge.frame(2)?;
		let row = frame.call(&helper, binding.method(HelperMethod::FetchRow), &[])?.expect("one row");
		assert_eq!(frame.array_length(&row)?, 2);
		let first = frame.array_element(&row, 0)?.expect("non-null");
		assert_eq!(frame.string_value(&first)?, "1");
		assert!(frame.array_element(&row, 1)?.is_none());
	}
	assert_eq!(probe.outstanding_locals(), 0);

	{
		let frame = bridge.frame(2)?;
		assert!(frame.call(&helper, binding.method(HelperMethod::FetchRow), &[])?.is_none());
	}

	assert_eq!(probe.initialize_args(), vec![init_args(URL).map(str::to_string).to_vec()]);
	Ok(())
}

#[test]
fn test_initialize_returns_error_text() -> Result<()> {
	let launcher = MockLauncher::new();
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;
	let helper = bridge.new_helper()?;
	let binding = bridge.helper()?;

	let frame = bridge.frame(7)?;
	let mut args = Vec::new();
	for arg in init_args("jdbc:unknown:db") {
		args.push(frame.new_string(arg)?);
	}
	let arg_refs: Vec<_> = args.iter().collect();
	let array = frame.new_string_array(&arg_refs)?;
	let error = frame.call_for_error(&helper, binding.method(HelperMethod::Initialize), &[&array])?;

	assert_eq!(error.as_deref(), Some("java.sql.SQLException: No suitable driver found for jdbc:unknown:db"));
	Ok(())
}

#[test]
fn test_missing_method_is_binding_error() -> Result<()> {
	let launcher = MockLauncher::new().without_member("fetchRow");
	let probe = launcher.probe();
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;

	let err = bridge.helper().unwrap_err();
	assert!(matches!(
		err,
		Error::BridgeBinding { member_kind: "method", ref member, .. } if member == "fetchRow"
	));
	assert_eq!(probe.outstanding_globals(), 0);
	Ok(())
}

#[test]
fn test_missing_class_is_binding_error() -> Result<()> {
	let launcher = MockLauncher::new().without_member("JdbcScanHelper");
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;

	assert!(matches!(bridge.new_helper().unwrap_err(), Error::BridgeBinding { member_kind: "class", .. }));
	Ok(())
}

#[test]
fn test_release_after_teardown_is_skipped() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let runtime = launcher.runtime();
	let bridge = runtime.ensure_initialized(0, None)?;
	let helper = bridge.new_helper()?;

	runtime.teardown();
	helper.release();

	assert_eq!(probe.invalid_releases(), 0);
	assert!(matches!(bridge.frame(1), Err(Error::Bridge { .. })));
	Ok(())
}
