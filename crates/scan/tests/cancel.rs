// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Interrupts observed at scan checkpoints

mod common;

use common::{TABLE, URL, catalog, harness, harness_watching, three_rows};
use jdbc_fdw_bridge::HelperMethod;
use jdbc_fdw_scan::{InterruptFlag, ScanSession};
use jdbc_fdw_testing::MockLauncher;
use jdbc_fdw_type::{Error, Result, TupleDesc};

#[test]
fn test_interrupt_before_iterate_cancels_remote_statement() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let mut scan = ScanSession::new(&h.context, TABLE);
	scan.begin()?;

	h.flag.raise();
	let err = scan.iterate(&TupleDesc::text(2)).unwrap_err();

	assert!(matches!(err, Error::QueryCancelled { cancel_error: None }));
	assert_eq!(h.probe.call_count(HelperMethod::Cancel), 1);
	assert_eq!(h.probe.call_count(HelperMethod::FetchRow), 0);
	assert!(!h.flag.is_raised());

	scan.end()?;
	assert_eq!(h.probe.call_count(HelperMethod::Cancel), 1);
	assert_eq!(h.probe.open_helpers(), 0);
	Ok(())
}

#[test]
fn test_interrupt_during_fetch_is_seen_at_next_row() -> Result<()> {
	let flag = InterruptFlag::new();
	let raised = flag.clone();
	let launcher = MockLauncher::new().with_table(URL, three_rows()).on_fetch(move |fetched| {
		if fetched == 1 {
			raised.raise();
		}
	});
	let h = harness_watching(launcher, catalog(), flag);
	let shape = TupleDesc::text(2);
	let mut scan = ScanSession::new(&h.context, TABLE);
	scan.begin()?;

	// the row in flight is still returned
	assert!(scan.iterate(&shape)?.is_some());
	assert!(h.flag.is_raised());

	let err = scan.iterate(&shape).unwrap_err();
	assert!(err.is_cancelled());
	assert_eq!(scan.rows_emitted(), 1);
	assert_eq!(h.probe.call_count(HelperMethod::FetchRow), 1);
	assert_eq!(h.probe.call_count(HelperMethod::Cancel), 1);
	scan.end()
}

#[test]
fn test_cancelled_scan_fetches_no_more_rows() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let shape = TupleDesc::text(2);
	let mut scan = ScanSession::new(&h.context, TABLE);
	scan.begin()?;

	h.flag.raise();
	assert!(scan.iterate(&shape).unwrap_err().is_cancelled());

	let err = scan.iterate(&shape).unwrap_err();
	assert!(matches!(err, Error::InvalidState { operation: "iterate", state: "aborted" }));
	assert!(matches!(scan.rescan(), Err(Error::InvalidState { operation: "rescan", .. })));
	assert!(matches!(scan.explain(), Err(Error::InvalidState { operation: "explain", .. })));
	assert_eq!(h.probe.call_count(HelperMethod::FetchRow), 0);
	assert_eq!(h.probe.call_count(HelperMethod::Cancel), 1);

	scan.end()?;
	assert_eq!(h.probe.call_count(HelperMethod::Close), 1);
	assert_eq!(h.probe.open_helpers(), 0);
	assert_eq!(h.probe.invalid_releases(), 0);
	Ok(())
}

#[test]
fn test_cancelled_rescan_stops_the_scan() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let mut scan = ScanSession::new(&h.context, TABLE);
	scan.begin()?;

	h.flag.raise();
	assert!(scan.rescan().unwrap_err().is_cancelled());
	assert_eq!(scan.state_name(), "aborted");
	assert!(scan.rescan().is_err());
	assert_eq!(h.probe.call_count(HelperMethod::Cancel), 1);

	scan.end()?;
	assert_eq!(h.probe.call_count(HelperMethod::Close), 1);
	Ok(())
}

#[test]
fn test_cancel_error_text_is_carried() -> Result<()> {
	let table = three_rows().cancel_error("java.sql.SQLFeatureNotSupportedException: cancel");
	let h = harness(MockLauncher::new().with_table(URL, table));
	let mut scan = ScanSession::new(&h.context, TABLE);
	scan.begin()?;

	h.flag.raise();
	let err = scan.rescan().unwrap_err();

	assert!(matches!(
		err,
		Error::QueryCancelled { cancel_error: Some(ref text) }
			if text == "java.sql.SQLFeatureNotSupportedException: cancel"
	));
	scan.end()
}

#[test]
fn test_interrupt_before_begin_opens_nothing() {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let mut scan = ScanSession::new(&h.context, TABLE);

	h.flag.raise();
	let err = scan.begin().unwrap_err();

	assert!(err.is_cancelled());
	assert_eq!(h.probe.launches(), 0);
	assert!(h.probe.calls().is_empty());
	assert!(!h.flag.is_raised());
}

#[test]
fn test_end_with_pending_interrupt_closes_then_cancels() {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let mut scan = ScanSession::new(&h.context, TABLE);
	scan.begin().unwrap();

	h.flag.raise();
	let err = scan.end().unwrap_err();

	assert!(err.is_cancelled());
	assert_eq!(h.probe.call_count(HelperMethod::Cancel), 1);
	assert_eq!(h.probe.call_count(HelperMethod::Close), 1);
	assert_eq!(h.probe.open_helpers(), 0);
	assert_eq!(scan.state_name(), "closed");
}

#[test]
fn test_flag_is_cleared_for_the_next_scan() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	let shape = TupleDesc::text(2);

	let mut first = ScanSession::new(&h.context, TABLE);
	first.begin()?;
	h.flag.raise();
	assert!(first.iterate(&shape).is_err());
	first.end()?;

	let mut second = ScanSession::new(&h.context, TABLE);
	second.begin()?;
	let mut rows = 0;
	while second.iterate(&shape)?.is_some() {
		rows += 1;
	}
	assert_eq!(rows, 3);
	second.end()
}

#[test]
fn test_runtime_bring_up_arms_monitor() -> Result<()> {
	let h = harness(MockLauncher::new().with_table(URL, three_rows()));
	assert!(!h.context.monitor().is_armed());

	let mut scan = ScanSession::new(&h.context, TABLE);
	scan.begin()?;
	assert!(h.context.monitor().is_armed());
	scan.end()
}
