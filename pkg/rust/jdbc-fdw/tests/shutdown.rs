// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Shutdown in a process that never scanned. Kept in its own binary so no
//! other test creates the process runtime first.

use jdbc_fdw::bridge::current_runtime;

#[test]
fn test_shutdown_without_scans_creates_no_runtime() {
	assert!(current_runtime().is_none());

	jdbc_fdw::shutdown();
	jdbc_fdw::shutdown();

	assert!(current_runtime().is_none());
}
