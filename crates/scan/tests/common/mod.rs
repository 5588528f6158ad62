// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use std::sync::Arc;

use jdbc_fdw_config::{ServerId, TableId};
use jdbc_fdw_scan::{CancellationMonitor, InterruptFlag, ScanContext};
use jdbc_fdw_testing::{MemoryCatalog, MockLauncher, MockProbe, RemoteTable};

pub const URL: &str = "jdbc:h2:mem:test";

pub const TABLE: TableId = TableId(1);

pub struct Harness {
	pub context: ScanContext,
	pub catalog: Arc<MemoryCatalog>,
	pub probe: MockProbe,
	pub flag: InterruptFlag,
}

pub fn catalog() -> MemoryCatalog {
	let catalog = MemoryCatalog::new();
	catalog
		.define_server(
			ServerId(1),
			"remote",
			&[("drivername", "org.h2.Driver"), ("url", URL), ("jarfile", "/opt/jdbc/h2.jar")],
		)
		.unwrap();
	catalog.define_table(TABLE, ServerId(1), &[("table", "t")]).unwrap();
	catalog
}

pub fn harness(launcher: MockLauncher) -> Harness {
	harness_with(launcher, catalog())
}

pub fn harness_with(launcher: MockLauncher, catalog: MemoryCatalog) -> Harness {
	harness_watching(launcher, catalog, InterruptFlag::new())
}

/// A harness whose monitor watches `flag`, for launchers that raise it.
pub fn harness_watching(launcher: MockLauncher, catalog: MemoryCatalog, flag: InterruptFlag) -> Harness {
	let catalog = Arc::new(catalog);
	let context =
		ScanContext::new(Arc::new(launcher.runtime()), CancellationMonitor::detached(flag.clone()), catalog.clone());
	Harness {
		context,
		catalog,
		probe: launcher.probe(),
		flag,
	}
}

pub fn three_rows() -> RemoteTable {
	RemoteTable::new(2).text_rows(&[&["1", "a"], &["2", "b"], &["3", "c"]])
}
