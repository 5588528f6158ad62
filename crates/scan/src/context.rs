// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use jdbc_fdw_bridge::{Bridge, Runtime};
use jdbc_fdw_config::{ConfigurationResolver, EffectiveConfig, OptionSource, TableId};
use jdbc_fdw_type::Result;

use crate::cancel::CancellationMonitor;

/// Process-scope collaborators shared by every scan: the managed runtime, the
/// cancellation monitor and the catalog that options are read from.
pub struct ScanContext {
	runtime: Arc<Runtime>,
	monitor: CancellationMonitor,
	catalog: Arc<dyn OptionSource>,
}

impl ScanContext {
	pub fn new(runtime: Arc<Runtime>, monitor: CancellationMonitor, catalog: Arc<dyn OptionSource>) -> Self {
		Self {
			runtime,
			monitor,
			catalog,
		}
	}

	pub fn runtime(&self) -> &Arc<Runtime> {
		&self.runtime
	}

	pub fn monitor(&self) -> &CancellationMonitor {
		&self.monitor
	}

	pub fn resolve(&self, table: TableId) -> Result<EffectiveConfig> {
		ConfigurationResolver::new(self.catalog.as_ref()).resolve(table)
	}

	/// Brings the runtime up with this scan's settings if nobody has yet, and
	/// arms the interrupt handler alongside it.
	pub fn ensure_runtime(&self, config: &EffectiveConfig) -> Result<Arc<Bridge>> {
		let archive = config.resolved_archive_path();
		let bridge = self.runtime.ensure_initialized(config.max_heap_megabytes, Some(&archive))?;
		self.monitor.arm();
		Ok(bridge)
	}
}
