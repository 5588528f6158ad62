// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use jdbc_fdw_bridge::{BridgeConfig, current_runtime, process_runtime};
use jdbc_fdw_config::OptionSource;
use jdbc_fdw_scan::{CancellationMonitor, JdbcFdw, ScanContext};
use jdbc_fdw_sub_tracing::{TracingBuilder, TracingError};
use tracing::debug;

/// The context every scan in this process shares: the process runtime,
/// configured from the environment on first use, and a monitor watching the
/// process interrupt flag.
pub fn process_context(catalog: Arc<dyn OptionSource>) -> ScanContext {
	let runtime = process_runtime(BridgeConfig::from_env);
	ScanContext::new(runtime, CancellationMonitor::process(), catalog)
}

pub fn process_fdw(catalog: Arc<dyn OptionSource>) -> JdbcFdw {
	JdbcFdw::new(process_context(catalog))
}

/// Installs the process subscriber unless the host already has one.
pub fn init_logging(configure: impl FnOnce(TracingBuilder) -> TracingBuilder) -> Result<(), TracingError> {
	match configure(TracingBuilder::new()).try_init() {
		Err(TracingError::Install(reason)) => {
			debug!(%reason, "tracing subscriber already installed");
			Ok(())
		}
		other => other,
	}
}

/// Destroys the process runtime ahead of exit. Scans started afterwards fail.
/// Does nothing if no scan has created the runtime.
pub fn shutdown() {
	if let Some(runtime) = current_runtime() {
		runtime.teardown();
	}
}
