// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Foreign data wrapper that reads remote tables through JDBC.
//!
//! The host engine builds one [`ScanContext`] per process with
//! [`process_context`] and drives scans through [`JdbcFdw`], which implements
//! the [`ForeignScanRoutine`] callbacks.

mod process;

pub use jdbc_fdw_bridge as bridge;
pub use jdbc_fdw_config as config;
pub use jdbc_fdw_scan as scan;
pub use jdbc_fdw_sub_tracing as logging;
pub use jdbc_fdw_type as types;
pub use jdbc_fdw_type::{ConfigurationError, Diagnostic, Error, IntoDiagnostic, Result};

pub use jdbc_fdw_config::{ObjectKind, OptionSource, ServerId, TableId, UserId, validate_options};
pub use jdbc_fdw_scan::{
	CancellationMonitor, CostEstimate, ExplainInfo, ForeignScanRoutine, InterruptFlag, JdbcFdw, ScanContext,
	ScanSession,
};
pub use jdbc_fdw_type::{ColumnDef, Row, TupleDesc, Type, Value};

pub use process::{init_logging, process_context, process_fdw, shutdown};
