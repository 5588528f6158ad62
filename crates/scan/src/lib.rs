// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Scan side of the JDBC foreign data wrapper.
//!
//! A [`ScanSession`] drives one foreign table scan from begin to end over the
//! runtime bridge. The planner adapters estimate cost without opening a
//! remote session, and the [`CancellationMonitor`] turns an interrupt into a
//! remote cancel at the next bridge call.

pub mod cancel;
pub mod context;
pub mod explain;
pub mod planner;
pub mod query;
pub mod routine;
pub mod session;

pub use cancel::{CancellationMonitor, InterruptFlag};
pub use context::ScanContext;
pub use explain::ExplainInfo;
pub use planner::{AccessPath, CostEstimate, ScanPlan};
pub use routine::{ForeignScanRoutine, JdbcFdw};
pub use session::ScanSession;
