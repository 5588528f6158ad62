// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Test doubles for the scan core.
//!
//! [`MockLauncher`] stands in for the JVM: it serves [`RemoteTable`]s keyed by
//! connection URL and accounts for every reference, frame and helper call so
//! tests can assert on them through [`MockProbe`]. [`MemoryCatalog`] stands in
//! for the host catalog.

pub mod catalog;
pub mod remote;
pub mod runtime;

pub use catalog::MemoryCatalog;
pub use remote::RemoteTable;
pub use runtime::{MockBackend, MockLauncher, MockProbe};
