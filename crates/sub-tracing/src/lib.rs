// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Installs the process-wide `tracing` subscriber.
//!
//! Library crates only emit events; the host decides once, through a
//! [`TracingBuilder`], where they go and at which level.

pub mod builder;
pub mod factory;

pub use builder::{LOG_ENV, LogFormat, TracingBuilder, TracingError};
pub use factory::{TracingConfigurator, TracingFactory};
