// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Shared types for the JDBC foreign data wrapper.
//!
//! Everything that crosses crate boundaries lives here: the error taxonomy
//! with its diagnostics, the text-coercible column types and the rows a scan
//! hands back to the engine.

pub mod error;
pub mod row;
pub mod value;

pub use error::{ConfigurationError, Diagnostic, Error, IntoDiagnostic};
pub use row::{ColumnDef, Row, TupleDesc};
pub use value::{Type, Value};

pub type Result<T> = std::result::Result<T, Error>;
