// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Options of the foreign objects a JDBC scan reads from.
//!
//! Options live on three catalog objects: the foreign server (driver, URL,
//! archive, runtime sizing), the user mapping (credentials) and the foreign
//! table (remote query or remote table). [`validate_options`] checks one
//! object's list when it is defined; [`ConfigurationResolver`] merges the
//! three layers into an [`EffectiveConfig`] when a scan needs one.

pub mod catalog;
pub mod option;
pub mod resolve;
pub mod validate;

pub use catalog::{ForeignServerDef, ForeignTableDef, OptionSource, ServerId, TableId, UserId, UserMappingDef};
pub use option::{ObjectKind, OptionKey};
pub use resolve::{ConfigurationResolver, EffectiveConfig, RemoteSource};
pub use validate::validate_options;
