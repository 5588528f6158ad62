// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Bridge to the embedded managed runtime that hosts the JDBC driver.
//!
//! The runtime exists at most once per process ([`Runtime`]). Native code talks
//! to it through a [`Backend`], which deals in raw references; the safe layer
//! on top ([`Bridge`], [`LocalFrame`], [`LocalRef`], [`GlobalRef`]) guarantees
//! that every reference it hands out is released exactly once, on every exit
//! path.
//!
//! The production backend is the JVM loaded through JNI ([`jvm`]); tests plug
//! in their own backend through [`RuntimeLauncher`].

pub mod backend;
pub mod bridge;
pub mod config;
pub mod jvm;
pub mod reference;
pub mod runtime;

pub use backend::{Backend, ClassId, FieldId, LaunchOptions, MethodId, RawRef, RuntimeLauncher};
pub use bridge::{Bridge, HelperMethod, HelperType};
pub use config::BridgeConfig;
pub use reference::{GlobalRef, LocalFrame, LocalRef};
pub use runtime::{Runtime, current as current_runtime, process_runtime};
