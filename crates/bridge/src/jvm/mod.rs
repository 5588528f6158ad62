// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! The JVM as managed runtime, driven through JNI.

mod backend;
mod launcher;

pub use backend::JvmBackend;
pub use launcher::{JvmLauncher, locate_jvm_library};
