// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CString, c_char, c_void},
	path::{Path, PathBuf},
	ptr,
};

use jdbc_fdw_type::{Error, Result};
use jni::{JavaVM, sys};
use libloading::Library;
use tracing::{debug, instrument};

use crate::{
	backend::{Backend, LaunchOptions, RuntimeLauncher},
	config::BridgeConfig,
	jvm::backend::JvmBackend,
};

const CREATE_JAVA_VM: &[u8] = b"JNI_CreateJavaVM\0";

type CreateJavaVm = unsafe extern "system" fn(*mut *mut sys::JavaVM, *mut *mut c_void, *mut c_void) -> sys::jint;

#[cfg(target_os = "macos")]
const JVM_LIBRARY: &str = "libjvm.dylib";
#[cfg(not(target_os = "macos"))]
const JVM_LIBRARY: &str = "libjvm.so";

const JAVA_HOME_CANDIDATES: &[&str] = &["lib/server", "jre/lib/server", "jre/lib/amd64/server", "lib/amd64/server"];

/// Finds the JVM shared library: the configured path, else under
/// `JAVA_HOME`, else the bare library name for the system loader to resolve.
pub fn locate_jvm_library(config: &BridgeConfig) -> PathBuf {
	if let Some(path) = &config.jvm_library {
		return path.clone();
	}
	if let Some(home) = std::env::var_os("JAVA_HOME") {
		let home = Path::new(&home);
		for candidate in JAVA_HOME_CANDIDATES {
			let path = home.join(candidate).join(JVM_LIBRARY);
			if path.is_file() {
				return path;
			}
		}
	}
	PathBuf::from(JVM_LIBRARY)
}

/// Loads the JVM library and creates the process JVM.
pub struct JvmLauncher {
	config: BridgeConfig,
}

impl JvmLauncher {
	pub fn new(config: BridgeConfig) -> Self {
		Self {
			config,
		}
	}
}

impl RuntimeLauncher for JvmLauncher {
	#[instrument(name = "jvm::launch", level = "debug", skip(self, options))]
	fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Backend>> {
		let path = locate_jvm_library(&self.config);
		let init = |reason: String| Error::BridgeInit {
			reason,
		};

		// SAFETY: loading libjvm runs its initialisers, which have no
		// preconditions on our side.
		let library = unsafe { Library::new(&path) }
			.map_err(|err| init(format!("cannot load {}: {}", path.display(), err)))?;

		// SAFETY: the symbol has the JNI invocation API signature.
		let create: CreateJavaVm = unsafe {
			*library.get::<CreateJavaVm>(CREATE_JAVA_VM)
				.map_err(|err| init(format!("{} exports no JNI_CreateJavaVM: {}", path.display(), err)))?
		};

		let arguments = options
			.runtime_arguments()
			.into_iter()
			.map(|arg| CString::new(arg).map_err(|err| init(format!("invalid runtime option: {}", err))))
			.collect::<Result<Vec<_>>>()?;

		let mut vm_options: Vec<sys::JavaVMOption> = arguments
			.iter()
			.map(|arg| sys::JavaVMOption {
				optionString: arg.as_ptr() as *mut c_char,
				extraInfo: ptr::null_mut(),
			})
			.collect();

		let mut init_args = sys::JavaVMInitArgs {
			version: sys::JNI_VERSION_1_8,
			nOptions: vm_options.len() as sys::jint,
			options: vm_options.as_mut_ptr(),
			ignoreUnrecognized: sys::JNI_TRUE,
		};

		let mut vm: *mut sys::JavaVM = ptr::null_mut();
		let mut env: *mut c_void = ptr::null_mut();

		// SAFETY: the option strings and array outlive the call, and the out
		// pointers are valid for writes.
		let status = unsafe { create(&mut vm, &mut env, &mut init_args as *mut sys::JavaVMInitArgs as *mut c_void) };
		if status != sys::JNI_OK || vm.is_null() {
			return Err(init(format!("JNI_CreateJavaVM returned {}", status)));
		}

		// SAFETY: vm was just created and is not shared yet.
		let vm = unsafe { JavaVM::from_raw(vm) }.map_err(|err| init(err.to_string()))?;

		debug!(library = %path.display(), arguments = ?options.runtime_arguments(), "JVM created");
		Ok(Box::new(JvmBackend::new(vm, library)))
	}
}
