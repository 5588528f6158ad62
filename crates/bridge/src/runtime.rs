// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{
	path::Path,
	sync::{
		Arc, OnceLock,
		atomic::{AtomicBool, Ordering},
	},
};

use jdbc_fdw_type::{Error, Result};
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::{
	backend::{LaunchOptions, RuntimeLauncher},
	bridge::Bridge,
	config::BridgeConfig,
	jvm::JvmLauncher,
};

enum State {
	Uninitialized,
	Running {
		bridge: Arc<Bridge>,
		max_heap_megabytes: u32,
	},
	/// Bring-up failed. The runtime cannot be created twice in one process,
	/// so the failure is remembered instead of retried.
	Failed(String),
	TornDown,
}

impl State {
	fn name(&self) -> &'static str {
		match self {
			State::Uninitialized => "uninitialized",
			State::Running {
				..
			} => "running",
			State::Failed(_) => "failed",
			State::TornDown => "torn down",
		}
	}
}

/// The embedded managed runtime of this process.
///
/// Brought up lazily by the first scan; later callers reuse it and their
/// heap settings are ignored. Torn down once, at process exit or on drop.
pub struct Runtime {
	launcher: Box<dyn RuntimeLauncher>,
	config: BridgeConfig,
	state: Mutex<State>,
	initialized: AtomicBool,
}

impl Runtime {
	pub fn new(launcher: impl RuntimeLauncher + 'static, config: BridgeConfig) -> Self {
		Self {
			launcher: Box::new(launcher),
			config,
			state: Mutex::new(State::Uninitialized),
			initialized: AtomicBool::new(false),
		}
	}

	pub fn config(&self) -> &BridgeConfig {
		&self.config
	}

	/// Brings the runtime up if this is the first call and returns the bridge.
	///
	/// `archive` is the driver archive of the calling scan. It is not put on
	/// the runtime classpath; the helper loads it through its own class loader.
	#[instrument(name = "runtime::ensure_initialized", level = "trace", skip(self, archive))]
	pub fn ensure_initialized(&self, max_heap_megabytes: u32, archive: Option<&Path>) -> Result<Arc<Bridge>> {
		let mut state = self.state.lock();
		match &*state {
			State::Running {
				bridge,
				max_heap_megabytes: first,
			} => {
				if *first != max_heap_megabytes {
					debug!(
						requested = max_heap_megabytes,
						in_effect = *first,
						"runtime already running, ignoring heap size"
					);
				}
				return Ok(Arc::clone(bridge));
			}
			State::Failed(reason) => {
				return Err(Error::BridgeInit {
					reason: reason.clone(),
				});
			}
			State::TornDown => {
				return Err(Error::BridgeInit {
					reason: "managed runtime has been torn down".to_string(),
				});
			}
			State::Uninitialized => {}
		}

		let options = LaunchOptions {
			max_heap_megabytes,
			classpath: self.config.helper_classpath.clone(),
			extra_options: self.config.jvm_options.clone(),
		};
		debug!(max_heap_megabytes, archive = ?archive, "starting managed runtime");

		match self.launcher.launch(&options) {
			Ok(backend) => {
				let bridge = Arc::new(Bridge::new(backend, &self.config));
				*state = State::Running {
					bridge: Arc::clone(&bridge),
					max_heap_megabytes,
				};
				self.initialized.store(true, Ordering::Release);
				Ok(bridge)
			}
			Err(err) => {
				let reason = match &err {
					Error::BridgeInit {
						reason,
					} => reason.clone(),
					other => other.to_string(),
				};
				warn!(%reason, "managed runtime failed to start");
				*state = State::Failed(reason.clone());
				Err(Error::BridgeInit {
					reason,
				})
			}
		}
	}

	/// True once the runtime has been brought up, and stays true after
	/// teardown.
	pub fn is_initialized(&self) -> bool {
		self.initialized.load(Ordering::Acquire)
	}

	/// The running bridge, if any.
	pub fn bridge(&self) -> Option<Arc<Bridge>> {
		match &*self.state.lock() {
			State::Running {
				bridge,
				..
			} => Some(Arc::clone(bridge)),
			_ => None,
		}
	}

	pub fn state_name(&self) -> &'static str {
		self.state.lock().name()
	}

	/// Destroys the runtime if it is running. Safe to call any number of
	/// times; later calls do nothing.
	#[instrument(name = "runtime::teardown", level = "debug", skip(self))]
	pub fn teardown(&self) {
		let previous = std::mem::replace(&mut *self.state.lock(), State::TornDown);
		if let State::Running {
			bridge,
			..
		} = previous
		{
			if let Err(err) = bridge.shutdown() {
				warn!(error = %err, "managed runtime did not shut down cleanly");
			}
		}
	}
}

impl Drop for Runtime {
	fn drop(&mut self) {
		self.teardown();
	}
}

static PROCESS: OnceLock<Arc<Runtime>> = OnceLock::new();

/// The runtime shared by every scan of this process, backed by the JVM.
///
/// The first call fixes the configuration; `config` is not evaluated on later
/// calls. Teardown is registered to run at process exit.
pub fn process_runtime(config: impl FnOnce() -> BridgeConfig) -> Arc<Runtime> {
	let runtime = PROCESS.get_or_init(|| {
		let config = config();
		register_exit_hook();
		Arc::new(Runtime::new(JvmLauncher::new(config.clone()), config))
	});
	Arc::clone(runtime)
}

/// The process runtime if [`process_runtime`] has created it.
pub fn current() -> Option<Arc<Runtime>> {
	PROCESS.get().map(Arc::clone)
}

extern "C" fn teardown_process_runtime() {
	if let Some(runtime) = PROCESS.get() {
		runtime.teardown();
	}
}

fn register_exit_hook() {
	// SAFETY: registers a plain function with no captured state.
	let status = unsafe { libc::atexit(teardown_process_runtime) };
	if status != 0 {
		warn!(status, "failed to register runtime teardown at exit");
	}
}
