// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Lifecycle of the process runtime: bring-up once, teardown once.

use std::path::Path;

use jdbc_fdw_bridge::{BridgeConfig, Runtime};
use jdbc_fdw_testing::MockLauncher;
use jdbc_fdw_type::{Error, Result};

#[test]
fn test_initialize_once() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let runtime = launcher.runtime();

	assert!(!runtime.is_initialized());
	let first = runtime.ensure_initialized(256, Some(Path::new("/opt/jdbc/h2.jar")))?;
	let second = runtime.ensure_initialized(1024, None)?;

	assert!(runtime.is_initialized());
	assert!(std::sync::Arc::ptr_eq(&first, &second));
	assert_eq!(probe.launches(), 1);
	assert_eq!(probe.launch_options()[0].max_heap_megabytes, 256);
	Ok(())
}

#[test]
fn test_launch_options_carry_bridge_config() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let config = BridgeConfig::new().helper_classpath("/opt/fdw/helper.jar").jvm_option("-Xss2m");
	let runtime = Runtime::new(launcher, config);

	runtime.ensure_initialized(0, None)?;

	let options = &probe.launch_options()[0];
	assert_eq!(options.max_heap_megabytes, 0);
	assert_eq!(
		options.runtime_arguments(),
		vec!["-Djava.class.path=/opt/fdw/helper.jar".to_string(), "-Xss2m".to_string()]
	);
	Ok(())
}

#[test]
fn test_failed_launch_is_not_retried() {
	let launcher = MockLauncher::new().fail_launch("libjvm.so: cannot open shared object file");
	let probe = launcher.probe();
	let runtime = launcher.runtime();

	let first = runtime.ensure_initialized(0, None).unwrap_err();
	let second = runtime.ensure_initialized(0, None).unwrap_err();

	assert!(matches!(first, Error::BridgeInit { ref reason } if reason.contains("libjvm.so")));
	assert!(matches!(second, Error::BridgeInit { .. }));
	assert_eq!(probe.launches(), 1);
	assert!(!runtime.is_initialized());
}

#[test]
fn test_teardown_is_idempotent() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let runtime = launcher.runtime();

	let bridge = runtime.ensure_initialized(0, None)?;
	runtime.teardown();
	runtime.teardown();

	assert_eq!(probe.destroyed(), 1);
	assert!(!bridge.is_alive());
	assert!(runtime.is_initialized());
	assert!(runtime.bridge().is_none());
	assert!(matches!(runtime.ensure_initialized(0, None), Err(Error::BridgeInit { .. })));
	Ok(())
}

#[test]
fn test_teardown_before_initialize_does_nothing() {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	let runtime = launcher.runtime();

	runtime.teardown();

	assert_eq!(probe.launches(), 0);
	assert_eq!(probe.destroyed(), 0);
}

#[test]
fn test_drop_tears_down() -> Result<()> {
	let launcher = MockLauncher::new();
	let probe = launcher.probe();
	{
		let runtime = launcher.runtime();
		runtime.ensure_initialized(0, None)?;
	}
	assert_eq!(probe.destroyed(), 1);
	Ok(())
}

#[test]
fn test_bridge_debug_shows_helper_and_liveness() -> Result<()> {
	let launcher = MockLauncher::new();
	let runtime = launcher.runtime();

	let bridge = runtime.ensure_initialized(0, None)?;
	let live = format!("{bridge:?}");
	runtime.teardown();
	let dead = format!("{bridge:?}");

	assert!(live.contains(bridge.helper_class()));
	assert!(live.contains("alive: true"));
	assert!(dead.contains("alive: false"));
	Ok(())
}
