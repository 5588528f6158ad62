// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use jdbc_fdw_sub_tracing::{LogFormat, TracingError, TracingFactory};

#[test]
fn test_configurator_is_applied() {
	let builder = TracingFactory::with_configurator(|b| b.with_level("debug").with_format(LogFormat::Json)).builder();
	assert_eq!(builder.directives(), "debug");
	assert_eq!(builder.format(), LogFormat::Json);
}

#[test]
fn test_second_install_fails() {
	TracingFactory::with_configurator(|b| b.with_env(false).with_level("warn")).init().unwrap();

	let err = TracingFactory::new().init().unwrap_err();
	assert!(matches!(err, TracingError::Install(_)));
}
