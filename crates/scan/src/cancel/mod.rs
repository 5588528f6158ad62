// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Cooperative cancellation.
//!
//! An interrupt only raises an [`InterruptFlag`]. The scan polls it through
//! [`CancellationMonitor::check`] before every bridge call; a raised flag is
//! cleared, the remote statement is cancelled, and the scan fails with
//! [`Error::QueryCancelled`]. A remote call already in flight runs to
//! completion first.

mod signal;

use std::sync::{
	Arc, OnceLock,
	atomic::{AtomicBool, Ordering},
};

use jdbc_fdw_type::{Error, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
	pub fn new() -> Self {
		Self::default()
	}

	/// Async-signal-safe: a single atomic store.
	pub fn raise(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_raised(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}

	/// Clears the flag, returning whether it was raised.
	pub fn take(&self) -> bool {
		self.0.swap(false, Ordering::SeqCst)
	}
}

static PROCESS_FLAG: OnceLock<InterruptFlag> = OnceLock::new();

/// The flag raised by the process interrupt handler.
pub fn process_flag() -> InterruptFlag {
	PROCESS_FLAG.get_or_init(InterruptFlag::new).clone()
}

pub struct CancellationMonitor {
	flag: InterruptFlag,
	install_handler: bool,
	armed: AtomicBool,
}

impl CancellationMonitor {
	/// Watches the process flag; arming installs the interrupt handler.
	pub fn process() -> Self {
		Self {
			flag: process_flag(),
			install_handler: true,
			armed: AtomicBool::new(false),
		}
	}

	/// Watches a private flag that only the caller raises. Arming installs
	/// nothing.
	pub fn detached(flag: InterruptFlag) -> Self {
		Self {
			flag,
			install_handler: false,
			armed: AtomicBool::new(false),
		}
	}

	pub fn flag(&self) -> &InterruptFlag {
		&self.flag
	}

	pub fn is_armed(&self) -> bool {
		self.armed.load(Ordering::Acquire)
	}

	/// Installs the interrupt handler on first call.
	pub fn arm(&self) {
		if self.armed.swap(true, Ordering::AcqRel) {
			return;
		}
		if !self.install_handler {
			return;
		}
		match signal::install(self.flag.clone()) {
			Ok(()) => debug!("interrupt handler installed"),
			Err(err) => warn!(error = %err, "failed to install interrupt handler"),
		}
	}

	/// Fails with [`Error::QueryCancelled`] if an interrupt is pending.
	///
	/// `cancel` asks the remote side to cancel and returns its error text, if
	/// any; that text is logged and carried in the error. It is not called
	/// when no interrupt is pending.
	pub fn check<F>(&self, cancel: F) -> Result<()>
	where
		F: FnOnce() -> Result<Option<String>>,
	{
		if !self.flag.take() {
			return Ok(());
		}

		let cancel_error = match cancel() {
			Ok(None) => None,
			Ok(Some(text)) => {
				warn!(error = %text, "remote cancel reported an error");
				Some(text)
			}
			Err(err) => {
				warn!(error = %err, "remote cancel failed");
				Some(err.to_string())
			}
		};

		debug!("statement cancelled by interrupt");
		Err(Error::QueryCancelled {
			cancel_error,
		})
	}

	/// [`Self::check`] for points where no remote session exists yet.
	pub fn poll(&self) -> Result<()> {
		self.check(|| Ok(None))
	}
}
