// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{
	io,
	sync::{
		OnceLock,
		atomic::{AtomicUsize, Ordering},
	},
};

use libc::c_int;

use super::InterruptFlag;

static FLAG: OnceLock<InterruptFlag> = OnceLock::new();
static PREVIOUS: AtomicUsize = AtomicUsize::new(libc::SIG_DFL);
static INSTALLED: OnceLock<io::Result<()>> = OnceLock::new();

/// Runs in signal context: an atomic store and a call to the handler that was
/// installed before ours. Nothing else.
extern "C" fn on_interrupt(signum: c_int) {
	if let Some(flag) = FLAG.get() {
		flag.raise();
	}

	let previous = PREVIOUS.load(Ordering::SeqCst);
	if previous != libc::SIG_DFL && previous != libc::SIG_IGN {
		// SAFETY: `previous` was read from sigaction without SA_SIGINFO, so
		// it is a one-argument handler.
		let handler: extern "C" fn(c_int) = unsafe { std::mem::transmute(previous) };
		handler(signum);
	}
}

/// Installs the SIGINT handler once per process. Later calls return the
/// outcome of the first.
pub(super) fn install(flag: InterruptFlag) -> io::Result<()> {
	let outcome = INSTALLED.get_or_init(|| {
		let _ = FLAG.set(flag);

		// SAFETY: both sigaction structs are zero-initialised C structs and
		// the handler only touches atomics.
		unsafe {
			let mut action: libc::sigaction = std::mem::zeroed();
			action.sa_sigaction = on_interrupt as extern "C" fn(c_int) as libc::sighandler_t;
			action.sa_flags = libc::SA_RESTART;
			libc::sigemptyset(&mut action.sa_mask);

			let mut previous: libc::sigaction = std::mem::zeroed();
			if libc::sigaction(libc::SIGINT, &action, &mut previous) != 0 {
				return Err(io::Error::last_os_error());
			}
			if previous.sa_flags & libc::SA_SIGINFO == 0 {
				PREVIOUS.store(previous.sa_sigaction, Ordering::SeqCst);
			}
		}
		Ok(())
	});

	match outcome {
		Ok(()) => Ok(()),
		Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
	}
}
