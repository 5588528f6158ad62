// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use jdbc_fdw_bridge::{Bridge, GlobalRef, HelperMethod, HelperType, LocalRef};
use jdbc_fdw_config::TableId;
use jdbc_fdw_type::{Error, Result, Row, TupleDesc};
use tracing::{debug, instrument, trace, warn};

use crate::{cancel::CancellationMonitor, context::ScanContext, explain::ExplainInfo, query};

/// Per-scan state of an open session.
struct ScanState {
	query_text: String,
	column_count: usize,
	rows_emitted: u64,
	exhausted: bool,
	explain: ExplainInfo,
	helper: HelperType,
	session: GlobalRef,
}

enum State {
	Unopened,
	Open(ScanState),
	/// A checkpoint or fetch failed. The remote session is still held until
	/// [`ScanSession::end`] closes it, and nothing else reaches the bridge.
	Aborted(ScanState),
	Explained,
	/// Begin failed; everything it acquired has been released.
	Failed,
	Closed,
}

impl State {
	fn name(&self) -> &'static str {
		match self {
			State::Unopened => "unopened",
			State::Open(_) => "open",
			State::Aborted(_) => "aborted",
			State::Explained => "explained",
			State::Failed => "failed",
			State::Closed => "closed",
		}
	}
}

/// One scan of one foreign table, from [`Self::begin`] to [`Self::end`].
///
/// Every transition first polls the cancellation monitor. Rows are fetched
/// one per [`Self::iterate`] call inside a local frame sized for the row, so
/// no reference outlives the call that created it.
pub struct ScanSession<'c> {
	context: &'c ScanContext,
	table: TableId,
	state: State,
}

impl<'c> ScanSession<'c> {
	pub fn new(context: &'c ScanContext, table: TableId) -> Self {
		Self {
			context,
			table,
			state: State::Unopened,
		}
	}

	pub fn table(&self) -> TableId {
		self.table
	}

	pub fn state_name(&self) -> &'static str {
		self.state.name()
	}

	pub fn is_open(&self) -> bool {
		matches!(self.state, State::Open(_))
	}

	/// Rows returned so far.
	pub fn rows_emitted(&self) -> u64 {
		self.scan().map_or(0, |scan| scan.rows_emitted)
	}

	pub fn column_count(&self) -> Option<usize> {
		self.scan().map(|scan| scan.column_count)
	}

	pub fn query_text(&self) -> Option<&str> {
		self.scan().map(|scan| scan.query_text.as_str())
	}

	fn scan(&self) -> Option<&ScanState> {
		match &self.state {
			State::Open(scan) | State::Aborted(scan) => Some(scan),
			_ => None,
		}
	}

	/// Opens the remote session.
	#[instrument(name = "scan::session::begin", level = "trace", skip(self), fields(table = %self.table))]
	pub fn begin(&mut self) -> Result<()> {
		if !matches!(self.state, State::Unopened) {
			return Err(self.invalid("begin"));
		}
		match self.open() {
			Ok(scan) => {
				self.state = State::Open(scan);
				Ok(())
			}
			Err(err) => {
				self.state = State::Failed;
				Err(err)
			}
		}
	}

	fn open(&self) -> Result<ScanState> {
		let monitor = self.context.monitor();
		monitor.poll()?;

		let config = self.context.resolve(self.table)?;
		let query_text = query::build(&config, false);
		let bridge = self.context.ensure_runtime(&config)?;

		monitor.poll()?;
		let helper = bridge.helper()?;
		let session = bridge.new_helper()?;

		let timeout = config.query_timeout_seconds.to_string();
		let archive = config.resolved_archive_path().display().to_string();
		let arguments: [&str; 7] = [
			&query_text,
			&config.driver_class_name,
			&config.connection_url,
			config.username_or_empty(),
			config.password_or_empty(),
			&timeout,
			&archive,
		];

		monitor.poll()?;
		if let Some(text) = initialize(&bridge, &helper, &session, &arguments)? {
			debug!(table = %self.table, "remote initialize failed");
			return Err(Error::RemoteInit(text));
		}

		let column_count = bridge.int_field(&session, helper.column_count)?;
		let column_count = usize::try_from(column_count)
			.map_err(|_| Error::conversion("column count", format!("negative value {}", column_count)))?;

		debug!(
			table = %self.table,
			driver = %config.driver_class_name,
			column_count,
			"remote session opened"
		);
		Ok(ScanState {
			query_text,
			column_count,
			rows_emitted: 0,
			exhausted: false,
			explain: ExplainInfo::from_config(&config),
			helper,
			session,
		})
	}

	/// The next row shaped by `shape`, or `None` once the remote result set is
	/// exhausted. Keeps returning `None` after that without remote calls.
	#[instrument(name = "scan::session::iterate", level = "trace", skip(self, shape))]
	pub fn iterate(&mut self, shape: &TupleDesc) -> Result<Option<Row>> {
		let monitor = self.context.monitor();
		let scan = match &mut self.state {
			State::Open(scan) => scan,
			other => {
				return Err(Error::InvalidState {
					operation: "iterate",
					state: other.name(),
				});
			}
		};

		let row = scan.next_row(monitor, shape);
		if row.is_err() {
			self.abort();
		}
		row
	}

	/// Polls for cancellation. The remote cursor and row counter are left as
	/// they are, so iteration resumes where it stopped.
	#[instrument(name = "scan::session::rescan", level = "trace", skip(self))]
	pub fn rescan(&mut self) -> Result<()> {
		let monitor = self.context.monitor();
		let checked = match &self.state {
			State::Open(scan) => scan.checkpoint(monitor),
			other => {
				return Err(Error::InvalidState {
					operation: "rescan",
					state: other.name(),
				});
			}
		};
		if checked.is_err() {
			self.abort();
		}
		checked
	}

	/// Describes the scan without opening a remote session. On an open scan
	/// the description of the running query is returned.
	#[instrument(name = "scan::session::explain", level = "trace", skip(self), fields(table = %self.table))]
	pub fn explain(&mut self) -> Result<ExplainInfo> {
		let monitor = self.context.monitor();
		if let State::Open(scan) = &self.state {
			let explained = scan.checkpoint(monitor).map(|()| scan.explain.clone());
			if explained.is_err() {
				self.abort();
			}
			return explained;
		}
		if !matches!(self.state, State::Unopened) {
			return Err(self.invalid("explain"));
		}

		monitor.poll()?;
		let config = self.context.resolve(self.table)?;
		self.state = State::Explained;
		Ok(ExplainInfo::from_config(&config))
	}

	/// Closes the remote session and releases its handle. Safe from every
	/// state and idempotent: only an open or aborted session makes remote
	/// calls.
	///
	/// A pending interrupt still fails with [`Error::QueryCancelled`], after
	/// the session has been closed and released.
	#[instrument(name = "scan::session::end", level = "trace", skip(self), fields(table = %self.table))]
	pub fn end(&mut self) -> Result<()> {
		match std::mem::replace(&mut self.state, State::Closed) {
			State::Open(scan) | State::Aborted(scan) => scan.close(self.context.monitor()),
			_ => Ok(()),
		}
	}

	/// Parks an open scan after a failed transition.
	fn abort(&mut self) {
		self.state = match std::mem::replace(&mut self.state, State::Closed) {
			State::Open(scan) => {
				debug!(table = %self.table, rows = scan.rows_emitted, "scan aborted");
				State::Aborted(scan)
			}
			other => other,
		};
	}

	fn invalid(&self, operation: &'static str) -> Error {
		Error::InvalidState {
			operation,
			state: self.state.name(),
		}
	}
}

impl Drop for ScanSession<'_> {
	fn drop(&mut self) {
		if self.scan().is_some() {
			if let Err(err) = self.end() {
				warn!(table = %self.table, error = %err, "closing abandoned scan failed");
			}
		}
	}
}

/// Passes the argument vector to the helper's initialize method. All argument
/// references live in one frame and are gone when this returns.
fn initialize(
	bridge: &Arc<Bridge>,
	helper: &HelperType,
	session: &GlobalRef,
	arguments: &[&str],
) -> Result<Option<String>> {
	let frame = bridge.frame(arguments.len() + 1)?;
	let strings = arguments.iter().map(|argument| frame.new_string(argument)).collect::<Result<Vec<_>>>()?;
	let elements: Vec<&LocalRef<'_>> = strings.iter().collect();
	let vector = frame.new_string_array(&elements)?;
	frame.call_for_error(session, helper.method(HelperMethod::Initialize), &[&vector])
}

impl ScanState {
	fn bridge(&self) -> &Arc<Bridge> {
		self.session.bridge()
	}

	fn checkpoint(&self, monitor: &CancellationMonitor) -> Result<()> {
		monitor.check(|| self.cancel())
	}

	fn next_row(&mut self, monitor: &CancellationMonitor, shape: &TupleDesc) -> Result<Option<Row>> {
		self.checkpoint(monitor)?;
		if self.exhausted {
			return Ok(None);
		}

		let Some(texts) = self.fetch()? else {
			self.exhausted = true;
			debug!(rows = self.rows_emitted, "remote result set exhausted");
			return Ok(None);
		};

		let row = shape.build_row(&texts)?;
		self.rows_emitted += 1;
		trace!(row = self.rows_emitted, "row fetched");
		Ok(Some(row))
	}

	fn cancel(&self) -> Result<Option<String>> {
		let frame = self.bridge().frame(1)?;
		frame.call_for_error(&self.session, self.helper.method(HelperMethod::Cancel), &[])
	}

	/// One row as text, or `None` at end of results.
	fn fetch(&self) -> Result<Option<Vec<Option<String>>>> {
		let frame = self.bridge().frame(self.column_count)?;
		let Some(array) = frame.call(&self.session, self.helper.method(HelperMethod::FetchRow), &[])? else {
			return Ok(None);
		};

		let width = frame.array_length(&array)?;
		if width != self.column_count {
			return Err(Error::conversion(
				"remote row",
				format!("expected {} columns, got {}", self.column_count, width),
			));
		}

		let mut texts = Vec::with_capacity(width);
		for index in 0..width {
			match frame.array_element(&array, index)? {
				Some(element) => {
					texts.push(Some(frame.string_value(&element)?));
					element.release();
				}
				None => texts.push(None),
			}
		}
		Ok(Some(texts))
	}

	fn close(self, monitor: &CancellationMonitor) -> Result<()> {
		let cancelled = self.checkpoint(monitor);

		let closed = match self.bridge().frame(1) {
			Ok(frame) => frame.call_for_error(&self.session, self.helper.method(HelperMethod::Close), &[]),
			Err(err) => Err(err),
		};

		debug!(rows = self.rows_emitted, "remote session closed");
		self.session.release();

		cancelled?;
		match closed? {
			Some(text) => Err(Error::RemoteClose(text)),
			None => Ok(()),
		}
	}
}
