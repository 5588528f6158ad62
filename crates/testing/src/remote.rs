// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

/// The result set a mock remote database returns for one connection URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteTable {
	pub columns: usize,
	pub rows: Vec<Vec<Option<String>>>,
	/// Returned by `initialize` instead of opening the result set.
	pub init_error: Option<String>,
	/// Raised as a managed exception by `fetchRow`.
	pub fetch_error: Option<String>,
	pub cancel_error: Option<String>,
	pub close_error: Option<String>,
}

impl RemoteTable {
	pub fn new(columns: usize) -> Self {
		Self {
			columns,
			..Self::default()
		}
	}

	/// Appends a row. The width is not checked against `columns`.
	pub fn row(mut self, values: &[Option<&str>]) -> Self {
		self.rows.push(values.iter().map(|v| v.map(str::to_string)).collect());
		self
	}

	pub fn text_rows(mut self, rows: &[&[&str]]) -> Self {
		for row in rows {
			self.rows.push(row.iter().map(|v| Some(v.to_string())).collect());
		}
		self
	}

	pub fn init_error(mut self, text: impl Into<String>) -> Self {
		self.init_error = Some(text.into());
		self
	}

	pub fn fetch_error(mut self, text: impl Into<String>) -> Self {
		self.fetch_error = Some(text.into());
		self
	}

	pub fn cancel_error(mut self, text: impl Into<String>) -> Self {
		self.cancel_error = Some(text.into());
		self
	}

	pub fn close_error(mut self, text: impl Into<String>) -> Self {
		self.close_error = Some(text.into());
		self
	}
}
