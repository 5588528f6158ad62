// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Type, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
	pub name: String,
	pub ty: Type,
}

impl ColumnDef {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

/// Ordered column layout of the foreign table, owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TupleDesc {
	pub columns: Vec<ColumnDef>,
}

impl TupleDesc {
	pub fn new(columns: Vec<ColumnDef>) -> Self {
		Self {
			columns,
		}
	}

	/// A layout of `count` text columns named `c1..cN`.
	pub fn text(count: usize) -> Self {
		Self::new((1..=count).map(|i| ColumnDef::new(format!("c{}", i), Type::Utf8)).collect())
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	/// Builds a row from the per-column text values of one remote row.
	pub fn build_row<S: AsRef<str>>(&self, texts: &[Option<S>]) -> Result<Row> {
		if texts.len() != self.columns.len() {
			return Err(Error::conversion(
				"remote row",
				format!("expected {} columns, got {}", self.columns.len(), texts.len()),
			));
		}

		let values = self
			.columns
			.iter()
			.zip(texts)
			.map(|(column, text)| column.ty.parse(text.as_ref().map(AsRef::as_ref)))
			.collect::<Result<Vec<_>>>()?;

		Ok(Row {
			values,
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
	values: Vec<Value>,
}

impl Row {
	pub fn new(values: Vec<Value>) -> Self {
		Self {
			values,
		}
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn into_values(self) -> Vec<Value> {
		self.values
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_build_row_coerces_by_column() {
		let desc = TupleDesc::new(vec![ColumnDef::new("id", Type::Int4), ColumnDef::new("name", Type::Utf8)]);
		let row = desc.build_row(&[Some("7"), None]).unwrap();
		assert_eq!(row.values(), &[Value::Int4(7), Value::Null]);
	}

	#[test]
	fn test_build_row_rejects_width_mismatch() {
		let desc = TupleDesc::text(2);
		let err = desc.build_row(&[Some("only one")]).unwrap_err();
		assert!(matches!(err, Error::Conversion { .. }));
	}
}
