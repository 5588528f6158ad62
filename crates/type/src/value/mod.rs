// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Column type of a foreign table column as declared by the engine.
///
/// Remote values always arrive as text; the type only decides how that text
/// is read into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	Boolean,
	Int2,
	Int4,
	Int8,
	Float4,
	Float8,
	Utf8,
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("bool"),
			Type::Int2 => f.write_str("int2"),
			Type::Int4 => f.write_str("int4"),
			Type::Int8 => f.write_str("int8"),
			Type::Float4 => f.write_str("float4"),
			Type::Float8 => f.write_str("float8"),
			Type::Utf8 => f.write_str("text"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	Null,
	Boolean(bool),
	Int2(i16),
	Int4(i32),
	Int8(i64),
	Float4(f32),
	Float8(f64),
	Utf8(String),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(s) => Some(s.as_str()),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			Value::Boolean(true) => f.write_str("t"),
			Value::Boolean(false) => f.write_str("f"),
			Value::Int2(v) => Display::fmt(v, f),
			Value::Int4(v) => Display::fmt(v, f),
			Value::Int8(v) => Display::fmt(v, f),
			Value::Float4(v) => Display::fmt(v, f),
			Value::Float8(v) => Display::fmt(v, f),
			Value::Utf8(v) => f.write_str(v),
		}
	}
}

impl Type {
	/// Reads remote text as a value of this type. `None` is SQL NULL.
	pub fn parse(&self, text: Option<&str>) -> Result<Value> {
		let Some(text) = text else {
			return Ok(Value::Null);
		};

		match self {
			Type::Utf8 => Ok(Value::Utf8(text.to_string())),
			Type::Boolean => parse_bool(text).map(Value::Boolean).ok_or_else(|| invalid(self, text, "not a boolean")),
			Type::Int2 => text.trim().parse::<i16>().map(Value::Int2).map_err(|e| invalid(self, text, e)),
			Type::Int4 => text.trim().parse::<i32>().map(Value::Int4).map_err(|e| invalid(self, text, e)),
			Type::Int8 => text.trim().parse::<i64>().map(Value::Int8).map_err(|e| invalid(self, text, e)),
			Type::Float4 => text.trim().parse::<f32>().map(Value::Float4).map_err(|e| invalid(self, text, e)),
			Type::Float8 => text.trim().parse::<f64>().map(Value::Float8).map_err(|e| invalid(self, text, e)),
		}
	}
}

fn parse_bool(text: &str) -> Option<bool> {
	match text.trim().to_ascii_lowercase().as_str() {
		"t" | "true" | "y" | "yes" | "on" | "1" => Some(true),
		"f" | "false" | "n" | "no" | "off" | "0" => Some(false),
		_ => None,
	}
}

fn invalid(ty: &Type, text: &str, reason: impl ToString) -> Error {
	Error::conversion(format!("\"{}\" to {}", text, ty), reason)
}
