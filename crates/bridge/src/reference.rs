// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

//! Owned references into the managed runtime.
//!
//! A [`LocalRef`] borrows the [`LocalFrame`] it was created in, so the borrow
//! checker rejects any use after the frame is popped. A [`GlobalRef`] survives
//! across calls and is deleted exactly once, either through
//! [`GlobalRef::release`] or on drop.

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
};

use jdbc_fdw_type::Result;
use tracing::trace;

use crate::{
	backend::{ClassId, MethodId, RawRef},
	bridge::Bridge,
};

pub struct LocalRef<'f> {
	bridge: &'f Bridge,
	raw: RawRef,
	live: bool,
}

impl<'f> LocalRef<'f> {
	pub(crate) fn new(bridge: &'f Bridge, raw: RawRef) -> Self {
		Self {
			bridge,
			raw,
			live: true,
		}
	}

	pub fn raw(&self) -> RawRef {
		self.raw
	}

	/// Deletes the reference now instead of at frame exit.
	pub fn release(mut self) {
		self.delete();
	}

	fn delete(&mut self) {
		if std::mem::replace(&mut self.live, false) && self.bridge.is_alive() {
			self.bridge.raw_backend().delete_local(self.raw);
		}
	}
}

impl Drop for LocalRef<'_> {
	fn drop(&mut self) {
		self.delete();
	}
}

impl Debug for LocalRef<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LocalRef").field("raw", &self.raw).field("live", &self.live).finish()
	}
}

pub struct GlobalRef {
	bridge: Arc<Bridge>,
	raw: RawRef,
	live: bool,
}

impl GlobalRef {
	pub(crate) fn new(bridge: Arc<Bridge>, raw: RawRef) -> Self {
		Self {
			bridge,
			raw,
			live: true,
		}
	}

	pub fn raw(&self) -> RawRef {
		self.raw
	}

	pub fn bridge(&self) -> &Arc<Bridge> {
		&self.bridge
	}

	pub fn release(mut self) {
		self.delete();
	}

	fn delete(&mut self) {
		if !std::mem::replace(&mut self.live, false) {
			return;
		}
		if self.bridge.is_alive() {
			self.bridge.raw_backend().delete_global(self.raw);
		} else {
			trace!(raw = self.raw.get(), "runtime already torn down, dropping global reference");
		}
	}
}

impl Drop for GlobalRef {
	fn drop(&mut self) {
		self.delete();
	}
}

impl Debug for GlobalRef {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GlobalRef").field("raw", &self.raw).field("live", &self.live).finish()
	}
}

/// A bounded scope for local references. Pushed on creation, popped on drop,
/// which releases every local created through it that is still live.
pub struct LocalFrame<'b> {
	bridge: &'b Bridge,
}

impl<'b> LocalFrame<'b> {
	pub(crate) fn push(bridge: &'b Bridge, capacity: usize) -> Result<Self> {
		bridge.backend("push_frame")?.push_frame(capacity)?;
		Ok(Self {
			bridge,
		})
	}

	pub fn bridge(&self) -> &'b Bridge {
		self.bridge
	}

	pub fn new_string(&self, value: &str) -> Result<LocalRef<'_>> {
		let raw = self.bridge.backend("new_string")?.new_string(value)?;
		Ok(LocalRef::new(self.bridge, raw))
	}

	pub fn new_string_array(&self, elements: &[&LocalRef<'_>]) -> Result<LocalRef<'_>> {
		let raws: Vec<RawRef> = elements.iter().map(|e| e.raw()).collect();
		let raw = self.bridge.backend("new_string_array")?.new_string_array(&raws)?;
		Ok(LocalRef::new(self.bridge, raw))
	}

	pub fn new_object(&self, class: ClassId, constructor: MethodId) -> Result<LocalRef<'_>> {
		let raw = self.bridge.backend("new_object")?.new_object(class, constructor)?;
		Ok(LocalRef::new(self.bridge, raw))
	}

	/// Invokes an object-returning method. A null result is `None`.
	pub fn call(&self, target: &GlobalRef, method: MethodId, args: &[&LocalRef<'_>]) -> Result<Option<LocalRef<'_>>> {
		let raws: Vec<RawRef> = args.iter().map(|a| a.raw()).collect();
		let result = self.bridge.backend("call")?.call_object_method(target.raw(), method, &raws)?;
		Ok(result.map(|raw| LocalRef::new(self.bridge, raw)))
	}

	/// Invokes a method following the helper convention of returning `null`
	/// on success and the error text otherwise.
	pub fn call_for_error(&self, target: &GlobalRef, method: MethodId, args: &[&LocalRef<'_>]) -> Result<Option<String>> {
		match self.call(target, method, args)? {
			None => Ok(None),
			Some(text) => {
				let message = self.string_value(&text)?;
				text.release();
				Ok(Some(message))
			}
		}
	}

	pub fn array_length(&self, array: &LocalRef<'_>) -> Result<usize> {
		self.bridge.backend("array_length")?.array_length(array.raw())
	}

	pub fn array_element(&self, array: &LocalRef<'_>, index: usize) -> Result<Option<LocalRef<'_>>> {
		let element = self.bridge.backend("array_element")?.array_element(array.raw(), index)?;
		Ok(element.map(|raw| LocalRef::new(self.bridge, raw)))
	}

	pub fn string_value(&self, string: &LocalRef<'_>) -> Result<String> {
		self.bridge.backend("string_value")?.string_value(string.raw())
	}
}

impl Drop for LocalFrame<'_> {
	fn drop(&mut self) {
		if self.bridge.is_alive() {
			self.bridge.raw_backend().pop_frame();
		}
	}
}
