// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{num::NonZeroUsize, path::PathBuf};

use jdbc_fdw_type::Result;

/// A raw cross-boundary reference. Null references are `Option::None`.
///
/// Carries no lifetime; the safe wrappers in [`crate::reference`] own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawRef(NonZeroUsize);

impl RawRef {
	pub fn new(value: usize) -> Option<Self> {
		NonZeroUsize::new(value).map(RawRef)
	}

	pub fn from_ptr<T>(ptr: *mut T) -> Option<Self> {
		Self::new(ptr as usize)
	}

	pub fn get(&self) -> usize {
		self.0.get()
	}

	pub fn as_ptr<T>(&self) -> *mut T {
		self.0.get() as *mut T
	}
}

/// A class pinned for the lifetime of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub RawRef);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(pub NonZeroUsize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub NonZeroUsize);

/// Raw operations of an embedded managed runtime.
///
/// Implementations do not track ownership: a reference returned as a local
/// stays valid until [`Backend::delete_local`] or until the frame it was
/// created in is popped, a global one until [`Backend::delete_global`].
/// A managed-side exception surfaces as [`jdbc_fdw_type::Error::Bridge`].
pub trait Backend: Send + Sync {
	/// Resolves a class and pins it. `None` when the class does not exist.
	fn find_class(&self, name: &str) -> Result<Option<ClassId>>;

	fn method(&self, class: ClassId, name: &str, signature: &str) -> Result<Option<MethodId>>;

	fn field(&self, class: ClassId, name: &str, signature: &str) -> Result<Option<FieldId>>;

	/// Constructs an instance through a no-argument constructor.
	fn new_object(&self, class: ClassId, constructor: MethodId) -> Result<RawRef>;

	fn new_string(&self, value: &str) -> Result<RawRef>;

	fn new_string_array(&self, elements: &[RawRef]) -> Result<RawRef>;

	fn call_object_method(&self, target: RawRef, method: MethodId, args: &[RawRef]) -> Result<Option<RawRef>>;

	fn int_field(&self, target: RawRef, field: FieldId) -> Result<i32>;

	fn array_length(&self, array: RawRef) -> Result<usize>;

	fn array_element(&self, array: RawRef, index: usize) -> Result<Option<RawRef>>;

	/// Reads a string instance. Any other object is a conversion error.
	fn string_value(&self, string: RawRef) -> Result<String>;

	fn new_global(&self, local: RawRef) -> Result<RawRef>;

	fn delete_global(&self, global: RawRef);

	fn delete_local(&self, local: RawRef);

	fn push_frame(&self, capacity: usize) -> Result<()>;

	/// Pops the innermost frame, releasing every local created in it.
	fn pop_frame(&self);

	/// Shuts the runtime down. Called at most once.
	fn destroy(&self) -> Result<()>;
}

/// Settings that only the first bring-up of the runtime honours.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchOptions {
	/// Megabytes; `0` leaves the runtime default.
	pub max_heap_megabytes: u32,
	pub classpath: Vec<PathBuf>,
	pub extra_options: Vec<String>,
}

impl LaunchOptions {
	/// Command-line style options understood by the managed runtime.
	pub fn runtime_arguments(&self) -> Vec<String> {
		let mut arguments = Vec::with_capacity(2 + self.extra_options.len());

		if !self.classpath.is_empty() {
			let joined = self.classpath.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(":");
			arguments.push(format!("-Djava.class.path={}", joined));
		}
		if self.max_heap_megabytes > 0 {
			arguments.push(format!("-Xmx{}m", self.max_heap_megabytes));
		}
		arguments.extend(self.extra_options.iter().cloned());
		arguments
	}
}

/// Brings up a managed runtime and returns its backend.
pub trait RuntimeLauncher: Send + Sync {
	fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Backend>>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_raw_ref_rejects_null() {
		assert!(RawRef::new(0).is_none());
		assert!(RawRef::from_ptr(std::ptr::null_mut::<u8>()).is_none());
		assert_eq!(RawRef::new(42).map(|r| r.get()), Some(42));
	}

	#[test]
	fn test_runtime_arguments() {
		let options = LaunchOptions {
			max_heap_megabytes: 256,
			classpath: vec![PathBuf::from("/opt/fdw/classes"), PathBuf::from("/opt/fdw/helper.jar")],
			extra_options: vec!["-Xss2m".to_string()],
		};
		assert_eq!(
			options.runtime_arguments(),
			vec![
				"-Djava.class.path=/opt/fdw/classes:/opt/fdw/helper.jar".to_string(),
				"-Xmx256m".to_string(),
				"-Xss2m".to_string(),
			]
		);
	}

	#[test]
	fn test_runtime_arguments_defaults_are_empty() {
		assert!(LaunchOptions::default().runtime_arguments().is_empty());
	}
}
