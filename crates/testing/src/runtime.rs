// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{
	collections::{HashMap, HashSet},
	num::NonZeroUsize,
	sync::Arc,
};

use jdbc_fdw_bridge::{
	Backend, BridgeConfig, ClassId, FieldId, HelperMethod, LaunchOptions, MethodId, RawRef, Runtime, RuntimeLauncher,
	bridge::{COLUMN_COUNT_FIELD, COLUMN_COUNT_SIGNATURE},
};
use jdbc_fdw_type::{Error, Result};
use parking_lot::Mutex;

use crate::remote::RemoteTable;

/// Called after each row is fetched with the number of rows fetched so far.
pub type FetchHook = Arc<dyn Fn(usize) + Send + Sync>;

const COLUMN_COUNT_ID: usize = 1;

#[derive(Debug)]
enum Object {
	Class,
	Helper(HelperObject),
	Str(String),
	Array(Vec<Option<u64>>),
}

#[derive(Debug, Default)]
struct HelperObject {
	table: Option<RemoteTable>,
	cursor: usize,
	column_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
	Local,
	Global,
}

#[derive(Debug, Clone, Copy)]
struct Reference {
	object: u64,
	kind: Kind,
}

#[derive(Default)]
struct Inner {
	helper_class: String,
	tables: HashMap<String, RemoteTable>,
	missing: HashSet<String>,
	launch_error: Option<String>,
	on_fetch: Option<FetchHook>,

	next_ref: usize,
	next_object: u64,
	objects: HashMap<u64, Object>,
	refs: HashMap<usize, Reference>,
	frames: Vec<Vec<usize>>,
	max_frame_capacity: usize,

	launches: Vec<LaunchOptions>,
	destroyed: usize,
	calls: Vec<String>,
	initialize_args: Vec<Vec<String>>,
	invalid_releases: usize,
}

impl Inner {
	fn allocate(&mut self, object: Object) -> u64 {
		self.next_object += 1;
		self.objects.insert(self.next_object, object);
		self.next_object
	}

	fn reference(&mut self, object: u64, kind: Kind) -> RawRef {
		self.next_ref += 1;
		let id = self.next_ref;
		self.refs.insert(
			id,
			Reference {
				object,
				kind,
			},
		);
		if kind == Kind::Local {
			if let Some(frame) = self.frames.last_mut() {
				frame.push(id);
			}
		}
		RawRef::new(id).unwrap_or_else(|| unreachable!("reference ids start at one"))
	}

	fn local(&mut self, object: Object) -> RawRef {
		let id = self.allocate(object);
		self.reference(id, Kind::Local)
	}

	fn resolve(&self, raw: RawRef, operation: &'static str) -> Result<u64> {
		self.refs
			.get(&raw.get())
			.map(|r| r.object)
			.ok_or_else(|| Error::bridge(operation, format!("stale reference {}", raw.get())))
	}

	fn string(&self, object: u64) -> Result<String> {
		match self.objects.get(&object) {
			Some(Object::Str(value)) => Ok(value.clone()),
			_ => Err(Error::conversion("managed value", "not a java.lang.String")),
		}
	}

	fn helper(&mut self, object: u64) -> Result<&mut HelperObject> {
		match self.objects.get_mut(&object) {
			Some(Object::Helper(helper)) => Ok(helper),
			_ => Err(Error::bridge("call", "java.lang.IncompatibleClassChangeError")),
		}
	}

	fn error_text(&mut self, text: Option<String>) -> Option<RawRef> {
		text.map(|text| self.local(Object::Str(text)))
	}

	fn release(&mut self, raw: RawRef, kind: Kind) {
		match self.refs.get(&raw.get()) {
			Some(reference) if reference.kind == kind => {
				self.refs.remove(&raw.get());
			}
			_ => self.invalid_releases += 1,
		}
	}
}

/// The managed runtime as seen by one [`MockLauncher`].
pub struct MockBackend {
	inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
	fn initialize(&self, helper: u64, args: &[RawRef]) -> Result<Option<RawRef>> {
		let mut inner = self.inner.lock();
		let array = match args.first() {
			Some(array) => inner.resolve(*array, "call")?,
			None => return Err(Error::bridge("call", "java.lang.IllegalArgumentException: missing arguments")),
		};
		let elements = match inner.objects.get(&array) {
			Some(Object::Array(elements)) => elements.clone(),
			_ => return Err(Error::bridge("call", "java.lang.ClassCastException")),
		};
		let mut values = Vec::with_capacity(elements.len());
		for element in elements {
			values.push(match element {
				Some(object) => inner.string(object)?,
				None => String::new(),
			});
		}
		inner.initialize_args.push(values.clone());

		if values.len() != 7 {
			let text = format!("java.lang.ArrayIndexOutOfBoundsException: {}", values.len());
			return Ok(inner.error_text(Some(text)));
		}

		let url = &values[2];
		let table = match inner.tables.get(url) {
			Some(table) => table.clone(),
			None => {
				let text = format!("java.sql.SQLException: No suitable driver found for {}", url);
				return Ok(inner.error_text(Some(text)));
			}
		};
		if let Some(text) = table.init_error.clone() {
			return Ok(inner.error_text(Some(text)));
		}

		let state = inner.helper(helper)?;
		state.column_count = table.columns as i32;
		state.cursor = 0;
		state.table = Some(table);
		Ok(None)
	}

	fn fetch_row(&self, helper: u64) -> Result<Option<RawRef>> {
		let (row, fetched, hook) = {
			let mut inner = self.inner.lock();
			let state = inner.helper(helper)?;
			let Some(table) = &state.table else {
				return Err(Error::bridge("call", "java.lang.NullPointerException"));
			};
			if let Some(text) = &table.fetch_error {
				return Err(Error::bridge("call", text.clone()));
			}
			let row = table.rows.get(state.cursor).cloned();
			if row.is_some() {
				state.cursor += 1;
			}
			let fetched = state.cursor;

			let row = row.map(|values| {
				let elements =
					values.into_iter().map(|value| value.map(|text| inner.allocate(Object::Str(text)))).collect();
				inner.local(Object::Array(elements))
			});
			(row, fetched, inner.on_fetch.clone())
		};

		if let (Some(_), Some(hook)) = (row, hook) {
			hook(fetched);
		}
		Ok(row)
	}
}

impl Backend for MockBackend {
	fn find_class(&self, name: &str) -> Result<Option<ClassId>> {
		let mut inner = self.inner.lock();
		if name != inner.helper_class || inner.missing.contains(name) {
			return Ok(None);
		}
		let object = inner.allocate(Object::Class);
		Ok(Some(ClassId(inner.reference(object, Kind::Global))))
	}

	fn method(&self, _class: ClassId, name: &str, signature: &str) -> Result<Option<MethodId>> {
		if self.inner.lock().missing.contains(name) {
			return Ok(None);
		}
		Ok(HelperMethod::ALL
			.iter()
			.position(|m| m.name() == name && m.signature() == signature)
			.and_then(|index| NonZeroUsize::new(index + 1))
			.map(MethodId))
	}

	fn field(&self, _class: ClassId, name: &str, signature: &str) -> Result<Option<FieldId>> {
		if self.inner.lock().missing.contains(name) || name != COLUMN_COUNT_FIELD || signature != COLUMN_COUNT_SIGNATURE
		{
			return Ok(None);
		}
		Ok(NonZeroUsize::new(COLUMN_COUNT_ID).map(FieldId))
	}

	fn new_object(&self, _class: ClassId, _constructor: MethodId) -> Result<RawRef> {
		let mut inner = self.inner.lock();
		inner.calls.push(HelperMethod::Constructor.name().to_string());
		Ok(inner.local(Object::Helper(HelperObject::default())))
	}

	fn new_string(&self, value: &str) -> Result<RawRef> {
		Ok(self.inner.lock().local(Object::Str(value.to_string())))
	}

	fn new_string_array(&self, elements: &[RawRef]) -> Result<RawRef> {
		let mut inner = self.inner.lock();
		let mut objects = Vec::with_capacity(elements.len());
		for element in elements {
			objects.push(Some(inner.resolve(*element, "new_string_array")?));
		}
		Ok(inner.local(Object::Array(objects)))
	}

	fn call_object_method(&self, target: RawRef, method: MethodId, args: &[RawRef]) -> Result<Option<RawRef>> {
		let (helper, called) = {
			let mut inner = self.inner.lock();
			let helper = inner.resolve(target, "call")?;
			let called = *HelperMethod::ALL
				.get(method.0.get() - 1)
				.ok_or_else(|| Error::bridge("call", "java.lang.NoSuchMethodError"))?;
			inner.calls.push(called.name().to_string());
			(helper, called)
		};

		match called {
			HelperMethod::Initialize => self.initialize(helper, args),
			HelperMethod::FetchRow => self.fetch_row(helper),
			HelperMethod::Cancel => {
				let mut inner = self.inner.lock();
				let text = inner.helper(helper)?.table.as_ref().and_then(|t| t.cancel_error.clone());
				Ok(inner.error_text(text))
			}
			HelperMethod::Close => {
				let mut inner = self.inner.lock();
				let state = inner.helper(helper)?;
				let text = state.table.take().and_then(|t| t.close_error);
				Ok(inner.error_text(text))
			}
			HelperMethod::Constructor => Err(Error::bridge("call", "java.lang.IllegalAccessError")),
		}
	}

	fn int_field(&self, target: RawRef, field: FieldId) -> Result<i32> {
		let mut inner = self.inner.lock();
		if field.0.get() != COLUMN_COUNT_ID {
			return Err(Error::bridge("int_field", "java.lang.NoSuchFieldError"));
		}
		let helper = inner.resolve(target, "int_field")?;
		Ok(inner.helper(helper)?.column_count)
	}

	fn array_length(&self, array: RawRef) -> Result<usize> {
		let inner = self.inner.lock();
		match inner.objects.get(&inner.resolve(array, "array_length")?) {
			Some(Object::Array(elements)) => Ok(elements.len()),
			_ => Err(Error::bridge("array_length", "not an array")),
		}
	}

	fn array_element(&self, array: RawRef, index: usize) -> Result<Option<RawRef>> {
		let mut inner = self.inner.lock();
		let element = match inner.objects.get(&inner.resolve(array, "array_element")?) {
			Some(Object::Array(elements)) => elements
				.get(index)
				.copied()
				.ok_or_else(|| Error::bridge("array_element", "java.lang.ArrayIndexOutOfBoundsException"))?,
			_ => return Err(Error::bridge("array_element", "not an array")),
		};
		Ok(element.map(|object| inner.reference(object, Kind::Local)))
	}

	fn string_value(&self, string: RawRef) -> Result<String> {
		let inner = self.inner.lock();
		inner.string(inner.resolve(string, "string_value")?)
	}

	fn new_global(&self, local: RawRef) -> Result<RawRef> {
		let mut inner = self.inner.lock();
		let object = inner.resolve(local, "new_global")?;
		Ok(inner.reference(object, Kind::Global))
	}

	fn delete_global(&self, global: RawRef) {
		self.inner.lock().release(global, Kind::Global);
	}

	fn delete_local(&self, local: RawRef) {
		self.inner.lock().release(local, Kind::Local);
	}

	fn push_frame(&self, capacity: usize) -> Result<()> {
		let mut inner = self.inner.lock();
		inner.frames.push(Vec::new());
		inner.max_frame_capacity = inner.max_frame_capacity.max(capacity);
		Ok(())
	}

	fn pop_frame(&self) {
		let mut inner = self.inner.lock();
		match inner.frames.pop() {
			Some(locals) => {
				for id in locals {
					inner.refs.remove(&id);
				}
			}
			None => inner.invalid_releases += 1,
		}
	}

	fn destroy(&self) -> Result<()> {
		self.inner.lock().destroyed += 1;
		Ok(())
	}
}

/// A [`RuntimeLauncher`] whose runtime serves [`RemoteTable`]s by URL.
#[derive(Clone)]
pub struct MockLauncher {
	inner: Arc<Mutex<Inner>>,
}

impl MockLauncher {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Mutex::new(Inner {
				helper_class: BridgeConfig::default().helper_class,
				..Inner::default()
			})),
		}
	}

	pub fn with_table(self, url: impl Into<String>, table: RemoteTable) -> Self {
		self.inner.lock().tables.insert(url.into(), table);
		self
	}

	/// Makes bring-up fail with `reason`.
	pub fn fail_launch(self, reason: impl Into<String>) -> Self {
		self.inner.lock().launch_error = Some(reason.into());
		self
	}

	/// Hides a class, method or field from lookups.
	pub fn without_member(self, name: impl Into<String>) -> Self {
		self.inner.lock().missing.insert(name.into());
		self
	}

	pub fn on_fetch(self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
		self.inner.lock().on_fetch = Some(Arc::new(hook));
		self
	}

	pub fn probe(&self) -> MockProbe {
		MockProbe {
			inner: Arc::clone(&self.inner),
		}
	}

	/// A runtime over this launcher with the default bridge configuration.
	pub fn runtime(&self) -> Runtime {
		Runtime::new(self.clone(), BridgeConfig::default())
	}
}

impl Default for MockLauncher {
	fn default() -> Self {
		Self::new()
	}
}

impl RuntimeLauncher for MockLauncher {
	fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Backend>> {
		let mut inner = self.inner.lock();
		inner.launches.push(options.clone());
		if let Some(reason) = &inner.launch_error {
			return Err(Error::BridgeInit {
				reason: reason.clone(),
			});
		}
		Ok(Box::new(MockBackend {
			inner: Arc::clone(&self.inner),
		}))
	}
}

/// Read-only view of a mock runtime's bookkeeping.
#[derive(Clone)]
pub struct MockProbe {
	inner: Arc<Mutex<Inner>>,
}

impl MockProbe {
	pub fn launches(&self) -> usize {
		self.inner.lock().launches.len()
	}

	pub fn launch_options(&self) -> Vec<LaunchOptions> {
		self.inner.lock().launches.clone()
	}

	pub fn destroyed(&self) -> usize {
		self.inner.lock().destroyed
	}

	pub fn outstanding_locals(&self) -> usize {
		self.inner.lock().refs.values().filter(|r| r.kind == Kind::Local).count()
	}

	pub fn outstanding_globals(&self) -> usize {
		self.inner.lock().refs.values().filter(|r| r.kind == Kind::Global).count()
	}

	/// Global references held on helper instances, i.e. open remote sessions.
	pub fn open_helpers(&self) -> usize {
		let inner = self.inner.lock();
		inner
			.refs
			.values()
			.filter(|r| r.kind == Kind::Global && matches!(inner.objects.get(&r.object), Some(Object::Helper(_))))
			.count()
	}

	pub fn frame_depth(&self) -> usize {
		self.inner.lock().frames.len()
	}

	pub fn max_frame_capacity(&self) -> usize {
		self.inner.lock().max_frame_capacity
	}

	/// Helper method names in call order.
	pub fn calls(&self) -> Vec<String> {
		self.inner.lock().calls.clone()
	}

	pub fn call_count(&self, method: HelperMethod) -> usize {
		self.inner.lock().calls.iter().filter(|c| c.as_str() == method.name()).count()
	}

	pub fn initialize_args(&self) -> Vec<Vec<String>> {
		self.inner.lock().initialize_args.clone()
	}

	/// Deletes of unknown or already deleted references and unmatched pops.
	pub fn invalid_releases(&self) -> usize {
		self.inner.lock().invalid_releases
	}
}
