// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use jdbc_fdw_type::{Error, Result};
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::{
	backend::{Backend, ClassId, FieldId, MethodId},
	config::BridgeConfig,
	reference::{GlobalRef, LocalFrame},
};

/// Methods of the managed scan helper.
///
/// Every method except the constructor and `fetchRow` returns `null` on
/// success and the error text (a stack trace) on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperMethod {
	Constructor,
	/// `initialize(String[7])`: query, driver class, url, user, password,
	/// timeout seconds, driver archive path.
	Initialize,
	/// Next row as `String[]`, `null` once the result set is exhausted.
	FetchRow,
	Cancel,
	Close,
}

impl HelperMethod {
	pub const ALL: [HelperMethod; 5] = [
		HelperMethod::Constructor,
		HelperMethod::Initialize,
		HelperMethod::FetchRow,
		HelperMethod::Cancel,
		HelperMethod::Close,
	];

	pub fn name(&self) -> &'static str {
		match self {
			HelperMethod::Constructor => "<init>",
			HelperMethod::Initialize => "initialize",
			HelperMethod::FetchRow => "fetchRow",
			HelperMethod::Cancel => "cancel",
			HelperMethod::Close => "close",
		}
	}

	pub fn signature(&self) -> &'static str {
		match self {
			HelperMethod::Constructor => "()V",
			HelperMethod::Initialize => "([Ljava/lang/String;)Ljava/lang/String;",
			HelperMethod::FetchRow => "()[Ljava/lang/String;",
			HelperMethod::Cancel | HelperMethod::Close => "()Ljava/lang/String;",
		}
	}
}

pub const COLUMN_COUNT_FIELD: &str = "columnCount";
pub const COLUMN_COUNT_SIGNATURE: &str = "I";

/// The resolved helper class. Resolved once per runtime and shared by all
/// scans.
#[derive(Debug, Clone, Copy)]
pub struct HelperType {
	pub class: ClassId,
	methods: [MethodId; 5],
	pub column_count: FieldId,
}

impl HelperType {
	pub fn method(&self, method: HelperMethod) -> MethodId {
		self.methods[method as usize]
	}
}

/// Safe access to a running managed runtime.
///
/// All raw references obtained through a bridge are wrapped in
/// [`crate::LocalRef`] or [`GlobalRef`]. Once the runtime is torn down every
/// operation fails and pending releases become no-ops.
pub struct Bridge {
	backend: Box<dyn Backend>,
	helper_class: String,
	frame_headroom: usize,
	helper: Mutex<Option<HelperType>>,
	alive: AtomicBool,
}

impl Debug for Bridge {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Bridge").field("helper_class", &self.helper_class).field("alive", &self.is_alive()).finish()
	}
}

impl Bridge {
	pub fn new(backend: Box<dyn Backend>, config: &BridgeConfig) -> Self {
		Self {
			backend,
			helper_class: config.helper_class.clone(),
			frame_headroom: config.frame_headroom,
			helper: Mutex::new(None),
			alive: AtomicBool::new(true),
		}
	}

	pub fn is_alive(&self) -> bool {
		self.alive.load(Ordering::Acquire)
	}

	pub(crate) fn backend(&self, operation: &'static str) -> Result<&dyn Backend> {
		if !self.is_alive() {
			return Err(Error::bridge(operation, "managed runtime has been torn down"));
		}
		Ok(self.backend.as_ref())
	}

	pub(crate) fn raw_backend(&self) -> &dyn Backend {
		self.backend.as_ref()
	}

	pub fn helper_class(&self) -> &str {
		&self.helper_class
	}

	/// Opens a frame sized for `columns` references plus headroom.
	pub fn frame(&self, columns: usize) -> Result<LocalFrame<'_>> {
		LocalFrame::push(self, columns + self.frame_headroom)
	}

	/// The helper class, resolving it on first use.
	pub fn helper(&self) -> Result<HelperType> {
		let mut helper = self.helper.lock();
		if let Some(resolved) = *helper {
			return Ok(resolved);
		}
		let resolved = self.bind_helper()?;
		*helper = Some(resolved);
		Ok(resolved)
	}

	#[instrument(name = "bridge::bind_helper", level = "debug", skip(self), fields(class = %self.helper_class))]
	fn bind_helper(&self) -> Result<HelperType> {
		let backend = self.backend("bind_helper")?;
		let binding = |member_kind: &'static str, member: &str, signature: &str| Error::BridgeBinding {
			member_kind,
			class: self.helper_class.clone(),
			member: member.to_string(),
			signature: signature.to_string(),
		};

		let class = backend.find_class(&self.helper_class)?.ok_or_else(|| binding("class", "", ""))?;

		let mut methods = Vec::with_capacity(HelperMethod::ALL.len());
		for method in HelperMethod::ALL {
			match backend.method(class, method.name(), method.signature()) {
				Ok(Some(id)) => methods.push(id),
				Ok(None) => {
					backend.delete_global(class.0);
					return Err(binding("method", method.name(), method.signature()));
				}
				Err(err) => {
					backend.delete_global(class.0);
					return Err(err);
				}
			}
		}

		let column_count = match backend.field(class, COLUMN_COUNT_FIELD, COLUMN_COUNT_SIGNATURE) {
			Ok(Some(id)) => id,
			Ok(None) => {
				backend.delete_global(class.0);
				return Err(binding("field", COLUMN_COUNT_FIELD, COLUMN_COUNT_SIGNATURE));
			}
			Err(err) => {
				backend.delete_global(class.0);
				return Err(err);
			}
		};

		debug!("helper class bound");
		Ok(HelperType {
			class,
			methods: [methods[0], methods[1], methods[2], methods[3], methods[4]],
			column_count,
		})
	}

	/// Allocates a helper instance and pins it beyond the current frame.
	#[instrument(name = "bridge::new_helper", level = "trace", skip(self))]
	pub fn new_helper(self: &Arc<Self>) -> Result<GlobalRef> {
		let helper = self.helper()?;
		let frame = self.frame(1)?;
		let local = frame.new_object(helper.class, helper.method(HelperMethod::Constructor))?;
		let global = self.backend("new_global")?.new_global(local.raw())?;
		Ok(GlobalRef::new(Arc::clone(self), global))
	}

	pub fn int_field(&self, target: &GlobalRef, field: FieldId) -> Result<i32> {
		self.backend("int_field")?.int_field(target.raw(), field)
	}

	/// Destroys the runtime. Only the first call has an effect.
	#[instrument(name = "bridge::shutdown", level = "debug", skip(self))]
	pub fn shutdown(&self) -> Result<()> {
		if !self.alive.swap(false, Ordering::AcqRel) {
			return Ok(());
		}
		if let Some(helper) = self.helper.lock().take() {
			self.backend.delete_global(helper.class.0);
		}
		self.backend.destroy()
	}
}
