// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, num::NonZeroUsize};

use jdbc_fdw_type::{Error, Result};
use jni::{
	JNIEnv, JavaVM,
	objects::{GlobalRef as JniGlobalRef, JClass, JFieldID, JMethodID, JObject, JObjectArray, JString},
	signature::{Primitive, ReturnType},
	sys::{self, jvalue},
};
use libloading::Library;
use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::backend::{Backend, ClassId, FieldId, MethodId, RawRef};

const STRING_CLASS: &str = "java/lang/String";

/// [`Backend`] over a JNI [`JavaVM`].
///
/// Globals are held as `jni` global references keyed by their raw pointer so
/// they can be handed out as [`RawRef`] and deleted by key.
pub struct JvmBackend {
	vm: JavaVM,
	globals: Mutex<HashMap<usize, JniGlobalRef>>,
	// libjvm must stay mapped for as long as the VM exists.
	_library: Library,
}

impl JvmBackend {
	pub fn new(vm: JavaVM, library: Library) -> Self {
		Self {
			vm,
			globals: Mutex::new(HashMap::new()),
			_library: library,
		}
	}

	fn env(&self, operation: &'static str) -> Result<JNIEnv<'_>> {
		match self.vm.get_env() {
			Ok(env) => Ok(env),
			Err(_) => self.vm.attach_current_thread_permanently().map_err(|err| Error::bridge(operation, err)),
		}
	}

	fn pin(&self, env: &mut JNIEnv<'_>, operation: &'static str, local: &JObject<'_>) -> Result<RawRef> {
		let global = env.new_global_ref(local).map_err(|err| failure(env, operation, err))?;
		let raw = RawRef::from_ptr(global.as_obj().as_raw()).ok_or_else(|| Error::bridge(operation, "null global reference"))?;
		self.globals.lock().insert(raw.get(), global);
		Ok(raw)
	}
}

/// Turns a JNI failure into a bridge error, draining a pending Java
/// exception into the message.
fn failure(env: &mut JNIEnv<'_>, operation: &'static str, err: jni::errors::Error) -> Error {
	if !matches!(err, jni::errors::Error::JavaException) {
		return Error::bridge(operation, err);
	}
	let throwable = match env.exception_occurred() {
		Ok(throwable) => throwable,
		Err(err) => return Error::bridge(operation, err),
	};
	let _ = env.exception_clear();

	let description = env
		.call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
		.and_then(|value| value.l())
		.and_then(|text| env.get_string(&JString::from(text)).map(String::from));
	let _ = env.exception_clear();

	match description {
		Ok(description) => Error::bridge(operation, description),
		Err(_) => Error::bridge(operation, "java exception"),
	}
}

/// A lookup that raised `NoSuch*Error` yields `None`; the exception is cleared.
fn missing(env: &mut JNIEnv<'_>, err: jni::errors::Error) -> Result<()> {
	match err {
		jni::errors::Error::JavaException
		| jni::errors::Error::MethodNotFound {
			..
		}
		| jni::errors::Error::FieldNotFound {
			..
		} => {
			let _ = env.exception_clear();
			Ok(())
		}
		other => Err(Error::bridge("lookup", other)),
	}
}

fn object<'a>(raw: RawRef) -> JObject<'a> {
	// SAFETY: every RawRef handed out by this backend is a live JNI reference.
	unsafe { JObject::from_raw(raw.as_ptr()) }
}

fn class<'a>(class: ClassId) -> JClass<'a> {
	// SAFETY: ClassId only wraps pinned class references.
	unsafe { JClass::from_raw(class.0.as_ptr()) }
}

fn method_id(method: MethodId) -> JMethodID {
	// SAFETY: MethodId only wraps ids returned by GetMethodID.
	unsafe { JMethodID::from_raw(method.0.get() as sys::jmethodID) }
}

fn field_id(field: FieldId) -> JFieldID {
	// SAFETY: FieldId only wraps ids returned by GetFieldID.
	unsafe { JFieldID::from_raw(field.0.get() as sys::jfieldID) }
}

fn local(obj: JObject<'_>) -> Option<RawRef> {
	RawRef::from_ptr(obj.into_raw())
}

impl Backend for JvmBackend {
	fn find_class(&self, name: &str) -> Result<Option<ClassId>> {
		let mut env = self.env("find_class")?;
		let binary_name = name.replace('.', "/");
		let found = match env.find_class(binary_name.as_str()) {
			Ok(found) => found,
			Err(err) => {
				missing(&mut env, err)?;
				return Ok(None);
			}
		};
		let raw = self.pin(&mut env, "find_class", &found)?;
		let _ = env.delete_local_ref(found);
		Ok(Some(ClassId(raw)))
	}

	fn method(&self, owner: ClassId, name: &str, signature: &str) -> Result<Option<MethodId>> {
		let mut env = self.env("method")?;
		let owner = class(owner);
		match env.get_method_id(&owner, name, signature) {
			Ok(id) => Ok(NonZeroUsize::new(id.into_raw() as usize).map(MethodId)),
			Err(err) => {
				missing(&mut env, err)?;
				Ok(None)
			}
		}
	}

	fn field(&self, owner: ClassId, name: &str, signature: &str) -> Result<Option<FieldId>> {
		let mut env = self.env("field")?;
		let owner = class(owner);
		match env.get_field_id(&owner, name, signature) {
			Ok(id) => Ok(NonZeroUsize::new(id.into_raw() as usize).map(FieldId)),
			Err(err) => {
				missing(&mut env, err)?;
				Ok(None)
			}
		}
	}

	fn new_object(&self, owner: ClassId, constructor: MethodId) -> Result<RawRef> {
		let mut env = self.env("new_object")?;
		let owner = class(owner);
		// SAFETY: the constructor id belongs to `owner` and takes no arguments.
		let created = unsafe { env.new_object_unchecked(&owner, method_id(constructor), &[]) }
			.map_err(|err| failure(&mut env, "new_object", err))?;
		local(created).ok_or_else(|| Error::bridge("new_object", "constructor returned null"))
	}

	fn new_string(&self, value: &str) -> Result<RawRef> {
		let mut env = self.env("new_string")?;
		let string = env.new_string(value).map_err(|err| failure(&mut env, "new_string", err))?;
		local(string.into()).ok_or_else(|| Error::bridge("new_string", "null string"))
	}

	fn new_string_array(&self, elements: &[RawRef]) -> Result<RawRef> {
		let mut env = self.env("new_string_array")?;
		let array = env
			.new_object_array(elements.len() as sys::jsize, STRING_CLASS, JObject::null())
			.map_err(|err| failure(&mut env, "new_string_array", err))?;
		for (index, element) in elements.iter().enumerate() {
			env.set_object_array_element(&array, index as sys::jsize, object(*element))
				.map_err(|err| failure(&mut env, "new_string_array", err))?;
		}
		local(array.into()).ok_or_else(|| Error::bridge("new_string_array", "null array"))
	}

	fn call_object_method(&self, target: RawRef, method: MethodId, args: &[RawRef]) -> Result<Option<RawRef>> {
		let mut env = self.env("call")?;
		let target = object(target);
		let args: Vec<jvalue> = args
			.iter()
			.map(|arg| jvalue {
				l: arg.as_ptr(),
			})
			.collect();

		// SAFETY: the method id was resolved against the target's class with
		// an object return type, and `args` matches its parameter list.
		let returned = unsafe { env.call_method_unchecked(&target, method_id(method), ReturnType::Object, &args) }
			.and_then(|value| value.l())
			.map_err(|err| failure(&mut env, "call", err))?;
		Ok(local(returned))
	}

	fn int_field(&self, target: RawRef, field: FieldId) -> Result<i32> {
		let mut env = self.env("int_field")?;
		let target = object(target);
		let value = env
			.get_field_unchecked(&target, field_id(field), ReturnType::Primitive(Primitive::Int))
			.and_then(|value| value.i())
			.map_err(|err| failure(&mut env, "int_field", err))?;
		Ok(value)
	}

	fn array_length(&self, array: RawRef) -> Result<usize> {
		let env = self.env("array_length")?;
		// SAFETY: callers only pass references to object arrays.
		let array = unsafe { JObjectArray::from_raw(array.as_ptr()) };
		let length = env.get_array_length(&array).map_err(|err| Error::bridge("array_length", err))?;
		Ok(length.max(0) as usize)
	}

	fn array_element(&self, array: RawRef, index: usize) -> Result<Option<RawRef>> {
		let mut env = self.env("array_element")?;
		// SAFETY: callers only pass references to object arrays.
		let array = unsafe { JObjectArray::from_raw(array.as_ptr()) };
		let element = env
			.get_object_array_element(&array, index as sys::jsize)
			.map_err(|err| failure(&mut env, "array_element", err))?;
		Ok(local(element))
	}

	fn string_value(&self, string: RawRef) -> Result<String> {
		let mut env = self.env("string_value")?;
		let obj = object(string);
		let is_string = env.is_instance_of(&obj, STRING_CLASS).map_err(|err| failure(&mut env, "string_value", err))?;
		if !is_string {
			return Err(Error::conversion("managed value", "not a java.lang.String"));
		}
		let string = JString::from(obj);
		let value = env.get_string(&string).map_err(|err| failure(&mut env, "string_value", err))?;
		Ok(value.into())
	}

	fn new_global(&self, local: RawRef) -> Result<RawRef> {
		let mut env = self.env("new_global")?;
		self.pin(&mut env, "new_global", &object(local))
	}

	fn delete_global(&self, global: RawRef) {
		if self.globals.lock().remove(&global.get()).is_none() {
			warn!(raw = global.get(), "delete of unknown global reference");
		}
	}

	fn delete_local(&self, local: RawRef) {
		if let Ok(env) = self.env("delete_local") {
			let _ = env.delete_local_ref(object(local));
		}
	}

	fn push_frame(&self, capacity: usize) -> Result<()> {
		let mut env = self.env("push_frame")?;
		env.push_local_frame(capacity as i32).map_err(|err| failure(&mut env, "push_frame", err))
	}

	fn pop_frame(&self) {
		if let Ok(env) = self.env("pop_frame") {
			// SAFETY: frames are pushed and popped in strict nesting by LocalFrame.
			let _ = unsafe { env.pop_local_frame(&JObject::null()) };
		}
	}

	fn destroy(&self) -> Result<()> {
		// Global references must go while the VM can still delete them.
		self.globals.lock().clear();

		let vm = self.vm.get_java_vm_pointer();
		// SAFETY: vm is the live VM created at launch; nothing uses it after this.
		let status = unsafe {
			match (**vm).DestroyJavaVM {
				Some(destroy) => destroy(vm),
				None => return Err(Error::bridge("destroy", "DestroyJavaVM unavailable")),
			}
		};
		trace!(status, "JVM destroyed");
		if status != sys::JNI_OK {
			return Err(Error::bridge("destroy", format!("DestroyJavaVM returned {}", status)));
		}
		Ok(())
	}
}
