// src/object/instance.rs
//! Live instances

use crate::object::callable::{Arguments, Receiver};
use crate::object::type_ref::{expect_callable, TypeRef};
use crate::object::Value;
use crate::utils::errors::Result;
use parking_lot::RwLock;
use serde_json::Map;
use std::fmt;
use std::sync::Arc;

struct InstanceInner {
    type_ref: TypeRef,
    fields: RwLock<Map<String, Value>>,
}

/// A live object: its type plus own data fields
///
/// Methods are not stored per instance; [`Instance::call`] resolves them
/// through the type's behavior tables at call time.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl Instance {
    pub(crate) fn new(type_ref: TypeRef) -> Self {
        Self {
            inner: Arc::new(InstanceInner {
                type_ref,
                fields: RwLock::new(Map::new()),
            }),
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.inner.type_ref
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.inner.fields.read().get(name).cloned()
    }

    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        self.inner.fields.write().insert(name.into(), value);
    }

    /// Snapshot of all own fields
    pub fn fields(&self) -> Value {
        Value::Object(self.inner.fields.read().clone())
    }

    /// Invoke an instance-level member with this instance as receiver
    pub fn call(&self, name: &str, args: Arguments) -> Result<Value> {
        let ty = self.type_ref();
        let callable = expect_callable(ty.resolve_method(name), ty.name(), name)?;
        callable.call(&Receiver::Instance(self.clone()), args)
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_ref().name())
            .field("fields", &self.fields())
            .finish()
    }
}
