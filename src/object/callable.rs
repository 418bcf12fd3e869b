// src/object/callable.rs
//! Callable members and their receivers

use crate::object::instance::Instance;
use crate::object::type_ref::TypeRef;
use crate::object::Value;
use crate::utils::errors::Result;
use std::fmt;
use std::sync::Arc;

/// Variadic argument list
pub type Arguments = Vec<Value>;

type CallableFn = dyn Fn(&Receiver, Arguments) -> Result<Value> + Send + Sync;

/// A named function stored in a member slot
///
/// Cloning is cheap; clones share the same underlying function.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<CallableFn>,
}

impl Callable {
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&Receiver, Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with an explicit receiver
    pub fn call(&self, receiver: &Receiver, args: Arguments) -> Result<Value> {
        (self.func)(receiver, args)
    }

    /// Whether both handles point at the same function
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish()
    }
}

/// The object a callable is invoked on
#[derive(Debug, Clone)]
pub enum Receiver {
    Instance(Instance),
    Type(TypeRef),
}

impl Receiver {
    pub fn instance(&self) -> Option<&Instance> {
        match self {
            Receiver::Instance(instance) => Some(instance),
            Receiver::Type(_) => None,
        }
    }

    /// The receiver's type (an instance's own type, or the type itself)
    pub fn type_ref(&self) -> &TypeRef {
        match self {
            Receiver::Instance(instance) => instance.type_ref(),
            Receiver::Type(type_ref) => type_ref,
        }
    }

    /// Read a data field; type receivers read their static fields
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Receiver::Instance(instance) => instance.field(name),
            Receiver::Type(type_ref) => type_ref.static_field(name),
        }
    }

    /// Write a data field; type receivers write a static field slot
    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        match self {
            Receiver::Instance(instance) => instance.set_field(name, value),
            Receiver::Type(type_ref) => type_ref.set_static_field(name, value),
        }
    }
}

impl From<Instance> for Receiver {
    fn from(instance: Instance) -> Self {
        Receiver::Instance(instance)
    }
}

impl From<TypeRef> for Receiver {
    fn from(type_ref: TypeRef) -> Self {
        Receiver::Type(type_ref)
    }
}
