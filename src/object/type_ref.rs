// src/object/type_ref.rs
//! Type references and the registration builder

use crate::object::callable::{Arguments, Callable, Receiver};
use crate::object::instance::Instance;
use crate::object::member_table::{MemberTable, Slot};
use crate::object::Value;
use crate::utils::errors::{EngineError, Result};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

/// Name of the instance-level slot holding the constructor
pub const CONSTRUCTOR: &str = "constructor";

/// Type-level slot holding the type name
pub const NAME: &str = "name";

/// Type-level slot holding the constructor arity
pub const LENGTH: &str = "length";

/// Type-level slot referencing the behavior table
pub const PROTOTYPE: &str = "prototype";

struct TypeInner {
    name: String,
    statics: MemberTable,
    behavior: MemberTable,
    parent: Option<TypeRef>,
}

/// Shared handle to a registered type
///
/// Equality is identity: two handles are the same type only if they come
/// from the same [`TypeBuilder::build`] call.
#[derive(Clone)]
pub struct TypeRef {
    inner: Arc<TypeInner>,
}

impl TypeRef {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Type-level slots owned directly by this type
    pub fn statics(&self) -> &MemberTable {
        &self.inner.statics
    }

    /// Instance-level slots shared by all instances of this type
    pub fn behavior(&self) -> &MemberTable {
        &self.inner.behavior
    }

    pub fn parent(&self) -> Option<&TypeRef> {
        self.inner.parent.as_ref()
    }

    pub fn ptr_eq(&self, other: &TypeRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Find an instance-level slot on this type or its ancestors
    pub fn resolve_method(&self, name: &str) -> Option<Slot> {
        self.ancestry().find_map(|ty| ty.behavior().get(name))
    }

    /// Find a type-level slot on this type or its ancestors
    pub fn resolve_static(&self, name: &str) -> Option<Slot> {
        self.ancestry().find_map(|ty| ty.statics().get(name))
    }

    /// Invoke a type-level member with this type as receiver
    pub fn call_static(&self, name: &str, args: Arguments) -> Result<Value> {
        let callable = expect_callable(self.resolve_static(name), self.name(), name)?;
        callable.call(&Receiver::Type(self.clone()), args)
    }

    pub fn static_field(&self, name: &str) -> Option<Value> {
        self.resolve_static(name)
            .and_then(|slot| slot.as_field().cloned())
    }

    pub fn set_static_field(&self, name: impl Into<String>, value: Value) {
        self.statics().insert(name, Slot::Field(value));
    }

    /// Create an instance and run the resolved constructor on it
    pub fn construct(&self, args: Arguments) -> Result<Instance> {
        let instance = Instance::new(self.clone());
        let constructor =
            expect_callable(self.resolve_method(CONSTRUCTOR), self.name(), CONSTRUCTOR)?;
        constructor.call(&Receiver::Instance(instance.clone()), args)?;
        Ok(instance)
    }

    fn ancestry(&self) -> impl Iterator<Item = &TypeRef> {
        std::iter::successors(Some(self), |ty| ty.parent())
    }
}

pub(crate) fn expect_callable(
    slot: Option<Slot>,
    type_name: &str,
    member: &str,
) -> Result<Callable> {
    match slot {
        Some(Slot::Method(callable)) => Ok(callable),
        Some(_) => Err(EngineError::NotCallable {
            member: member.to_string(),
        }),
        None => Err(EngineError::MemberNotFound {
            type_name: type_name.to_string(),
            member: member.to_string(),
        }),
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(TypeRef::name))
            .finish()
    }
}

/// Declares the interceptable members of a new type
pub struct TypeBuilder {
    name: String,
    arity: Option<usize>,
    constructor: Option<Callable>,
    methods: Vec<(String, Callable)>,
    statics: Vec<(String, Slot)>,
    parent: Option<TypeRef>,
}

impl TypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: None,
            constructor: None,
            methods: Vec::new(),
            statics: Vec::new(),
            parent: None,
        }
    }

    /// Inherit members from `parent`; only newly declared members are own slots
    pub fn extends(mut self, parent: &TypeRef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn constructor<F>(mut self, arity: usize, func: F) -> Self
    where
        F: Fn(&Receiver, Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.arity = Some(arity);
        self.constructor = Some(Callable::new(CONSTRUCTOR, func));
        self
    }

    pub fn method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Receiver, Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let callable = Callable::new(name.as_str(), func);
        self.methods.push((name, callable));
        self
    }

    pub fn static_method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Receiver, Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let callable = Callable::new(name.as_str(), func);
        self.statics.push((name, Slot::Method(callable)));
        self
    }

    pub fn static_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.statics.push((name.into(), Slot::Field(value)));
        self
    }

    pub fn build(self) -> TypeRef {
        let statics = MemberTable::new();
        let behavior = MemberTable::new();

        let arity = self
            .arity
            .or_else(|| {
                self.parent
                    .as_ref()
                    .and_then(|p| p.static_field(LENGTH))
                    .and_then(|v| v.as_u64())
                    .map(|n| n as usize)
            })
            .unwrap_or(0);

        statics.insert(NAME, Slot::Field(json!(self.name)));
        statics.insert(LENGTH, Slot::Field(json!(arity)));
        statics.insert(PROTOTYPE, Slot::Table(behavior.clone()));
        for (name, slot) in self.statics {
            statics.insert(name, slot);
        }

        let constructor = self
            .constructor
            .unwrap_or_else(|| default_constructor(self.parent.clone()));
        behavior.insert(CONSTRUCTOR, Slot::Method(constructor));
        for (name, callable) in self.methods {
            behavior.insert(name, Slot::Method(callable));
        }

        TypeRef {
            inner: Arc::new(TypeInner {
                name: self.name,
                statics,
                behavior,
                parent: self.parent,
            }),
        }
    }
}

/// Forwards to the parent's constructor, or does nothing for root types
fn default_constructor(parent: Option<TypeRef>) -> Callable {
    Callable::new(CONSTRUCTOR, move |receiver, args| match &parent {
        Some(parent) => {
            let constructor = expect_callable(
                parent.resolve_method(CONSTRUCTOR),
                parent.name(),
                CONSTRUCTOR,
            )?;
            constructor.call(receiver, args)
        }
        None => Ok(Value::Null),
    })
}
