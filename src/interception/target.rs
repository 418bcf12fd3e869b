// src/interception/target.rs
//! Member enumeration: resolving a target's two namespaces

use crate::object::{Callable, Instance, MemberTable, TypeRef};
use crate::utils::errors::{EngineError, Result};
use std::fmt;

/// What an entry point is asked to wrap
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A live instance; wrapping affects its whole type
    Instance(&'a Instance),

    /// A type reference
    Type(&'a TypeRef),

    /// A bare callable; always rejected
    Callable(&'a Callable),
}

impl<'a> From<&'a Instance> for Target<'a> {
    fn from(instance: &'a Instance) -> Self {
        Target::Instance(instance)
    }
}

impl<'a> From<&'a TypeRef> for Target<'a> {
    fn from(type_ref: &'a TypeRef) -> Self {
        Target::Type(type_ref)
    }
}

impl<'a> From<&'a Callable> for Target<'a> {
    fn from(callable: &'a Callable) -> Self {
        Target::Callable(callable)
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Instance(instance) => write!(f, "instance of {}", instance.type_ref().name()),
            Target::Type(type_ref) => write!(f, "type {}", type_ref.name()),
            Target::Callable(callable) => write!(f, "callable {}", callable.name()),
        }
    }
}

/// Which of a target's member tables a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Behavior table shared by all instances
    Instance,

    /// Slots owned directly by the type
    Type,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Instance => "instance",
            Namespace::Type => "type",
        }
    }
}

/// The two live member tables behind a target
#[derive(Debug, Clone)]
pub struct Namespaces {
    pub instance: MemberTable,
    pub type_level: MemberTable,
}

impl Namespaces {
    pub fn table(&self, namespace: Namespace) -> &MemberTable {
        match namespace {
            Namespace::Instance => &self.instance,
            Namespace::Type => &self.type_level,
        }
    }

    /// Own slot names in one namespace
    pub fn candidates(&self, namespace: Namespace) -> Vec<String> {
        self.table(namespace).names()
    }
}

/// Resolve the namespaces of a target without touching them
pub fn enumerate(target: &Target<'_>) -> Result<Namespaces> {
    let type_ref = match target {
        Target::Instance(instance) => instance.type_ref(),
        Target::Type(type_ref) => *type_ref,
        Target::Callable(_) => return Err(EngineError::UnsupportedTarget),
    };

    Ok(Namespaces {
        instance: type_ref.behavior().clone(),
        type_level: type_ref.statics().clone(),
    })
}
