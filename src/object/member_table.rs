// src/object/member_table.rs
//! Live name → slot tables shared by a type and its instances

use crate::object::callable::Callable;
use crate::object::Value;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Content of one member slot
#[derive(Debug, Clone)]
pub enum Slot {
    /// Invocable member
    Method(Callable),

    /// Plain data
    Field(Value),

    /// Reference to another member table (e.g. a type's `prototype`)
    Table(MemberTable),
}

impl Slot {
    pub fn is_callable(&self) -> bool {
        matches!(self, Slot::Method(_))
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Slot::Method(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&Value> {
        match self {
            Slot::Field(value) => Some(value),
            _ => None,
        }
    }
}

/// Shared member table
///
/// Clones are handles to the same table, so a slot replaced through one
/// handle is seen through all of them.
#[derive(Clone, Default)]
pub struct MemberTable {
    slots: Arc<DashMap<String, Slot>>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .slots
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Clone a slot out of the table; no lock is held afterwards
    pub fn get(&self, name: &str) -> Option<Slot> {
        self.slots.get(name).map(|entry| entry.value().clone())
    }

    pub fn get_callable(&self, name: &str) -> Option<Callable> {
        self.get(name).and_then(|slot| slot.as_callable().cloned())
    }

    pub fn insert(&self, name: impl Into<String>, slot: Slot) -> Option<Slot> {
        self.slots.insert(name.into(), slot)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Replace a callable slot with `replace(current)`
    ///
    /// The current occupant is read and the replacement installed under the
    /// slot's lock, so `replace` always sees the latest callable. Returns
    /// `false` (and leaves the slot untouched) when the name is missing or
    /// the slot is not callable. `replace` must not call back into the table.
    pub fn replace_callable<F>(&self, name: &str, replace: F) -> bool
    where
        F: FnOnce(Callable) -> Callable,
    {
        let Some(mut entry) = self.slots.get_mut(name) else {
            return false;
        };
        let current = match entry.value() {
            Slot::Method(current) => current.clone(),
            _ => return false,
        };
        *entry.value_mut() = Slot::Method(replace(current));
        true
    }

    pub fn ptr_eq(&self, other: &MemberTable) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }
}

impl fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tables can reference each other, so only names are printed
        f.debug_struct("MemberTable")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Receiver, TypeBuilder};
    use serde_json::json;

    fn constant(name: &str, value: Value) -> Callable {
        Callable::new(name, move |_, _| Ok(value.clone()))
    }

    #[test]
    fn test_names_are_sorted() {
        let table = MemberTable::new();
        table.insert("zeta", Slot::Field(json!(1)));
        table.insert("alpha", Slot::Method(constant("alpha", json!(2))));

        assert_eq!(table.names(), vec!["alpha".to_string(), "zeta".to_string()]);
        assert_eq!(table.len(), 2);
        assert!(table.contains("zeta"));
    }

    #[test]
    fn test_clone_shares_slots() {
        let table = MemberTable::new();
        let handle = table.clone();
        handle.insert("value", Slot::Field(json!("shared")));

        assert!(table.ptr_eq(&handle));
        assert_eq!(
            table.get("value").unwrap().as_field(),
            Some(&json!("shared"))
        );
    }

    #[test]
    fn test_replace_callable_sees_current_occupant() {
        let table = MemberTable::new();
        let first = constant("answer", json!(1));
        table.insert("answer", Slot::Method(first.clone()));

        let replaced = table.replace_callable("answer", |current| {
            assert!(current.ptr_eq(&first));
            constant("answer", json!(2))
        });
        assert!(replaced);

        let receiver = Receiver::Type(TypeBuilder::new("T").build());
        let installed = table.get_callable("answer").unwrap();
        assert_eq!(installed.call(&receiver, vec![]).unwrap(), json!(2));
        assert!(!installed.ptr_eq(&first));
    }

    #[test]
    fn test_replace_callable_skips_data_and_missing_slots() {
        let table = MemberTable::new();
        table.insert("data", Slot::Field(json!(5)));

        assert!(!table.replace_callable("data", |current| current));
        assert!(!table.replace_callable("missing", |current| current));
        assert_eq!(table.get("data").unwrap().as_field(), Some(&json!(5)));
    }
}
