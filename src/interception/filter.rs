// src/interception/filter.rs
//! Candidate filtering by allow-list and reserved structural names

use crate::interception::target::Namespace;
use crate::utils::config::ReservedNames;
use std::collections::BTreeSet;

/// Explicit allow-list of member names; empty means every eligible member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodFilter {
    names: BTreeSet<String>,
}

impl MethodFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl<S: AsRef<str>> FromIterator<S> for MethodFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

impl From<&[&str]> for MethodFilter {
    fn from(names: &[&str]) -> Self {
        names.iter().collect()
    }
}

/// Reduce one namespace's candidates to the names that should be wrapped
pub fn retain(
    candidates: Vec<String>,
    filter: &MethodFilter,
    namespace: Namespace,
    reserved: &ReservedNames,
) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|name| match namespace {
            Namespace::Instance => !reserved.is_reserved_instance(name),
            Namespace::Type => !reserved.is_reserved_type_level(name) || filter.contains(name),
        })
        .filter(|name| filter.is_empty() || filter.contains(name))
        .collect()
}
