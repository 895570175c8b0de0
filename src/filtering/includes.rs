//! Relationship include whitelisting.
//!
//! Requested relation names are matched exactly against a per-filter allow
//! list. Nesting is never implied: allowing `Profile` does not allow
//! `Profile.Address`, each path has to be listed on its own.

use std::collections::HashSet;

use super::conditions::{DropKind, Dropped};
use super::validation::is_valid_relation_path;

/// Keep the requested includes that appear verbatim in `allowed`.
///
/// Output follows request order with duplicates collapsed to their first
/// occurrence. Nothing allowed yields an empty list, not an error.
#[must_use]
pub fn resolve_includes<S: AsRef<str>>(requested: &[S], allowed: &HashSet<&str>) -> Vec<String> {
    let (kept, _) = partition_includes(requested, allowed);
    kept
}

fn partition_includes<S: AsRef<str>>(
    requested: &[S],
    allowed: &HashSet<&str>,
) -> (Vec<String>, Vec<Dropped>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for name in requested {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if is_valid_relation_path(name) && allowed.contains(name) {
            if seen.insert(name) {
                kept.push(name.to_string());
            }
        } else {
            dropped.push(Dropped {
                kind: DropKind::Include,
                value: name.to_string(),
            });
        }
    }

    (kept, dropped)
}

/// Reusable resolver holding one filter's allowed includes.
#[derive(Debug, Clone, Default)]
pub struct IncludeResolver {
    allowed: HashSet<&'static str>,
}

impl IncludeResolver {
    #[must_use]
    pub fn new(allowed: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.allowed.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Vec<String> {
        resolve_includes(requested, &self.allowed)
    }

    /// Like [`resolve`](Self::resolve), also reporting what was left out.
    #[must_use]
    pub fn resolve_with_drops<S: AsRef<str>>(&self, requested: &[S]) -> (Vec<String>, Vec<Dropped>) {
        partition_includes(requested, &self.allowed)
    }
}
