//! # Valid Path Sets
//!
//! A [`ValidPathSet`] holds every dotted field path reachable from a schema
//! root. Array-typed paths appear twice: bare (`event.sponsors`) and with the
//! array marker (`event.sponsors[]`). Sets are assembled with a
//! [`ValidPathSetBuilder`] and are read-only once built.

use std::collections::BTreeSet;
use std::ops::Bound;

use serde::Serialize;

/// Suffix recorded after every array-typed path.
pub const ARRAY_MARKER: &str = "[]";

/// Immutable set of dotted field paths declared by one schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidPathSet {
    paths: BTreeSet<String>,
}

impl ValidPathSet {
    /// Start assembling a new set.
    pub fn builder() -> ValidPathSetBuilder {
        ValidPathSetBuilder::default()
    }

    /// Exact membership.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// True if some member lies strictly below `prefix` (starts with
    /// `prefix + "."`).
    pub fn has_descendant(&self, prefix: &str) -> bool {
        let lower = format!("{prefix}.");
        self.paths
            .range::<str, _>((Bound::Included(lower.as_str()), Bound::Unbounded))
            .next()
            .is_some_and(|p| p.starts_with(&lower))
    }

    /// True if `path` was recorded as array-typed.
    pub fn is_array(&self, path: &str) -> bool {
        self.paths.contains(&format!("{path}{ARRAY_MARKER}"))
    }

    /// Number of members, array-marked forms included.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if the schema declared nothing reachable.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Members in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

/// Accumulates paths during schema traversal.
#[derive(Debug, Default)]
pub struct ValidPathSetBuilder {
    paths: BTreeSet<String>,
}

impl ValidPathSetBuilder {
    /// Record a path. Empty paths (the schema root itself) are ignored.
    pub fn record(&mut self, path: &str) {
        if !path.is_empty() {
            self.paths.insert(path.to_string());
        }
    }

    /// Record an array-typed path in both its bare and marked forms.
    pub fn record_array(&mut self, path: &str) {
        if !path.is_empty() {
            self.paths.insert(path.to_string());
            self.paths.insert(format!("{path}{ARRAY_MARKER}"));
        }
    }

    /// Freeze the accumulated paths.
    pub fn build(self) -> ValidPathSet {
        ValidPathSet { paths: self.paths }
    }
}

impl FromIterator<String> for ValidPathSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut builder = ValidPathSet::builder();
        for path in iter {
            builder.record(&path);
        }
        builder.build()
    }
}
