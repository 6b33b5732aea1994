//! # Exception Registry
//!
//! Documented, intentional reads of fields the schema does not declare,
//! typically a legacy alternate read kept as a fallback for old data.
//! Entries are keyed by source file and match the entry path itself or any
//! dotted descendant of it.
//!
//! Every entry carries a `reason`: the accessing code must tolerate the
//! field being absent, and the reason says why that holds. The registry is
//! loaded once from configuration and never changes during a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matcher::strip_indices;

/// One allowed path or path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExceptionEntry {
    /// Allowed dotted path; descendants are allowed too.
    pub path: String,
    /// Why reading this undeclared field is safe.
    pub reason: String,
}

impl ExceptionEntry {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True if `path` is this entry or a dotted descendant of it.
    pub fn covers(&self, path: &str) -> bool {
        path.strip_prefix(self.path.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

/// Per-file allow-list of undeclared paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionRegistry {
    entries: BTreeMap<String, Vec<ExceptionEntry>>,
}

impl ExceptionRegistry {
    pub fn new(entries: BTreeMap<String, Vec<ExceptionEntry>>) -> Self {
        Self { entries }
    }

    /// The entry excusing `path` in `source_file`, if any. Indexed paths
    /// (`links[0].url`) are also tried with indices removed.
    pub fn matching_entry(&self, source_file: &str, path: &str) -> Option<&ExceptionEntry> {
        let entries = self.entries.get(source_file)?;
        entries.iter().find(|e| e.covers(path)).or_else(|| {
            if path.contains('[') {
                let stripped = strip_indices(path);
                entries.iter().find(|e| e.covers(&stripped))
            } else {
                None
            }
        })
    }

    pub fn is_exception(&self, source_file: &str, path: &str) -> bool {
        self.matching_entry(source_file, path).is_some()
    }

    /// Entries registered for one file.
    pub fn entries_for(&self, source_file: &str) -> &[ExceptionEntry] {
        self.entries
            .get(source_file)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of entries across all files.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(file, entry)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExceptionEntry)> {
        self.entries
            .iter()
            .flat_map(|(file, entries)| entries.iter().map(move |e| (file.as_str(), e)))
    }
}
