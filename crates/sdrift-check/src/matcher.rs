//! # Path Matching
//!
//! Decides whether a reference path is backed by the schema. Rules, in
//! order:
//!
//! 1. exact member of the valid-path set;
//! 2. a parent of some member (`event.settings` when
//!    `event.settings.visible` is declared);
//! 3. exact member once numeric bracket indices are stripped
//!    (`sponsors[3].name` as `sponsors.name`).
//!
//! Exceptions are consulted only after all three fail, so a field that is
//! later added to the schema stops depending on its exception entry.

use std::sync::LazyLock;

use regex::Regex;
use sdrift_core::{FieldReference, ValidPathSet, Verdict};

use crate::exceptions::ExceptionRegistry;

static INDEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[0-9]+\]").unwrap());

/// Which schema rule accepted a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMatch {
    Exact,
    Ancestor,
    Indexed,
}

/// Remove numeric bracket indices: `a[3].b[0]` becomes `a.b`.
pub fn strip_indices(path: &str) -> String {
    INDEX_RE.replace_all(path, "").into_owned()
}

/// Apply the schema rules to `path`.
pub fn match_schema(path: &str, valid_paths: &ValidPathSet) -> Option<SchemaMatch> {
    if valid_paths.contains(path) {
        return Some(SchemaMatch::Exact);
    }
    if valid_paths.has_descendant(path) {
        return Some(SchemaMatch::Ancestor);
    }
    if path.contains('[') && valid_paths.contains(&strip_indices(path)) {
        return Some(SchemaMatch::Indexed);
    }
    None
}

/// Full classification: schema first, then the exception registry.
pub fn classify(
    reference: &FieldReference,
    valid_paths: &ValidPathSet,
    exceptions: &ExceptionRegistry,
) -> Verdict {
    if match_schema(&reference.path, valid_paths).is_some() {
        Verdict::Valid
    } else if exceptions.is_exception(&reference.source_file, &reference.path) {
        Verdict::Exception
    } else {
        Verdict::Invalid
    }
}
