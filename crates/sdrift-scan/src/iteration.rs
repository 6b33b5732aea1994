//! # Iteration-Variable References
//!
//! Callback and loop variables such as `sponsor` in
//! `event.sponsors.forEach(sponsor => sponsor.name)` stand for one element
//! of a schema array. Their accesses are rewritten onto the array path
//! (`sponsor.name` becomes `sponsors.name`) and validated against the item
//! type.
//!
//! Iteration variable names are short and common, so a binding is only
//! applied to a file that also shows evidence of iterating that array:
//!
//! - a higher-order call on the array path (`sponsors.forEach(`,
//!   `data.sponsors?.map(`), or
//! - a loop binding naming the variable (`for (const sponsor of ...)`,
//!   `for sponsor in ...`).
//!
//! Without evidence, the variable is not scanned at all.

use std::sync::LazyLock;

use regex::Regex;
use sdrift_core::{FieldReference, ReferenceKind, ValidPathSet};
use serde::{Deserialize, Serialize};

use crate::chain::{find_chains, is_ident_byte};
use crate::source::SourceText;

/// Built-in `(variable, array path)` pairs.
pub const DEFAULT_ITERATION_BINDINGS: &[(&str, &str)] = &[
    ("sponsor", "sponsors"),
    ("speaker", "speakers"),
    ("session", "schedule"),
    ("link", "links"),
];

/// Array methods whose callback receives one element.
const ITERATION_METHODS: &[&str] = &[
    "forEach",
    "map",
    "filter",
    "find",
    "findIndex",
    "some",
    "every",
    "reduce",
    "flatMap",
];

static LOOP_BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfor\s*\(?\s*(?:(?:const|let|var)\s+)?([A-Za-z_$][A-Za-z0-9_$]*)\s+(?:of|in)\b")
        .unwrap()
});

/// Maps an iteration variable name to the array it ranges over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationBinding {
    /// Loop or callback variable name, e.g. `sponsor`.
    pub variable: String,
    /// Dotted schema path of the array, e.g. `sponsors`.
    pub array_path: String,
}

impl IterationBinding {
    pub fn new(variable: impl Into<String>, array_path: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            array_path: array_path.into(),
        }
    }

    /// The built-in binding table.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_ITERATION_BINDINGS
            .iter()
            .map(|(variable, array_path)| Self::new(*variable, *array_path))
            .collect()
    }
}

/// Rewrite bindings onto the paths they take under `root_variable`.
///
/// A binding whose `array_path` is not an array in `valid_paths` but whose
/// `{root_variable}.{array_path}` is, is rewritten to the rooted form. Other
/// bindings are returned unchanged.
pub fn root_bindings(
    bindings: &[IterationBinding],
    valid_paths: &ValidPathSet,
    root_variable: &str,
) -> Vec<IterationBinding> {
    bindings
        .iter()
        .map(|binding| {
            let rooted = format!("{root_variable}.{}", binding.array_path);
            if !valid_paths.is_array(&binding.array_path) && valid_paths.is_array(&rooted) {
                IterationBinding::new(binding.variable.clone(), rooted)
            } else {
                binding.clone()
            }
        })
        .collect()
}

/// True if `source` iterates `binding.array_path` or binds
/// `binding.variable` in a loop, outside comments.
///
/// A call on the last segment of a dotted array path counts too, so
/// `sponsors.forEach(` is evidence for `event.sponsors`.
pub fn has_iteration_evidence(source: &SourceText<'_>, binding: &IterationBinding) -> bool {
    let path = binding.array_path.as_str();
    let last = path.rsplit('.').next().unwrap_or(path);
    higher_order_call(source, path)
        || (last != path && higher_order_call(source, last))
        || loop_binding(source, &binding.variable)
}

fn higher_order_call(source: &SourceText<'_>, array_path: &str) -> bool {
    if array_path.is_empty() {
        return false;
    }
    let text = source.text();
    let bytes = text.as_bytes();

    text.match_indices(array_path).any(|(at, _)| {
        if at > 0 && is_ident_byte(bytes[at - 1]) {
            return false;
        }
        if source.is_masked(at) {
            return false;
        }
        let rest = &text[at + array_path.len()..];
        let rest = rest.strip_prefix('?').unwrap_or(rest);
        let Some(rest) = rest.strip_prefix('.') else {
            return false;
        };
        ITERATION_METHODS.iter().any(|method| {
            rest.strip_prefix(method)
                .is_some_and(|after| after.trim_start().starts_with('('))
        })
    })
}

fn loop_binding(source: &SourceText<'_>, variable: &str) -> bool {
    LOOP_BINDING_RE.captures_iter(source.text()).any(|caps| {
        let whole = caps.get(0).map_or(0, |m| m.start());
        caps.get(1).is_some_and(|name| name.as_str() == variable) && !source.is_masked(whole)
    })
}

/// Scan `text` for evidence-gated iteration-variable accesses.
pub fn scan_iteration_references(
    source_file: &str,
    text: &str,
    valid_paths: &ValidPathSet,
    bindings: &[IterationBinding],
) -> Vec<FieldReference> {
    iteration_references(&SourceText::new(source_file, text), valid_paths, bindings)
}

/// Same as [`scan_iteration_references`] over an already indexed source.
///
/// Bindings whose array path is not an array in `valid_paths` are skipped.
pub fn iteration_references(
    source: &SourceText<'_>,
    valid_paths: &ValidPathSet,
    bindings: &[IterationBinding],
) -> Vec<FieldReference> {
    let mut references = Vec::new();
    let mut chains = None;

    for binding in bindings {
        if !valid_paths.is_array(&binding.array_path) {
            tracing::trace!(
                file = source.file(),
                array = %binding.array_path,
                "binding target is not an array in this schema"
            );
            continue;
        }
        if !has_iteration_evidence(source, binding) {
            tracing::trace!(
                file = source.file(),
                variable = %binding.variable,
                "no iteration evidence; variable not scanned"
            );
            continue;
        }

        let chains = chains.get_or_insert_with(|| find_chains(source));
        references.extend(
            chains
                .iter()
                .filter(|chain| chain.root == binding.variable)
                .map(|chain| {
                    let path = format!("{}.{}", binding.array_path, chain.dotted());
                    chain.to_reference(source, &binding.variable, path, ReferenceKind::Iteration)
                }),
        );
    }

    references.sort_by_key(|r| (r.line_number, r.column));
    tracing::debug!(
        file = source.file(),
        count = references.len(),
        "iteration references scanned"
    );
    references
}
