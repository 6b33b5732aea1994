//! # Path Extraction
//!
//! Depth-first walk from the schema root that records every reachable
//! dotted path.
//!
//! - Objects record their own path and recurse into each property.
//! - Arrays record `path` and `path[]`, then recurse into the item type on
//!   the *same* path, so item properties are reachable as `path.prop`.
//! - Unions recurse into every non-null branch on the same path.
//! - References resolve through the definitions table. Unknown names
//!   contribute nothing. A name already being resolved further up the
//!   current call stack is a cycle: the path is recorded and the
//!   definition is not entered again.
//!
//! The cycle guard is the stack of names on the active resolution path,
//! not a global visited set, so sibling branches may expand the same
//! definition independently.

use sdrift_core::path::ValidPathSetBuilder;
use sdrift_core::ValidPathSet;

use crate::document::{SchemaDocument, SchemaNode};

/// Collect every valid field path declared by `document`.
pub fn extract_paths(document: &SchemaDocument) -> ValidPathSet {
    let mut builder = ValidPathSet::builder();
    let mut resolving = Vec::new();
    walk(document, document.root(), "", &mut resolving, &mut builder);
    builder.build()
}

fn walk<'d>(
    document: &'d SchemaDocument,
    node: &'d SchemaNode,
    path: &str,
    resolving: &mut Vec<&'d str>,
    out: &mut ValidPathSetBuilder,
) {
    match node {
        SchemaNode::Reference { target: None } => {
            tracing::debug!(path, "reference has no local target; skipped");
        }
        SchemaNode::Reference {
            target: Some(name),
        } => {
            if resolving.contains(&name.as_str()) {
                tracing::trace!(path, definition = %name, "reference cycle; not re-entered");
                out.record(path);
                return;
            }
            let Some(definition) = document.definition(name) else {
                tracing::debug!(path, definition = %name, "unresolved reference; skipped");
                return;
            };
            resolving.push(name);
            walk(document, definition, path, resolving, out);
            resolving.pop();
        }
        SchemaNode::Union { branches } => {
            if branches.is_empty() {
                tracing::debug!(path, "empty union; skipped");
            }
            for branch in branches.iter().filter(|b| !b.is_null()) {
                walk(document, branch, path, resolving, out);
            }
        }
        SchemaNode::Array { items } => {
            out.record_array(path);
            walk(document, items, path, resolving, out);
        }
        SchemaNode::Object { properties } => {
            out.record(path);
            for (name, child) in properties {
                let child_path = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{path}.{name}")
                };
                walk(document, child, &child_path, resolving, out);
            }
        }
        SchemaNode::Primitive(_) => out.record(path),
    }
}
