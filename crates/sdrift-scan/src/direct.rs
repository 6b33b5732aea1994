//! # Direct References
//!
//! Accesses rooted at a configured root variable, e.g. `event.settings.visible`
//! for root `event`. The path keeps the root as its first segment, so it
//! lines up with schemas that declare the root as a top-level property.

use sdrift_core::{FieldReference, ReferenceKind};

use crate::chain::find_chains;
use crate::host::is_host_member;
use crate::source::SourceText;

/// Scan `text` for accesses rooted at `root_variable`.
pub fn scan_direct_references(
    source_file: &str,
    text: &str,
    root_variable: &str,
) -> Vec<FieldReference> {
    direct_references(&SourceText::new(source_file, text), root_variable)
}

/// Same as [`scan_direct_references`] over an already indexed source.
pub fn direct_references(source: &SourceText<'_>, root_variable: &str) -> Vec<FieldReference> {
    let references: Vec<FieldReference> = find_chains(source)
        .into_iter()
        .filter(|chain| chain.root == root_variable)
        .filter(|chain| !is_host_member(root_variable, chain.first_field()))
        .map(|chain| {
            let path = format!("{root_variable}.{}", chain.dotted());
            chain.to_reference(source, root_variable, path, ReferenceKind::Direct)
        })
        .collect();

    tracing::debug!(
        file = source.file(),
        root = root_variable,
        count = references.len(),
        "direct references scanned"
    );
    references
}
