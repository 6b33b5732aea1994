//! # Access Chains
//!
//! Finds `ident(.ident | ?.ident)+` chains in unmasked source text. Each
//! segment may carry numeric bracket indices (`sponsors[0]`), which are kept
//! for the matcher to normalize.
//!
//! A chain only starts at an identifier that is not itself a member of
//! something else: the preceding character must not be an identifier
//! character or a `.` (spread `...` excepted). A trailing segment called as
//! a method and trailing built-in members such as `length` are dropped.

use std::sync::LazyLock;

use regex::Regex;
use sdrift_core::{FieldReference, ReferenceKind};

use crate::host::BUILTIN_TRAILING_MEMBERS;
use crate::source::SourceText;

static CHAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*(?:\??\.[A-Za-z_$][A-Za-z0-9_$]*(?:\[[0-9]+\])*)+").unwrap()
});

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// One field-access chain found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain<'a> {
    /// Leading identifier.
    pub root: &'a str,
    /// Member segments after the root, indices included, `?` removed.
    pub segments: Vec<&'a str>,
    /// Byte offset of the root.
    pub start: usize,
    /// Matched text up to the last kept segment.
    pub raw: &'a str,
}

impl<'a> Chain<'a> {
    /// First member name without bracket indices.
    pub fn first_field(&self) -> &'a str {
        self.segments.first().copied().map_or("", strip_indices)
    }

    /// Segments joined with `.`.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Build a reference for this chain with an already-normalized `path`.
    pub fn to_reference(
        &self,
        source: &SourceText<'_>,
        root_variable: &str,
        path: String,
        kind: ReferenceKind,
    ) -> FieldReference {
        let (line_number, column) = source.locate(self.start);
        FieldReference {
            source_file: source.file().to_string(),
            line_number,
            column,
            root_variable: root_variable.to_string(),
            path,
            raw_text: self.raw.to_string(),
            kind,
        }
    }
}

fn strip_indices(segment: &str) -> &str {
    segment.find('[').map_or(segment, |i| &segment[..i])
}

/// All chains in `source` outside comments and documentation.
pub fn find_chains<'a>(source: &SourceText<'a>) -> Vec<Chain<'a>> {
    let text = source.text();
    let bytes = text.as_bytes();
    let mut chains = Vec::new();

    for m in CHAIN_RE.find_iter(text) {
        let start = m.start();
        if start > 0 {
            let prev = bytes[start - 1];
            let spread = text[..start].ends_with("...");
            if is_ident_byte(prev) || (prev == b'.' && !spread) {
                continue;
            }
        }
        if source.is_masked(start) {
            continue;
        }

        let matched = m.as_str();
        let mut parts = Vec::new();
        let mut offset = 0;
        for piece in matched.split('.') {
            let name = piece.strip_suffix('?').unwrap_or(piece);
            parts.push((name, offset + name.len()));
            offset += piece.len() + 1;
        }

        if text[m.end()..].trim_start().starts_with('(') {
            parts.pop();
        }
        while parts.len() > 1
            && parts
                .last()
                .is_some_and(|(name, _)| BUILTIN_TRAILING_MEMBERS.contains(&strip_indices(name)))
        {
            parts.pop();
        }
        if parts.len() < 2 {
            continue;
        }

        let raw_end = parts[parts.len() - 1].1;
        chains.push(Chain {
            root: parts[0].0,
            segments: parts[1..].iter().map(|(name, _)| *name).collect(),
            start,
            raw: &matched[..raw_end],
        });
    }

    chains
}
