//! # Source Text
//!
//! Wraps raw source text with two precomputed indexes:
//!
//! - line starts, for 1-based line/column reporting;
//! - a mask of byte ranges that are comments or schema documentation, where
//!   field-like text must not be treated as code.
//!
//! Masking is textual, not lexical. A `/*` inside a quote opened earlier
//! on the same line is ignored, and an unterminated `/*` stops at the end of
//! its line. Other string contents are not tracked, so a `//` inside a string
//! still hides the rest of that line.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Prose lines documenting the data contract, e.g.
/// `- event.settings.visible → shown on the public page`.
static DOC_PROSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:(?:\*|//|#)[ \t]*)?[-*•][ \t]+[A-Za-z_$][\w$.?\[\]]*[ \t]*(?:→|->|—|:)")
        .unwrap()
});

/// Continuation lines of a JSDoc-style block (`* @param ...`).
static DOC_CONTINUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*(?:[^/].*)?$").unwrap());

/// Source text plus line and comment indexes.
#[derive(Debug)]
pub struct SourceText<'a> {
    file: &'a str,
    text: &'a str,
    line_starts: Vec<usize>,
    masked: Vec<Range<usize>>,
}

impl<'a> SourceText<'a> {
    /// Index `text`, labelled as `file` in produced references.
    pub fn new(file: &'a str, text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            file,
            text,
            line_starts,
            masked: comment_ranges(text),
        }
    }

    pub fn file(&self) -> &'a str {
        self.file
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// 1-based `(line, column)` of a byte offset. Columns count characters.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.text[line_start..offset].chars().count() + 1;
        (line, column)
    }

    /// True if `offset` falls in a comment or documentation span.
    pub fn is_masked(&self, offset: usize) -> bool {
        let idx = self.masked.partition_point(|r| r.start <= offset);
        idx > 0 && self.masked[idx - 1].contains(&offset)
    }
}

/// Byte ranges of comments and documentation lines, sorted and merged.
fn comment_ranges(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        let end = if rest.starts_with(b"/*") && !quote_open(bytes, i) {
            Some(close_block(text, i + 2))
        } else if rest.starts_with(b"<!--") {
            Some(close_after(text, i + 4, "-->"))
        } else if rest.starts_with(b"//") && !(i > 0 && bytes[i - 1] == b':') {
            Some(text[i..].find('\n').map_or(text.len(), |n| i + n))
        } else {
            None
        };
        match end {
            Some(end) => {
                ranges.push(i..end);
                i = end;
            }
            None => i += 1,
        }
    }

    for re in [&*DOC_PROSE_RE, &*DOC_CONTINUATION_RE] {
        ranges.extend(re.find_iter(text).map(|m| line_span(text, m.start())));
    }

    ranges.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Offset just past `terminator` at or after `from`, or end of text when the
/// comment is never closed.
fn close_after(text: &str, from: usize, terminator: &str) -> usize {
    text[from..]
        .find(terminator)
        .map_or(text.len(), |n| from + n + terminator.len())
}

/// End of a `/* ... */` comment. An unterminated one stops at its own line.
fn close_block(text: &str, from: usize) -> usize {
    match text[from..].find("*/") {
        Some(n) => from + n + 2,
        None => text[from..].find('\n').map_or(text.len(), |n| from + n),
    }
}

/// True if a string literal opened earlier on the same line is still open
/// at `offset`. Backslash escapes are honored; quotes never span lines.
fn quote_open(bytes: &[u8], offset: usize) -> bool {
    let line_start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |n| n + 1);
    let mut open: Option<u8> = None;
    let mut escaped = false;
    for &b in &bytes[line_start..offset] {
        match open {
            _ if escaped => escaped = false,
            Some(_) if b == b'\\' => escaped = true,
            Some(q) if b == q => open = None,
            None if matches!(b, b'\'' | b'"' | b'`') => open = Some(b),
            _ => {}
        }
    }
    open.is_some()
}

/// Full physical line containing `offset`, excluding the newline.
fn line_span(text: &str, offset: usize) -> Range<usize> {
    let start = text[..offset].rfind('\n').map_or(0, |n| n + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |n| offset + n);
    start..end
}
