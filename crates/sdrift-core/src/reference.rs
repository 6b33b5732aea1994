//! # Field References and Verdicts
//!
//! A [`FieldReference`] is one occurrence of a field access in a source
//! file. References are created by the scanner, never mutated, and consumed
//! once by the matcher, which attaches a [`Verdict`].

use std::fmt;

use serde::Serialize;

/// How a reference was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceKind {
    /// Rooted at a configured root variable.
    Direct,
    /// Rooted at an iteration variable and rewritten onto its array path.
    Iteration,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Direct => f.write_str("direct"),
            ReferenceKind::Iteration => f.write_str("iteration"),
        }
    }
}

/// Classification of a reference against a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Backed by a declared schema field.
    Valid,
    /// Not declared, but covered by a documented exception entry.
    Exception,
    /// Not declared and not excused: drift.
    Invalid,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => f.write_str("VALID"),
            Verdict::Exception => f.write_str("EXCEPTION"),
            Verdict::Invalid => f.write_str("INVALID"),
        }
    }
}

/// One field-access expression found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldReference {
    /// Source file identifier, as named in the configuration.
    pub source_file: String,
    /// 1-based line of the match.
    pub line_number: usize,
    /// 1-based column (in characters) of the match.
    pub column: usize,
    /// Variable the access chain starts at.
    pub root_variable: String,
    /// Normalized dotted path, optional-chaining removed. Iteration
    /// references carry the array path in place of the variable.
    pub path: String,
    /// Exact matched text.
    pub raw_text: String,
    /// Discovery mode.
    pub kind: ReferenceKind,
}

impl FieldReference {
    /// `file:line:column` location string.
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.source_file, self.line_number, self.column)
    }
}

impl fmt::Display for FieldReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw_text.replace("?.", ".") == self.path {
            write!(f, "{}  {}", self.location(), self.raw_text)
        } else {
            write!(f, "{}  {} (as {})", self.location(), self.raw_text, self.path)
        }
    }
}
