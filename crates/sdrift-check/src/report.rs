//! # Validation Report
//!
//! Per-file buckets of classified references plus global totals. Built once
//! per run by the validator and read-only afterwards. Files are ordered by
//! name and references by position, so two runs over the same inputs
//! serialize identically.

use std::collections::BTreeMap;

use sdrift_core::{FieldReference, Verdict};
use serde::Serialize;

/// References found in one source file, split by verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub valid: Vec<FieldReference>,
    pub exceptions: Vec<FieldReference>,
    pub invalid: Vec<FieldReference>,
}

impl FileReport {
    fn push(&mut self, reference: FieldReference, verdict: Verdict) {
        match verdict {
            Verdict::Valid => self.valid.push(reference),
            Verdict::Exception => self.exceptions.push(reference),
            Verdict::Invalid => self.invalid.push(reference),
        }
    }

    fn sort(&mut self) {
        for bucket in [&mut self.valid, &mut self.exceptions, &mut self.invalid] {
            bucket.sort_by(|a, b| {
                (a.line_number, a.column, &a.path).cmp(&(b.line_number, b.column, &b.path))
            });
        }
    }

    /// Number of references in all buckets.
    pub fn total(&self) -> usize {
        self.valid.len() + self.exceptions.len() + self.invalid.len()
    }

    /// Every reference with its verdict, bucket by bucket.
    pub fn classified(&self) -> impl Iterator<Item = (&FieldReference, Verdict)> {
        self.valid
            .iter()
            .map(|r| (r, Verdict::Valid))
            .chain(self.exceptions.iter().map(|r| (r, Verdict::Exception)))
            .chain(self.invalid.iter().map(|r| (r, Verdict::Invalid)))
    }
}

/// Aggregated result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub files: BTreeMap<String, FileReport>,
    pub total_valid: usize,
    pub total_exceptions: usize,
    pub total_invalid: usize,
}

impl ValidationReport {
    /// Record one classified reference under its source file.
    pub fn record(&mut self, reference: FieldReference, verdict: Verdict) {
        match verdict {
            Verdict::Valid => self.total_valid += 1,
            Verdict::Exception => self.total_exceptions += 1,
            Verdict::Invalid => self.total_invalid += 1,
        }
        self.files
            .entry(reference.source_file.clone())
            .or_default()
            .push(reference, verdict);
    }

    /// Make sure `source_file` appears even when it has no references.
    pub fn touch(&mut self, source_file: &str) {
        self.files.entry(source_file.to_string()).or_default();
    }

    /// Order every bucket by position. Called once when the run completes.
    pub fn finish(&mut self) {
        self.files.values_mut().for_each(FileReport::sort);
    }

    /// True when no reference is INVALID.
    pub fn success(&self) -> bool {
        self.total_invalid == 0
    }

    /// All invalid references, file by file.
    pub fn invalid(&self) -> impl Iterator<Item = &FieldReference> {
        self.files.values().flat_map(|f| f.invalid.iter())
    }
}
