//! # Surface Validator
//!
//! Runs every configured `(source, schema, root)` triple:
//!
//! 1. Read every source and schema up front. Any missing or unreadable
//!    input aborts the run with a [`ConfigError`]; no partial report is
//!    produced.
//! 2. Extract each distinct schema's [`ValidPathSet`] once.
//! 3. Per triple, scan direct and iteration references, classify each, and
//!    record it in the report.
//!
//! Step 3 is pure. A reference reported by two triples (same file and root
//! listed twice) is recorded once.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use sdrift_core::{ConfigError, FieldReference, ValidPathSet, Verdict};
use sdrift_scan::{
    direct_references, iteration_references, root_bindings, IterationBinding, SourceText,
};
use sdrift_schema::{extract_paths, load_schema};

use crate::config::{CheckConfig, SurfaceTarget};
use crate::exceptions::ExceptionRegistry;
use crate::matcher::classify;
use crate::report::ValidationReport;

/// Checks source files against their schemas.
#[derive(Debug, Clone)]
pub struct SurfaceValidator {
    base_dir: PathBuf,
    targets: Vec<SurfaceTarget>,
    bindings: Vec<IterationBinding>,
    exceptions: ExceptionRegistry,
}

impl SurfaceValidator {
    /// Build a validator; target paths resolve against `base_dir`.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        targets: Vec<SurfaceTarget>,
        bindings: Vec<IterationBinding>,
        exceptions: ExceptionRegistry,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            targets,
            bindings,
            exceptions,
        }
    }

    /// Build from a loaded configuration located in `base_dir`.
    pub fn from_config(config: &CheckConfig, base_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            base_dir,
            config.targets.clone(),
            config.bindings(),
            config.exception_registry(),
        )
    }

    pub fn targets(&self) -> &[SurfaceTarget] {
        &self.targets
    }

    pub fn exceptions(&self) -> &ExceptionRegistry {
        &self.exceptions
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        let path = Path::new(relative);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Validate every target.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any configured source or schema cannot
    /// be read or parsed. Drift is not an error; see
    /// [`ValidationReport::success`].
    pub fn run(&self) -> Result<ValidationReport, ConfigError> {
        let mut sources: HashMap<&str, String> = HashMap::new();
        let mut schemas: HashMap<&str, ValidPathSet> = HashMap::new();

        for target in &self.targets {
            if !sources.contains_key(target.source.as_str()) {
                let path = self.resolve(&target.source);
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::from_io(&path, e))?;
                sources.insert(&target.source, text);
            }
            if !schemas.contains_key(target.schema.as_str()) {
                let document = load_schema(&self.resolve(&target.schema))?;
                let paths = extract_paths(&document);
                tracing::debug!(schema = %target.schema, paths = paths.len(), "schema paths extracted");
                schemas.insert(&target.schema, paths);
            } else {
                tracing::trace!(schema = %target.schema, "schema path set reused");
            }
        }

        let mut report = ValidationReport::default();
        let mut seen: HashSet<FieldReference> = HashSet::new();

        for target in &self.targets {
            let (Some(text), Some(valid_paths)) = (
                sources.get(target.source.as_str()),
                schemas.get(target.schema.as_str()),
            ) else {
                continue;
            };
            report.touch(&target.source);
            let classified = validate_source(
                &target.source,
                text,
                &target.root,
                valid_paths,
                &self.bindings,
                &self.exceptions,
            );
            for (reference, verdict) in classified {
                if seen.insert(reference.clone()) {
                    report.record(reference, verdict);
                }
            }
        }

        report.finish();
        tracing::info!(
            files = report.files.len(),
            valid = report.total_valid,
            exceptions = report.total_exceptions,
            invalid = report.total_invalid,
            "surface validation complete"
        );
        Ok(report)
    }
}

/// Scan and classify one source text. Pure; performs no IO.
///
/// Bindings are first rooted at `root_variable` where only the rooted
/// array path exists in `valid_paths`.
pub fn validate_source(
    source_file: &str,
    text: &str,
    root_variable: &str,
    valid_paths: &ValidPathSet,
    bindings: &[IterationBinding],
    exceptions: &ExceptionRegistry,
) -> Vec<(FieldReference, Verdict)> {
    let source = SourceText::new(source_file, text);
    let mut references = direct_references(&source, root_variable);
    let bindings = root_bindings(bindings, valid_paths, root_variable);
    references.extend(iteration_references(&source, valid_paths, &bindings));

    references
        .into_iter()
        .map(|reference| {
            let verdict = classify(&reference, valid_paths, exceptions);
            if verdict == Verdict::Invalid {
                tracing::debug!(
                    location = %reference.location(),
                    path = %reference.path,
                    "undeclared field"
                );
            }
            (reference, verdict)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ExceptionEntry;
    use std::collections::BTreeMap;

    const SCHEMA: &str = r##"{
        "type": "object",
        "properties": {
            "event": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "sponsors": { "type": "array", "items": { "$ref": "#/definitions/Sponsor" } }
                }
            }
        },
        "definitions": {
            "Sponsor": { "type": "object", "properties": { "name": { "type": "string" } } }
        }
    }"##;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn validator(dir: &Path, targets: Vec<SurfaceTarget>) -> SurfaceValidator {
        let mut table = BTreeMap::new();
        table.insert(
            "views/Admin.html".to_string(),
            vec![ExceptionEntry::new("event.legacyName", "fallback for old rows")],
        );
        SurfaceValidator::new(
            dir,
            targets,
            vec![IterationBinding::new("sponsor", "event.sponsors")],
            ExceptionRegistry::new(table),
        )
    }

    #[test]
    fn classifies_across_buckets() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schemas/event.json", SCHEMA);
        write(
            dir.path(),
            "views/Admin.html",
            "<?= event.name ?>\n<?= event.legacyName || event.name ?>\n<?= event.venue ?>\n<? event.sponsors.forEach(sponsor => { ?><?= sponsor.name ?><?= sponsor.url ?><? }) ?>",
        );
        let report = validator(
            dir.path(),
            vec![SurfaceTarget::new("views/Admin.html", "schemas/event.json", "event")],
        )
        .run()
        .unwrap();

        let file = &report.files["views/Admin.html"];
        let invalid: Vec<_> = file.invalid.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(invalid, vec!["event.venue", "event.sponsors.url"]);
        assert_eq!(file.exceptions.len(), 1);
        assert_eq!(file.exceptions[0].path, "event.legacyName");
        assert_eq!(report.total_invalid, 2);
        assert!(!report.success());
    }

    #[test]
    fn schema_is_shared_and_duplicates_collapse() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schemas/event.json", SCHEMA);
        write(dir.path(), "views/Public.html", "<?= event.name ?>");
        let target = SurfaceTarget::new("views/Public.html", "schemas/event.json", "event");
        let report = validator(dir.path(), vec![target.clone(), target]).run().unwrap();
        assert_eq!(report.total_valid, 1);
        assert!(report.success());
    }

    #[test]
    fn missing_source_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schemas/event.json", SCHEMA);
        let err = validator(
            dir.path(),
            vec![SurfaceTarget::new("views/Gone.html", "schemas/event.json", "event")],
        )
        .run()
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn missing_schema_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "views/Public.html", "<?= event.name ?>");
        let err = validator(
            dir.path(),
            vec![SurfaceTarget::new("views/Public.html", "schemas/none.json", "event")],
        )
        .run()
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn file_without_references_is_reported_clean() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schemas/event.json", SCHEMA);
        write(dir.path(), "views/Static.html", "<p>hello</p>");
        let report = validator(
            dir.path(),
            vec![SurfaceTarget::new("views/Static.html", "schemas/event.json", "event")],
        )
        .run()
        .unwrap();
        assert_eq!(report.files["views/Static.html"].total(), 0);
    }

    #[test]
    fn validate_source_is_pure() {
        let doc = sdrift_schema::parse_schema_str(SCHEMA, Path::new("s.json")).unwrap();
        let valid = extract_paths(&doc);
        let run = || {
            validate_source(
                "a.js",
                "event.name; event.nope",
                "event",
                &valid,
                &[],
                &ExceptionRegistry::default(),
            )
        };
        let first = run();
        assert_eq!(first, run());
        assert_eq!(first[1].1, Verdict::Invalid);
    }
}
