//! # Check Subcommand
//!
//! Loads the configuration, runs the surface validator, and prints the
//! report as plain text or JSON. Stdout carries only the report; logs go to
//! stderr.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use sdrift_check::{
    find_config, CheckConfig, SurfaceValidator, ValidationReport, DEFAULT_CONFIG_FILE,
};

use crate::{EXIT_DRIFT, EXIT_OK};

/// Arguments for the `sdrift check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when no reference is invalid, 1 on drift. Errors
/// are configuration failures and map to exit code 2 in `main`.
pub fn run_check(args: &CheckArgs, config: Option<&Path>, verbose: u8) -> Result<u8> {
    let config_path = match config {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            find_config(&cwd).with_context(|| {
                format!("no {DEFAULT_CONFIG_FILE} found in {} or any parent", cwd.display())
            })?
        }
    };
    tracing::debug!(config = %config_path.display(), "using configuration");

    let report = check_with_config(&config_path)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
    } else {
        print!("{}", render_report(&report, verbose > 0));
    }

    Ok(if report.success() { EXIT_OK } else { EXIT_DRIFT })
}

/// Load `config_path` and validate every target it declares.
pub fn check_with_config(config_path: &Path) -> Result<ValidationReport> {
    let config = CheckConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    tracing::info!(
        targets = config.targets.len(),
        exceptions = config.exception_registry().len(),
        "loaded configuration"
    );

    SurfaceValidator::from_config(&config, base_dir)
        .run()
        .context("surface validation aborted")
}

/// Plain-text rendering. Exceptions are listed only when `show_exceptions`.
pub fn render_report(report: &ValidationReport, show_exceptions: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Surfaces: {} file(s), {} valid, {} exception(s), {} invalid",
        report.files.len(),
        report.total_valid,
        report.total_exceptions,
        report.total_invalid
    );

    for file in report.files.values() {
        for reference in &file.invalid {
            let _ = writeln!(out, "  FAIL: {reference}");
        }
        if show_exceptions {
            for reference in &file.exceptions {
                let _ = writeln!(out, "  EXCEPTION: {reference}");
            }
        }
    }

    if !report.success() {
        let files = report.files.values().filter(|f| !f.invalid.is_empty()).count();
        let _ = writeln!(
            out,
            "\n{} undeclared field read(s) in {} file(s).",
            report.total_invalid, files
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdrift_core::{FieldReference, ReferenceKind, Verdict};

    fn reference(path: &str, line: usize) -> FieldReference {
        FieldReference {
            source_file: "src/Admin.html".to_string(),
            line_number: line,
            column: 5,
            root_variable: "event".to_string(),
            path: path.to_string(),
            raw_text: path.to_string(),
            kind: ReferenceKind::Direct,
        }
    }

    fn write_project(dir: &Path, source: &str) -> PathBuf {
        std::fs::write(
            dir.join("event.schema.json"),
            r#"{"properties": {"event": {"properties": {"name": {"type": "string"}}}}}"#,
        )
        .unwrap();
        std::fs::write(dir.join("Admin.html"), source).unwrap();
        let config = dir.join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &config,
            "version: 1\ntargets:\n  - { source: Admin.html, schema: event.schema.json, root: event }\n",
        )
        .unwrap();
        config
    }

    #[test]
    fn render_lists_failures_and_summary() {
        let mut report = ValidationReport::default();
        report.record(reference("event.name", 1), Verdict::Valid);
        report.record(reference("event.venue", 4), Verdict::Invalid);
        report.finish();
        let text = render_report(&report, false);
        assert!(text.starts_with("Surfaces: 1 file(s), 1 valid, 0 exception(s), 1 invalid"));
        assert!(text.contains("  FAIL: src/Admin.html:4:5  event.venue"));
        assert!(text.contains("1 undeclared field read(s) in 1 file(s)."));
    }

    #[test]
    fn exceptions_shown_only_when_verbose() {
        let mut report = ValidationReport::default();
        report.record(reference("event.legacy", 2), Verdict::Exception);
        assert!(!render_report(&report, false).contains("EXCEPTION"));
        assert!(render_report(&report, true).contains("EXCEPTION: src/Admin.html:2:5"));
    }

    #[test]
    fn clean_project_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_project(dir.path(), "<?= event.name ?>");
        let code = run_check(&CheckArgs::default(), Some(&config), 0).unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn drift_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_project(dir.path(), "<?= event.title ?>");
        let code = run_check(&CheckArgs { json: true }, Some(&config), 0).unwrap();
        assert_eq!(code, EXIT_DRIFT);
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_project(dir.path(), "");
        std::fs::remove_file(dir.path().join("Admin.html")).unwrap();
        let err = check_with_config(&config).unwrap_err();
        assert!(format!("{err:#}").contains("file not found"), "{err:#}");
    }
}
