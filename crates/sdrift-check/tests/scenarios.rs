//! End-to-end scenarios through the public API: schema text in, classified
//! references out.

use std::collections::BTreeMap;
use std::path::Path;

use sdrift_check::{
    validate_source, CheckConfig, ExceptionEntry, ExceptionRegistry, SurfaceValidator,
};
use sdrift_core::{ReferenceKind, ValidPathSet, Verdict};
use sdrift_scan::IterationBinding;
use sdrift_schema::{extract_paths, parse_schema_str};
use serde_json::json;

fn paths(schema: serde_json::Value) -> ValidPathSet {
    let doc = parse_schema_str(&schema.to_string(), Path::new("schema.json")).unwrap();
    extract_paths(&doc)
}

fn event_paths() -> ValidPathSet {
    paths(json!({
        "properties": {
            "event": {
                "properties": {
                    "name": { "type": "string" },
                    "settings": { "properties": { "visible": { "type": "boolean" } } }
                }
            }
        }
    }))
}

fn sponsor_paths() -> ValidPathSet {
    paths(json!({
        "properties": {
            "sponsors": {
                "type": "array",
                "items": { "properties": { "name": { "type": "string" } } }
            }
        }
    }))
}

fn no_exceptions() -> ExceptionRegistry {
    ExceptionRegistry::default()
}

#[test]
fn valid_nested_access() {
    let result = validate_source(
        "Public.html",
        "<?= event.settings.visible ?>",
        "event",
        &event_paths(),
        &[],
        &no_exceptions(),
    );
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].0.path, "event.settings.visible");
    assert_eq!(result[0].1, Verdict::Valid);
}

#[test]
fn undeclared_field_reports_text_and_line() {
    let text = "<h1><?= event.name ?></h1>\n<? if (event.settings.hidden) { ?>";
    let result = validate_source("Public.html", text, "event", &event_paths(), &[], &no_exceptions());
    let invalid: Vec<_> = result.iter().filter(|(_, v)| *v == Verdict::Invalid).collect();
    assert_eq!(invalid.len(), 1);
    let reference = &invalid[0].0;
    assert_eq!(reference.raw_text, "event.settings.hidden");
    assert_eq!(reference.line_number, 2);
    assert_eq!(reference.source_file, "Public.html");
}

#[test]
fn iteration_heuristic_with_evidence() {
    let bindings = [IterationBinding::new("sponsor", "sponsors")];
    let result = validate_source(
        "Display.html",
        "sponsors.forEach(sponsor => sponsor.name)",
        "event",
        &sponsor_paths(),
        &bindings,
        &no_exceptions(),
    );
    let iteration: Vec<_> = result
        .iter()
        .filter(|(r, _)| r.kind == ReferenceKind::Iteration)
        .collect();
    assert_eq!(iteration.len(), 1);
    assert_eq!(iteration[0].0.path, "sponsors.name");
    assert_eq!(iteration[0].1, Verdict::Valid);
}

#[test]
fn iteration_heuristic_without_evidence_scans_nothing() {
    let bindings = [IterationBinding::new("sponsor", "sponsors")];
    let result = validate_source(
        "Display.html",
        "render(sponsor.name); render(sponsor.bogus);",
        "event",
        &sponsor_paths(),
        &bindings,
        &no_exceptions(),
    );
    assert!(result.iter().all(|(r, _)| r.root_variable != "sponsor"));
    assert!(result.is_empty());
}

#[test]
fn comment_line_produces_no_reference() {
    let result = validate_source(
        "Admin.html",
        "// event.legacyField is deprecated",
        "event",
        &event_paths(),
        &[],
        &no_exceptions(),
    );
    assert!(result.is_empty());
}

#[test]
fn block_opener_in_string_does_not_hide_later_drift() {
    let text = "fetch(url, { headers: { Accept: '*/*' } });\nrender(event.settings.hidden);";
    let result = validate_source("Admin.html", text, "event", &event_paths(), &[], &no_exceptions());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].0.path, "event.settings.hidden");
    assert_eq!(result[0].0.line_number, 2);
    assert_eq!(result[0].1, Verdict::Invalid);
}

#[test]
fn default_bindings_apply_under_the_root_variable() {
    let valid = paths(json!({
        "properties": {
            "event": {
                "properties": {
                    "sponsors": {
                        "type": "array",
                        "items": { "properties": { "name": { "type": "string" } } }
                    }
                }
            }
        }
    }));
    let result = validate_source(
        "Display.html",
        "event.sponsors.forEach(sponsor => show(sponsor.name, sponsor.bogus))",
        "event",
        &valid,
        &IterationBinding::defaults(),
        &no_exceptions(),
    );
    let verdicts: Vec<_> = result
        .iter()
        .map(|(r, v)| (r.path.as_str(), r.kind, *v))
        .collect();
    assert_eq!(
        verdicts,
        vec![
            ("event.sponsors", ReferenceKind::Direct, Verdict::Valid),
            ("event.sponsors.name", ReferenceKind::Iteration, Verdict::Valid),
            ("event.sponsors.bogus", ReferenceKind::Iteration, Verdict::Invalid),
        ]
    );
}

#[test]
fn exception_takes_precedence_over_invalid() {
    let mut table = BTreeMap::new();
    table.insert(
        "Admin.html".to_string(),
        vec![ExceptionEntry::new(
            "event.legacyField",
            "read only when event.name is empty; older rows carry it",
        )],
    );
    let registry = ExceptionRegistry::new(table);
    let result = validate_source(
        "Admin.html",
        "const title = event.name || event.legacyField.text;",
        "event",
        &event_paths(),
        &[],
        &registry,
    );
    let verdicts: Vec<_> = result.iter().map(|(r, v)| (r.path.as_str(), *v)).collect();
    assert_eq!(
        verdicts,
        vec![
            ("event.name", Verdict::Valid),
            ("event.legacyField.text", Verdict::Exception)
        ]
    );
}

#[test]
fn configured_run_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("schemas")).unwrap();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(
        root.join("schemas/event.schema.yaml"),
        "properties:\n  event:\n    properties:\n      name: { type: string }\n      sponsors:\n        type: array\n        items:\n          properties:\n            name: { type: string }\n",
    )
    .unwrap();
    std::fs::write(
        root.join("src/Poster.html"),
        "<?= event.name ?>\n<? for (const sponsor of event.sponsors) { ?>\n<?= sponsor.name ?> <?= sponsor.tier ?>\n<? } ?>\n<!-- event.draftNotes -->",
    )
    .unwrap();
    let config_path = root.join("sdrift.yaml");
    std::fs::write(
        &config_path,
        "version: 1\ntargets:\n  - source: src/Poster.html\n    schema: schemas/event.schema.yaml\n    root: event\niteration_bindings:\n  - variable: sponsor\n    array_path: event.sponsors\n",
    )
    .unwrap();

    let config = CheckConfig::load(&config_path).unwrap();
    let report = SurfaceValidator::from_config(&config, root).run().unwrap();

    assert_eq!(report.total_invalid, 1);
    let invalid = report.invalid().next().unwrap();
    assert_eq!(invalid.path, "event.sponsors.tier");
    assert_eq!(invalid.raw_text, "sponsor.tier");
    assert_eq!(invalid.line_number, 3);
    assert_eq!(report.total_valid, 3);
}
