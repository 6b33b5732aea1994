//! # Schema Loading
//!
//! Reads schema documents from disk. The format is chosen from the file
//! extension: `.yaml`/`.yml` for YAML, anything else is parsed as JSON.
//! YAML is deserialized straight into a JSON value tree before parsing into
//! a [`SchemaDocument`].

use std::path::Path;

use sdrift_core::ConfigError;
use serde_json::Value;

use crate::document::SchemaDocument;

/// Load and parse a schema file.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] or [`ConfigError::Unreadable`] if
/// the file cannot be read, and [`ConfigError::InvalidSchema`] if it is not
/// valid JSON/YAML. Structural oddities inside a well-formed document are
/// not errors.
pub fn load_schema(path: &Path) -> Result<SchemaDocument, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, e))?;
    parse_schema_str(&content, path)
}

/// Parse schema text; `path` selects the format and labels errors.
pub fn parse_schema_str(content: &str, path: &Path) -> Result<SchemaDocument, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSchema {
        path: path.to_path_buf(),
        reason,
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let value: Value = match ext {
        "yaml" | "yml" => {
            serde_yaml::from_str(content).map_err(|e| invalid(format!("invalid YAML: {e}")))?
        }
        _ => serde_json::from_str(content).map_err(|e| invalid(format!("invalid JSON: {e}")))?,
    };

    Ok(SchemaDocument::from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_paths;

    #[test]
    fn loads_json_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.schema.json");
        std::fs::write(
            &path,
            r#"{"properties": {"event": {"properties": {"name": {"type": "string"}}}}}"#,
        )
        .unwrap();
        let doc = load_schema(&path).unwrap();
        let paths = extract_paths(&doc);
        assert!(paths.contains("event.name"));
    }

    #[test]
    fn loads_yaml_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.schema.yaml");
        std::fs::write(
            &path,
            "properties:\n  sponsors:\n    type: array\n    items:\n      properties:\n        tier: { type: integer }\n",
        )
        .unwrap();
        let paths = extract_paths(&load_schema(&path).unwrap());
        assert!(paths.contains("sponsors[]"));
        assert!(paths.contains("sponsors.tier"));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_schema(Path::new("/nonexistent/sdrift/none.schema.json")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn unparseable_json_is_invalid_schema() {
        let err = parse_schema_str("{ not json", Path::new("broken.json")).unwrap_err();
        match err {
            ConfigError::InvalidSchema { reason, .. } => assert!(reason.starts_with("invalid JSON")),
            other => panic!("expected InvalidSchema, got {other}"),
        }
    }

    #[test]
    fn unparseable_yaml_is_invalid_schema() {
        let err = parse_schema_str("properties: [unclosed", Path::new("broken.yaml")).unwrap_err();
        match err {
            ConfigError::InvalidSchema { reason, .. } => assert!(reason.starts_with("invalid YAML")),
            other => panic!("expected InvalidSchema, got {other}"),
        }
    }
}
