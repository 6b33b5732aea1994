//! # Paths Subcommand
//!
//! Prints the valid-path set of one schema file, one path per line, as a
//! reference when writing exception entries or iteration bindings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sdrift_core::ValidPathSet;
use sdrift_schema::{extract_paths, load_schema};

use crate::EXIT_OK;

/// Arguments for the `sdrift paths` subcommand.
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Only list array paths (the `[]`-marked entries).
    #[arg(long)]
    pub arrays: bool,

    /// Print a JSON array instead of one path per line.
    #[arg(long)]
    pub json: bool,
}

/// Execute the paths subcommand.
pub fn run_paths(args: &PathsArgs) -> Result<u8> {
    let document = load_schema(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    let paths = extract_paths(&document);
    let selected = select(&paths, args.arrays);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        for path in selected {
            println!("{path}");
        }
    }
    Ok(EXIT_OK)
}

fn select(paths: &ValidPathSet, arrays_only: bool) -> Vec<&str> {
    paths
        .iter()
        .filter(|p| !arrays_only || p.ends_with(sdrift_core::ARRAY_MARKER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_filter_keeps_marked_paths() {
        let mut b = ValidPathSet::builder();
        b.record("event");
        b.record_array("event.sponsors");
        let paths = b.build();
        assert_eq!(select(&paths, true), vec!["event.sponsors[]"]);
        assert_eq!(select(&paths, false).len(), 3);
    }

    #[test]
    fn missing_schema_is_an_error() {
        let args = PathsArgs {
            schema: PathBuf::from("/nonexistent/sdrift/none.json"),
            arrays: false,
            json: false,
        };
        assert!(run_paths(&args).is_err());
    }

    #[test]
    fn prints_existing_schema() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("s.json");
        std::fs::write(&schema, r#"{"properties": {"a": {"type": "string"}}}"#).unwrap();
        let args = PathsArgs {
            schema,
            arrays: false,
            json: true,
        };
        assert_eq!(run_paths(&args).unwrap(), EXIT_OK);
    }
}
