//! # Run Configuration
//!
//! A versioned YAML file declaring which source files are checked against
//! which schema under which root variable, plus the iteration bindings and
//! the documented exception entries.
//!
//! ```yaml
//! version: 1
//! targets:
//!   - source: src/Admin.html
//!     schema: schemas/event.schema.json
//!     root: event
//! iteration_bindings:
//!   - variable: sponsor
//!     array_path: sponsors
//! exceptions:
//!   src/Admin.html:
//!     - path: event.legacyTitle
//!       reason: read only as a fallback when event.title is absent
//! ```
//!
//! Target paths are relative to the configuration file's directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sdrift_core::ConfigError;
use sdrift_scan::IterationBinding;
use serde::{Deserialize, Serialize};

use crate::exceptions::{ExceptionEntry, ExceptionRegistry};

/// Configuration format version this build reads.
pub const CONFIG_VERSION: u32 = 1;

/// File name searched for when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "sdrift.yaml";

/// One `(source file, schema, root variable)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceTarget {
    /// Source file, relative to the configuration directory. Also the key
    /// used in reports and in the exception table.
    pub source: String,
    /// Schema file, relative to the configuration directory.
    pub schema: String,
    /// Root variable name bound to the schema in this file.
    pub root: String,
}

impl SurfaceTarget {
    pub fn new(
        source: impl Into<String>,
        schema: impl Into<String>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            schema: schema.into(),
            root: root.into(),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    pub version: u32,
    pub targets: Vec<SurfaceTarget>,
    /// Replaces the built-in binding table when present.
    #[serde(default)]
    pub iteration_bindings: Option<Vec<IterationBinding>>,
    #[serde(default)]
    pub exceptions: BTreeMap<String, Vec<ExceptionEntry>>,
}

impl CheckConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, e))?;
        Self::from_yaml_str(&content, path)
    }

    /// Parse and validate configuration text; `path` labels errors.
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        let raw: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| invalid(format!("invalid YAML: {e}")))?;
        let version = raw
            .get("version")
            .and_then(serde_yaml::Value::as_u64)
            .ok_or_else(|| invalid("missing or non-numeric `version`".to_string()))?;
        if version != u64::from(CONFIG_VERSION) {
            return Err(ConfigError::UnsupportedVersion {
                found: u32::try_from(version).unwrap_or(u32::MAX),
                expected: CONFIG_VERSION,
            });
        }

        let config: CheckConfig =
            serde_yaml::from_value(raw).map_err(|e| invalid(e.to_string()))?;
        config.check(path)?;
        Ok(config)
    }

    /// Semantic checks serde cannot express.
    fn check(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        if self.targets.is_empty() {
            return Err(invalid("no targets declared".to_string()));
        }
        for (i, target) in self.targets.iter().enumerate() {
            if target.source.trim().is_empty() || target.schema.trim().is_empty() {
                return Err(invalid(format!("target {i}: source and schema are required")));
            }
            if !is_identifier(&target.root) {
                return Err(invalid(format!(
                    "target {i}: root `{}` is not an identifier",
                    target.root
                )));
            }
        }
        for binding in self.iteration_bindings.iter().flatten() {
            if !is_identifier(&binding.variable) || binding.array_path.trim().is_empty() {
                return Err(invalid(format!(
                    "iteration binding `{}` -> `{}` is incomplete",
                    binding.variable, binding.array_path
                )));
            }
        }
        for (file, entries) in &self.exceptions {
            if !self.targets.iter().any(|t| t.source == *file) {
                return Err(invalid(format!(
                    "exceptions declared for {file}, which is not a target source"
                )));
            }
            for entry in entries {
                if entry.path.trim().is_empty() {
                    return Err(invalid(format!("exception in {file} has an empty path")));
                }
                if entry.reason.trim().is_empty() {
                    return Err(invalid(format!(
                        "exception {} in {file} has no reason",
                        entry.path
                    )));
                }
            }
        }
        Ok(())
    }

    /// Configured bindings, or the built-in table.
    pub fn bindings(&self) -> Vec<IterationBinding> {
        self.iteration_bindings
            .clone()
            .unwrap_or_else(IterationBinding::defaults)
    }

    pub fn exception_registry(&self) -> ExceptionRegistry {
        ExceptionRegistry::new(self.exceptions.clone())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Walk up from `start` looking for [`DEFAULT_CONFIG_FILE`].
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
