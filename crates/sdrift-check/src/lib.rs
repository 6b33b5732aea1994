//! # sdrift-check — Schema/Surface Consistency Checking
//!
//! Ties schema extraction and source scanning together and decides, for
//! every field access found in a view or template, whether the schema
//! declares it.
//!
//! - [`matcher`] — exact, parent, and index-stripped matching against a
//!   [`ValidPathSet`](sdrift_core::ValidPathSet).
//! - [`exceptions`] — the per-file registry of documented fallback reads.
//! - [`config`] — the versioned YAML run configuration.
//! - [`validator`] — the [`SurfaceValidator`] orchestrator.
//! - [`report`] — per-file buckets and totals.
//!
//! ## Outcome Policy
//!
//! Missing or unreadable inputs abort the run. Degenerate schema structure
//! never does. Only the final invalid count decides pass/fail.

pub mod config;
pub mod exceptions;
pub mod matcher;
pub mod report;
pub mod validator;

pub use config::{find_config, CheckConfig, SurfaceTarget, CONFIG_VERSION, DEFAULT_CONFIG_FILE};
pub use exceptions::{ExceptionEntry, ExceptionRegistry};
pub use matcher::{classify, match_schema, strip_indices, SchemaMatch};
pub use report::{FileReport, ValidationReport};
pub use validator::{validate_source, SurfaceValidator};
