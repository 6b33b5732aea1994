//! # sdrift-core — Foundational Types for Schema/Surface Drift Checking
//!
//! This crate is the leaf of the sdrift workspace. It defines the values that
//! flow between the schema extractor, the source scanner, and the validator:
//!
//! - [`ValidPathSet`] — every dotted field path a schema document declares,
//!   including the `[]`-suffixed form of each array path.
//! - [`FieldReference`] — one field-access expression found in a source file.
//! - [`Verdict`] — the classification attached to a reference after matching.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sdrift-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Values are immutable once built; sets and references are constructed
//!   fresh per run and never mutated after hand-off.

pub mod error;
pub mod path;
pub mod reference;

pub use error::{ConfigError, SdriftError};
pub use path::{ValidPathSet, ARRAY_MARKER};
pub use reference::{FieldReference, ReferenceKind, Verdict};
