//! # sdrift-schema — Schema Documents and Path Extraction
//!
//! Turns a JSON Schema document into the [`ValidPathSet`] of every field path
//! it declares.
//!
//! ## Document Model (`document`)
//!
//! [`SchemaDocument`] owns a root [`SchemaNode`] plus the named definitions
//! table built from `definitions` and `$defs`. References are names into
//! that table; they alias definitions and never own them.
//!
//! ## Extraction (`extract`)
//!
//! [`extract_paths`] walks the tree depth-first, resolving references,
//! flattening union branches onto the same path, and recording array paths
//! with and without the `[]` marker.
//!
//! ## Loading (`load`)
//!
//! [`load_schema`] reads a `.json`, `.yaml` or `.yml` file. Only unreadable
//! or unparseable files are errors; structurally odd schemas degrade to
//! fewer paths.
//!
//! [`ValidPathSet`]: sdrift_core::ValidPathSet

pub mod document;
pub mod extract;
pub mod load;

pub use document::{PrimitiveType, SchemaDocument, SchemaNode};
pub use extract::extract_paths;
pub use load::{load_schema, parse_schema_str};
