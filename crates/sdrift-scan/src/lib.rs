//! # sdrift-scan — Source Reference Scanner
//!
//! Extracts field-access expressions from view and template sources without
//! parsing them. The scanner treats every file as plain text:
//!
//! - [`source`] indexes line starts and masks comments and schema
//!   documentation prose.
//! - [`chain`] finds `ident(.ident | ?.ident)+` access chains outside the mask.
//! - [`direct`] keeps chains rooted at a configured root variable, minus
//!   host-environment members listed in [`host`].
//! - [`iteration`] rewrites loop/callback variable accesses onto their array
//!   path, but only in files that show evidence of iterating that array.
//!
//! The heuristics prefer missing a real access over flagging documentation.

pub mod chain;
pub mod direct;
pub mod host;
pub mod iteration;
pub mod source;

pub use direct::{direct_references, scan_direct_references};
pub use iteration::{
    has_iteration_evidence, iteration_references, root_bindings, scan_iteration_references,
    IterationBinding, DEFAULT_ITERATION_BINDINGS,
};
pub use source::SourceText;
