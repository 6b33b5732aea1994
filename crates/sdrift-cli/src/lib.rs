//! # sdrift-cli — Command-Line Interface
//!
//! Provides the `sdrift` binary.
//!
//! ## Subcommands
//!
//! - `sdrift check` — run every configured target and print the report.
//! - `sdrift paths <SCHEMA>` — list the valid paths a schema declares.
//!
//! ## Exit Codes
//!
//! - `0` — no undeclared field reads.
//! - `1` — at least one INVALID reference (drift).
//! - `2` — configuration or IO error; no report was produced.
//!
//! ```bash
//! sdrift check
//! sdrift -v check --json
//! sdrift paths schemas/event.schema.json
//! ```

pub mod check;
pub mod paths;

/// No drift found.
pub const EXIT_OK: u8 = 0;
/// At least one undeclared field read.
pub const EXIT_DRIFT: u8 = 1;
/// Broken configuration or unreadable input.
pub const EXIT_OPERATIONAL_ERROR: u8 = 2;
