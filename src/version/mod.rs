//! Version layer for the package index
//!
//! Vellum packages do not follow semver. Versions look like `1.2.3_rc1-r2`:
//! a dotted numeric base, an optional pre/post-release suffix with a number,
//! and a packaging revision.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Parser    │────▶│   Compare   │────▶│   Release   │
//! │ (decompose) │     │(total order)│     │ (OS ranges) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`parser`]: Decomposes raw strings into [`ParsedVersion`]
//! - [`compare`]: Total ordering, sorting and latest-version selection
//! - [`release`]: Major.minor OS releases and the facet range generator

pub mod compare;
pub mod parser;
pub mod release;

pub use compare::{compare_versions, find_latest, sort_versions};
pub use parser::{ParsedVersion, Suffix, SuffixKind, parse_version};
pub use release::{OsRelease, os_range};
