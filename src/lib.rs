//! Version ordering and OS compatibility engine for the Vellum package index
//!
//! - [`version`]: version grammar, comparison and OS release arithmetic
//! - [`registry`]: registry document model, loading and installability resolution
//! - [`catalog`]: flattened, display-ready package listing and filter facets
//! - [`config`]: user configuration and data paths
//! - [`logging`]: tracing subscriber bootstrap for the binary

pub mod catalog;
pub mod config;
pub mod logging;
pub mod registry;
pub mod version;
