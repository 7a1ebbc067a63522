//! Shared test utilities

#![allow(dead_code)]

pub mod registry;

pub use registry::{RegistryBuilder, VersionSpec, write_document};
