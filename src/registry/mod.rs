//! Registry layer
//!
//! # Modules
//!
//! - [`types`]: Registry document model (packages, versions, dependencies)
//! - [`loader`]: JSON loading of registry documents
//! - [`compat`]: OS compatibility of a single package version
//! - [`resolver`]: Installability resolver trait and budget
//! - [`resolvers`]: Reference and memoized resolver implementations
//! - [`error`]: Error types for loading and resolution

pub mod compat;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod resolvers;
pub mod types;

pub use error::{LoadError, ResolveError};
pub use resolver::{InstallabilityResolver, ResolveBudget};
pub use resolvers::{MemoizedResolver, ReferenceResolver};
pub use types::{
    Architecture, Dependency, Device, PackageRegistry, PackageVersion, RegistryDocument,
    VersionConstraint,
};

use crate::version::release::OsRelease;

impl PackageRegistry {
    /// Check installability with the reference resolver and no budget
    pub fn is_installable(&self, name: &str, release: OsRelease) -> Result<bool, ResolveError> {
        ReferenceResolver::new(self).is_installable(name, release)
    }
}
